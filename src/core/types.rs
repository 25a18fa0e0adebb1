/*!
 * Core Types
 * Common types used across the PCB subsystem
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Priority level (0 is the most urgent; upper bound comes from config)
pub type Priority = u8;

/// Sentinel pid for blocks that do not describe a real process
pub const NO_PID: Pid = Pid::MAX;

/// Handle to a PCB block inside the arena
///
/// Stands in for a raw PCB pointer: it is only meaningful to the
/// subsystem that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PcbId(u32);

impl PcbId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PcbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pcb#{}", self.0)
    }
}

/// Execution stack owned by a live PCB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRef {
    pub base: Address,
    pub len: Size,
}

impl StackRef {
    pub const fn new(base: Address, len: Size) -> Self {
        Self { base, len }
    }
}
