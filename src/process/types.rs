/*!
 * Process Types
 * PCB record, lifecycle states and saved register context
 */

use crate::core::types::{Address, Pid, Priority, StackRef, NO_PID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Process lifecycle state
///
/// Discriminants are stable: diagnostics decode raw values against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ProcessState {
    /// Block is in the free pool, not a live process
    #[default]
    Unused = 0,
    /// Freshly allocated, not yet scheduled
    New = 1,
    Running = 2,
    Sleeping = 3,
    Waiting = 4,
    BlockedIo = 5,
    Killed = 6,
    /// Exited; exit status still readable by the parent
    Zombie = 7,
    Ready = 8,
}

impl ProcessState {
    /// Number of known states
    pub const COUNT: usize = 9;

    pub const ALL: [ProcessState; Self::COUNT] = [
        ProcessState::Unused,
        ProcessState::New,
        ProcessState::Running,
        ProcessState::Sleeping,
        ProcessState::Waiting,
        ProcessState::BlockedIo,
        ProcessState::Killed,
        ProcessState::Zombie,
        ProcessState::Ready,
    ];

    #[inline]
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Decode a raw state value
    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Three-letter console name
    pub const fn short_name(self) -> &'static str {
        match self {
            ProcessState::Unused => "UNU",
            ProcessState::New => "NEW",
            ProcessState::Running => "RUN",
            ProcessState::Sleeping => "SLP",
            ProcessState::Waiting => "WTG",
            ProcessState::BlockedIo => "BIO",
            ProcessState::Killed => "KIL",
            ProcessState::Zombie => "ZOM",
            ProcessState::Ready => "RDY",
        }
    }

    /// Blocked on an event (the `event` field is meaningful)
    pub const fn is_blocked(self) -> bool {
        matches!(
            self,
            ProcessState::Sleeping | ProcessState::Waiting | ProcessState::BlockedIo
        )
    }

    /// Terminal kinds (the `exit_status` field is meaningful)
    pub const fn is_terminal(self) -> bool {
        matches!(self, ProcessState::Killed | ProcessState::Zombie)
    }
}

/// Display form of a raw state value: the short name, or `?(n)` when unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLabel(pub u8);

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ProcessState::from_raw(self.0) {
            Some(state) => f.write_str(state.short_name()),
            None => write!(f, "?({})", self.0),
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Process control block
///
/// Other subsystems mutate `state`, `prio`, `ticks` and friends directly;
/// writing a field has no side effects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pcb {
    pub pid: Pid,
    pub ppid: Pid,
    pub state: ProcessState,
    /// Wait reason / target while blocked
    pub event: u32,
    pub exit_status: i32,
    /// Live processes whose `ppid` is this PCB's `pid`
    pub children: u32,
    pub prio: Priority,
    pub ticks: u32,
    /// Saved context, owned by the context-management code
    pub context: Option<Address>,
    /// Execution stack, exclusively owned while the PCB is live
    pub stack: Option<StackRef>,
}

impl Pcb {
    /// A block fresh out of the allocator: zeroed, state `New`
    pub fn fresh() -> Self {
        Self {
            state: ProcessState::New,
            ..Self::default()
        }
    }

    /// Mark as a pooled block that no pid search can match
    pub fn retire(&mut self) {
        self.state = ProcessState::Unused;
        self.pid = NO_PID;
        self.ppid = NO_PID;
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.state != ProcessState::Unused
    }
}

/// Saved register context (x86-64 interrupt frame layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct Context {
    pub r15: u64,
    pub r14: u64,
    pub r13: u64,
    pub r12: u64,
    pub r11: u64,
    pub r10: u64,
    pub r9: u64,
    pub r8: u64,
    pub rdx: u64,
    pub rcx: u64,
    pub rbx: u64,
    pub rax: u64,
    pub rdi: u64,
    pub rsi: u64,
    pub rbp: u64,
    pub vector: u64,
    pub code: u64,
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
}
