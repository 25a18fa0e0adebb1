/*!
 * PID Allocation
 * Monotonic next-PID counter
 */

use crate::core::types::{Pid, NO_PID};

/// Next-PID counter
///
/// Never hands out `NO_PID`; the counter saturates just below it.
#[derive(Debug, Clone)]
pub struct PidAllocator {
    next: Pid,
}

impl PidAllocator {
    pub fn new(first: Pid) -> Self {
        Self { next: first }
    }

    /// Allocate the next PID
    pub fn next(&mut self) -> Option<Pid> {
        if self.next == NO_PID {
            return None;
        }
        let pid = self.next;
        self.next += 1;
        Some(pid)
    }

    /// PID the next call will return
    pub fn peek(&self) -> Pid {
        self.next
    }
}
