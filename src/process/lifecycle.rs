/*!
 * Process Lifecycle
 * Creation and teardown boundaries of a PCB
 *
 * Everything between `New` and `Zombie` is driven by other subsystems
 * writing `Pcb::state` directly.
 */

use super::manager::{precondition, PcbSubsystem};
use crate::core::errors::{PcbError, PcbResult};
use crate::core::limits::PRIO_STD;
use crate::core::types::{Address, PcbId, Pid, Priority, StackRef};
use tracing::{debug, info, warn};

/// Parameters for creating a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRequest {
    pub ppid: Pid,
    pub prio: Priority,
    /// Pre-allocated stack; taken from the stack allocator when absent
    pub stack: Option<StackRef>,
    pub context: Option<Address>,
}

impl SpawnRequest {
    pub fn new(ppid: Pid) -> Self {
        Self {
            ppid,
            prio: PRIO_STD,
            stack: None,
            context: None,
        }
    }

    #[must_use]
    pub fn with_prio(mut self, prio: Priority) -> Self {
        self.prio = prio;
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: StackRef) -> Self {
        self.stack = Some(stack);
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Address) -> Self {
        self.context = Some(context);
        self
    }
}

impl PcbSubsystem {
    /// Create and register a process
    ///
    /// On a full table the PCB goes back to the free pool and the stack back
    /// to the stack allocator before the error is returned. The PID drawn
    /// for the attempt is not reused.
    pub fn spawn(&mut self, request: SpawnRequest) -> PcbResult<PcbId> {
        if !self.config().is_valid_priority(request.prio) {
            warn!(prio = request.prio, ppid = request.ppid, "spawning with out-of-range priority");
        }

        let stack = match request.stack {
            Some(stack) => stack,
            None => self.stacks.allocate().ok_or(PcbError::NoStack)?,
        };

        let id = match self.try_allocate_pcb() {
            Ok(id) => id,
            Err(e) => {
                self.stacks.free(stack);
                return Err(e);
            }
        };

        let pid = self.next_pid();
        if let Some(pcb) = self.pcb_mut(id) {
            pcb.pid = pid;
            pcb.ppid = request.ppid;
            pcb.prio = request.prio;
            pcb.context = request.context;
            pcb.stack = Some(stack);
        }

        if let Err(e) = self.register_pcb(id) {
            self.rollback(id);
            return Err(e);
        }

        match self.find_by_pid(request.ppid).and_then(|parent| self.pcb_mut(parent)) {
            Some(parent) => parent.children += 1,
            None => debug!(pid, ppid = request.ppid, "parent not in process table"),
        }

        info!(%id, pid, ppid = request.ppid, prio = request.prio, "spawned process");
        Ok(id)
    }

    fn rollback(&mut self, id: PcbId) {
        if let Some(stack) = self.pcb_mut(id).and_then(|pcb| pcb.stack.take()) {
            self.stacks.free(stack);
        }
        if let Err(e) = self.pcbs.release(id) {
            warn!(%id, error = %e, "failed to roll back PCB");
        }
    }

    /// Tear a process down: free its stack, unregister it, release the PCB
    ///
    /// The registered parent, if any, loses one child. A PCB missing from the
    /// table is logged and still released.
    pub fn cleanup_pcb(&mut self, id: PcbId) -> PcbResult<()> {
        let pcb = match self.pcbs.get_mut(id) {
            Some(pcb) if pcb.is_live() => pcb,
            Some(_) => return precondition("pcb_cleanup", PcbError::DoubleRelease(id)),
            None => return precondition("pcb_cleanup", PcbError::InvalidHandle(id)),
        };
        let (pid, ppid) = (pcb.pid, pcb.ppid);

        if let Some(stack) = pcb.stack.take() {
            self.stacks.free(stack);
        }

        match self.table.unregister(id) {
            Ok(_) => {
                if let Some(parent) = self.find_by_pid(ppid).and_then(|parent| self.pcb_mut(parent)) {
                    parent.children = parent.children.saturating_sub(1);
                }
            }
            Err(e) => warn!(%id, pid, error = %e, "cleaning up PCB that was not registered"),
        }

        self.pcbs.release(id)?;
        debug!(%id, pid, "cleaned up PCB");
        Ok(())
    }
}
