/*!
 * PCB Subsystem
 * Owns the process table, PCB storage and the next-PID counter
 */

use super::allocator::{AllocatorStats, PcbAllocator};
use super::config::PcbConfig;
use super::pid::PidAllocator;
use super::table::ProcessTable;
use super::types::Pcb;
use crate::core::errors::{PcbError, PcbResult};
use crate::core::limits::DEFAULT_BLOCK_BUDGET;
use crate::core::panic::kpanic;
use crate::core::types::{PcbId, Pid, Size};
use crate::memory::allocator::BoundedAllocator;
use crate::memory::arena::PcbArena;
use crate::memory::pool::FreePool;
use crate::memory::stack::StackPool;
use crate::memory::traits::{BlockAllocator, StackAllocator};
use crate::monitoring::span_operation;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Single kernel-wide instance behind the big lock
pub type SharedPcbSubsystem = Arc<Mutex<PcbSubsystem>>;

/// Subsystem-wide counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubsystemStats {
    pub active: usize,
    pub capacity: usize,
    pub pooled: usize,
    pub pool_capacity: usize,
    pub blocks_held: usize,
    pub next_pid: Pid,
    pub allocator: AllocatorStats,
}

/// The PCB subsystem context
///
/// Callers hold whatever lock the kernel uses around every call; nothing
/// in here locks or blocks.
pub struct PcbSubsystem {
    config: PcbConfig,
    pids: PidAllocator,
    pub(super) pcbs: PcbAllocator,
    pub(super) table: ProcessTable,
    pub(super) stacks: Box<dyn StackAllocator>,
    init_pcb: Option<PcbId>,
}

/// Builder for PcbSubsystem
pub struct PcbSubsystemBuilder {
    config: PcbConfig,
    allocator: Option<Box<dyn BlockAllocator>>,
    stacks: Option<Box<dyn StackAllocator>>,
}

impl PcbSubsystemBuilder {
    pub fn new() -> Self {
        Self {
            config: PcbConfig::default(),
            allocator: None,
            stacks: None,
        }
    }

    pub fn with_config(mut self, config: PcbConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific raw PCB block allocator
    pub fn with_allocator(mut self, allocator: impl BlockAllocator + 'static) -> Self {
        self.allocator = Some(Box::new(allocator));
        self
    }

    /// Use a specific execution-stack allocator
    pub fn with_stack_allocator(mut self, stacks: impl StackAllocator + 'static) -> Self {
        self.stacks = Some(Box::new(stacks));
        self
    }

    /// Build, halting on failure
    pub fn build(self) -> PcbSubsystem {
        match self.try_build() {
            Ok(subsystem) => subsystem,
            Err(e) => kpanic("pcb_init", &e.to_string()),
        }
    }

    pub fn try_build(self) -> PcbResult<PcbSubsystem> {
        let allocator = self
            .allocator
            .unwrap_or_else(|| Box::new(BoundedAllocator::new(DEFAULT_BLOCK_BUDGET)));
        let stacks = self
            .stacks
            .unwrap_or_else(|| Box::new(StackPool::default()));
        PcbSubsystem::try_init(self.config, allocator, stacks)
    }
}

impl Default for PcbSubsystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PcbSubsystem {
    /// Initialize the subsystem, halting if the free pool cannot be created
    pub fn init(
        config: PcbConfig,
        allocator: Box<dyn BlockAllocator>,
        stacks: Box<dyn StackAllocator>,
    ) -> Self {
        match Self::try_init(config, allocator, stacks) {
            Ok(subsystem) => subsystem,
            Err(e) => kpanic("pcb_init", &e.to_string()),
        }
    }

    /// Seed the PID counter, create the free pool, clear the table
    pub fn try_init(
        config: PcbConfig,
        allocator: Box<dyn BlockAllocator>,
        stacks: Box<dyn StackAllocator>,
    ) -> PcbResult<Self> {
        config.validate()?;
        let pool = FreePool::new(config.pool_capacity)?;

        info!(
            max_procs = config.max_procs,
            pool_capacity = config.pool_capacity,
            first_pid = config.first_user_pid,
            "PCB subsystem initialized"
        );

        Ok(Self {
            config,
            pids: PidAllocator::new(config.first_user_pid),
            pcbs: PcbAllocator::new(pool, allocator),
            table: ProcessTable::new(config.max_procs),
            stacks,
            init_pcb: None,
        })
    }

    /// Default configuration with the bundled allocators
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> PcbSubsystemBuilder {
        PcbSubsystemBuilder::new()
    }

    /// Wrap in the kernel big-lock
    pub fn into_shared(self) -> SharedPcbSubsystem {
        Arc::new(Mutex::new(self))
    }

    /// Tear the subsystem down, returning every block to the raw allocator
    ///
    /// Returns the bytes reclaimed from the free pool.
    pub fn shutdown(mut self) -> Size {
        let span = span_operation("shutdown");
        let live: Vec<PcbId> = self.table.iter().map(|(_, id)| id).collect();
        for &id in &live {
            if let Some(stack) = self.pcbs.get_mut(id).and_then(|pcb| pcb.stack.take()) {
                self.stacks.free(stack);
            }
        }
        self.table.clear();
        span.record_items(live.len());

        let bytes = self.pcbs.prune();
        let leftover = self.pcbs.release_all();
        self.stacks.prune();
        info!(bytes, leftover, "PCB subsystem shut down");
        bytes
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    /// Allocate a PCB, halting the kernel if storage is exhausted
    pub fn allocate_pcb(&mut self) -> PcbId {
        match self.try_allocate_pcb() {
            Ok(id) => id,
            Err(e) => kpanic("pcb_alloc", &e.to_string()),
        }
    }

    /// Allocate a PCB, reporting exhaustion instead of halting
    pub fn try_allocate_pcb(&mut self) -> PcbResult<PcbId> {
        self.pcbs.allocate(self.stacks.as_mut())
    }

    /// Return an unregistered, stackless PCB to the free pool
    pub fn release_pcb(&mut self, id: PcbId) -> PcbResult<()> {
        if self.table.contains(id) {
            return precondition("pcb_release", PcbError::AlreadyRegistered(id));
        }
        match self.pcbs.release(id) {
            Ok(()) => Ok(()),
            Err(e) => precondition("pcb_release", e),
        }
    }

    /// Drain the free pool back to the raw allocator
    pub fn prune(&mut self) -> Size {
        let _span = span_operation("prune");
        let bytes = self.pcbs.prune();
        debug!(bytes, "pruned free PCB pool");
        bytes
    }

    // =========================================================================
    // Process table
    // =========================================================================

    pub fn find_by_pid(&self, pid: Pid) -> Option<PcbId> {
        self.table.find_by_pid(self.pcbs.arena(), pid)
    }

    /// Any one child of `ppid`
    pub fn find_by_ppid(&self, ppid: Pid) -> Option<PcbId> {
        self.table.find_by_ppid(self.pcbs.arena(), ppid)
    }

    /// Add a live PCB to the table, returning its slot
    pub fn register_pcb(&mut self, id: PcbId) -> PcbResult<usize> {
        self.table.register(self.pcbs.arena(), id)
    }

    /// Remove a PCB from the table, returning the slot it occupied
    pub fn unregister_pcb(&mut self, id: PcbId) -> PcbResult<usize> {
        self.table.unregister(id).map_err(|e| {
            warn!(%id, "unregistering a PCB that is not in the table");
            e
        })
    }

    // =========================================================================
    // PID counter and init process
    // =========================================================================

    /// Allocate the next PID
    pub fn next_pid(&mut self) -> Pid {
        match self.pids.next() {
            Some(pid) => pid,
            None => kpanic("pcb_next_pid", "PID space exhausted"),
        }
    }

    /// Record the PCB of the initial process
    pub fn set_init_process(&mut self, id: PcbId) -> PcbResult<()> {
        if !self.pcbs.get(id).is_some_and(Pcb::is_live) {
            return Err(PcbError::InvalidHandle(id));
        }
        self.init_pcb = Some(id);
        Ok(())
    }

    /// PCB of the initial process, while it is still live
    pub fn init_process(&self) -> Option<PcbId> {
        self.init_pcb
            .filter(|id| self.pcbs.get(*id).is_some_and(Pcb::is_live))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn pcb(&self, id: PcbId) -> Option<&Pcb> {
        self.pcbs.get(id)
    }

    /// Direct field access for other subsystems (state, priority, ticks, ...)
    #[inline]
    pub fn pcb_mut(&mut self, id: PcbId) -> Option<&mut Pcb> {
        self.pcbs.get_mut(id)
    }

    #[inline]
    pub fn config(&self) -> &PcbConfig {
        &self.config
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.table.used()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pcbs.pool().size()
    }

    #[inline]
    pub fn is_registered(&self, id: PcbId) -> bool {
        self.table.contains(id)
    }

    #[inline]
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    #[inline]
    pub fn arena(&self) -> &PcbArena {
        self.pcbs.arena()
    }

    pub fn stats(&self) -> SubsystemStats {
        SubsystemStats {
            active: self.table.used(),
            capacity: self.table.capacity(),
            pooled: self.pcbs.pool().size(),
            pool_capacity: self.pcbs.pool().capacity(),
            blocks_held: self.pcbs.arena().len(),
            next_pid: self.pids.peek(),
            allocator: self.pcbs.stats(),
        }
    }
}

impl Default for PcbSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PcbSubsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcbSubsystem")
            .field("config", &self.config)
            .field("table", &self.table)
            .field("pcbs", &self.pcbs)
            .finish()
    }
}

/// Precondition violations halt debug builds and are reported otherwise
#[track_caller]
pub(super) fn precondition<T>(component: &str, err: PcbError) -> PcbResult<T> {
    if cfg!(debug_assertions) {
        kpanic(component, &err.to_string());
    }
    warn!(component, error = %err, "PCB precondition violated");
    Err(err)
}
