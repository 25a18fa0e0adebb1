/*!
 * PCB Allocator
 * Reuse-before-allocate PCB storage with a bounded reclaim-and-retry
 */

use crate::core::errors::{PcbError, PcbResult};
use crate::core::limits::ALLOC_ATTEMPTS;
use crate::core::types::{PcbId, Size};
use crate::memory::arena::PcbArena;
use crate::memory::pool::FreePool;
use crate::memory::traits::{BlockAllocator, StackAllocator};
use crate::process::types::{Pcb, ProcessState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Allocation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocatorStats {
    /// Allocations served from the free pool
    pub pool_hits: u64,
    /// Successful raw allocator calls
    pub fresh_allocations: u64,
    /// Raw allocator calls that returned no memory
    pub raw_failures: u64,
    /// Reclaim steps run on allocation failure
    pub reclaims: u64,
    /// PCBs returned through `release`
    pub releases: u64,
    /// Releases that bypassed a full pool
    pub pool_overflows: u64,
    /// Bytes handed back to the raw allocator by pruning
    pub pruned_bytes: u64,
}

/// PCB storage: arena, free pool and raw allocator
pub struct PcbAllocator {
    arena: PcbArena,
    pool: FreePool,
    raw: Box<dyn BlockAllocator>,
    stats: AllocatorStats,
}

impl PcbAllocator {
    pub fn new(pool: FreePool, raw: Box<dyn BlockAllocator>) -> Self {
        Self {
            arena: PcbArena::new(),
            pool,
            raw,
            stats: AllocatorStats::default(),
        }
    }

    /// Obtain a zeroed PCB in state `New`
    ///
    /// The free pool is consulted first. When the raw allocator is out of
    /// memory the reclaim step runs once (pool drain plus stack prune); if it
    /// frees nothing, or the single retry also fails, the result is
    /// `PcbError::Exhausted`.
    pub fn allocate(&mut self, stacks: &mut dyn StackAllocator) -> PcbResult<PcbId> {
        let id = match self.pool.take() {
            Some(id) => {
                self.stats.pool_hits += 1;
                id
            }
            None => self.allocate_fresh(stacks)?,
        };

        self.arena.reset(id);
        debug!(%id, "allocated PCB");
        Ok(id)
    }

    fn allocate_fresh(&mut self, stacks: &mut dyn StackAllocator) -> PcbResult<PcbId> {
        for attempt in 1..=ALLOC_ATTEMPTS {
            if let Some(id) = self.raw.allocate() {
                self.stats.fresh_allocations += 1;
                return Ok(id);
            }
            self.stats.raw_failures += 1;

            if attempt == ALLOC_ATTEMPTS {
                break;
            }

            self.stats.reclaims += 1;
            let reclaimed = self.prune() + stacks.prune();
            warn!(attempt, reclaimed, "raw PCB allocation failed, reclaimed idle storage");
            if reclaimed == 0 {
                return Err(PcbError::Exhausted { attempts: attempt });
            }
        }

        Err(PcbError::Exhausted {
            attempts: ALLOC_ATTEMPTS,
        })
    }

    /// Retire a PCB and store it for reuse
    ///
    /// The caller has already unregistered it and released its stack. A block
    /// still holding a stack is left untouched.
    pub fn release(&mut self, id: PcbId) -> PcbResult<()> {
        let pcb = self.arena.get_mut(id).ok_or(PcbError::InvalidHandle(id))?;
        if pcb.state == ProcessState::Unused {
            return Err(PcbError::DoubleRelease(id));
        }
        if pcb.stack.is_some() {
            return Err(PcbError::StackAttached(id));
        }

        pcb.retire();
        self.stats.releases += 1;

        if let Err(id) = self.pool.release(id) {
            self.stats.pool_overflows += 1;
            self.arena.evict(id);
            self.raw.deallocate(id);
            debug!(%id, "free pool full, block returned to raw allocator");
        } else {
            debug!(%id, pooled = self.pool.size(), "released PCB to free pool");
        }
        Ok(())
    }

    /// Drain the free pool back to the raw allocator
    pub fn prune(&mut self) -> Size {
        let bytes = self.pool.drain_and_reclaim(&mut self.arena, self.raw.as_mut());
        self.stats.pruned_bytes += bytes as u64;
        bytes
    }

    /// Give every held block back to the raw allocator
    pub fn release_all(&mut self) -> usize {
        self.prune();
        let held: Vec<PcbId> = self.arena.iter().map(|(id, _)| id).collect();
        for id in &held {
            self.arena.evict(*id);
            self.raw.deallocate(*id);
        }
        if !held.is_empty() {
            info!(blocks = held.len(), "returned live PCB blocks to raw allocator");
        }
        held.len()
    }

    #[inline]
    pub fn get(&self, id: PcbId) -> Option<&Pcb> {
        self.arena.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: PcbId) -> Option<&mut Pcb> {
        self.arena.get_mut(id)
    }

    #[inline]
    pub fn arena(&self) -> &PcbArena {
        &self.arena
    }

    #[inline]
    pub fn pool(&self) -> &FreePool {
        &self.pool
    }

    #[inline]
    pub fn stats(&self) -> AllocatorStats {
        self.stats
    }
}

impl std::fmt::Debug for PcbAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcbAllocator")
            .field("blocks", &self.arena.len())
            .field("pool", &self.pool)
            .field("stats", &self.stats)
            .finish()
    }
}
