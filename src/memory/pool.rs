/*!
 * Free PCB Pool
 * Recycles released PCB blocks before falling back to the raw allocator
 */

use super::arena::PcbArena;
use super::traits::BlockAllocator;
use crate::core::errors::{PcbError, PcbResult};
use crate::core::limits::PCB_BLOCK_SIZE;
use crate::core::types::{PcbId, Size};
use crossbeam_queue::ArrayQueue;
use tracing::{debug, info};

/// Bounded FIFO of released PCB blocks
///
/// Only blocks that went through `release` are ever stored, so `take`
/// cannot hand out an active PCB.
pub struct FreePool {
    queue: ArrayQueue<PcbId>,
}

impl FreePool {
    /// Create the pool's backing queue
    pub fn new(capacity: usize) -> PcbResult<Self> {
        if capacity == 0 {
            return Err(PcbError::PoolUnavailable(
                "pool capacity must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            queue: ArrayQueue::new(capacity),
        })
    }

    /// Store a released block; hands it back if the pool is full
    #[inline]
    pub fn release(&self, id: PcbId) -> Result<(), PcbId> {
        self.queue.push(id)
    }

    /// Remove one block, if any
    #[inline]
    pub fn take(&self) -> Option<PcbId> {
        self.queue.pop()
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Return every pooled block to the raw allocator
    ///
    /// Returns the number of bytes reclaimed.
    pub fn drain_and_reclaim(
        &self,
        arena: &mut PcbArena,
        allocator: &mut dyn BlockAllocator,
    ) -> Size {
        let mut count = 0;
        while let Some(id) = self.queue.pop() {
            arena.evict(id);
            allocator.deallocate(id);
            count += 1;
        }

        let bytes = count * PCB_BLOCK_SIZE;
        if count > 0 {
            info!(blocks = count, bytes, "reclaimed pooled PCB blocks");
        } else {
            debug!("free PCB pool already empty");
        }
        bytes
    }
}

impl std::fmt::Debug for FreePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreePool")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .finish()
    }
}
