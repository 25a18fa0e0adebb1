/*!
 * Bounded Block Allocator
 * Fixed budget of PCB blocks handed out by index
 */

use super::traits::BlockAllocator;
use crate::core::types::PcbId;
use tracing::warn;

/// Raw PCB allocator over a pre-allocated budget
///
/// Never-used indices are carved in order; returned indices are reused
/// most-recent-first.
#[derive(Debug)]
pub struct BoundedAllocator {
    budget: usize,
    next_fresh: u32,
    recycled: Vec<PcbId>,
    in_use: Vec<bool>,
}

impl BoundedAllocator {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            next_fresh: 0,
            recycled: Vec::new(),
            in_use: Vec::new(),
        }
    }

    /// Total blocks this allocator can ever hand out at once
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Blocks currently handed out
    pub fn outstanding(&self) -> usize {
        self.in_use.iter().filter(|used| **used).count()
    }

    /// Blocks still available
    pub fn available(&self) -> usize {
        self.budget - self.outstanding()
    }
}

impl BlockAllocator for BoundedAllocator {
    fn allocate(&mut self) -> Option<PcbId> {
        let id = match self.recycled.pop() {
            Some(id) => id,
            None if (self.next_fresh as usize) < self.budget => {
                let id = PcbId::new(self.next_fresh);
                self.next_fresh += 1;
                self.in_use.push(false);
                id
            }
            None => return None,
        };

        self.in_use[id.index()] = true;
        Some(id)
    }

    fn deallocate(&mut self, id: PcbId) {
        match self.in_use.get_mut(id.index()) {
            Some(used) if *used => {
                *used = false;
                self.recycled.push(id);
            }
            _ => warn!(%id, "deallocating a block that is not outstanding"),
        }
    }
}
