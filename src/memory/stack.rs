/*!
 * Stack Pool
 * Bundled execution-stack allocator carving fixed-size stacks from a region
 */

use super::traits::StackAllocator;
use crate::core::limits::{DEFAULT_STACK_BUDGET, STACK_REGION_BASE, STACK_SIZE};
use crate::core::types::{Address, Size, StackRef};
use tracing::{debug, warn};

/// Fixed-size stack allocator
///
/// Freed stacks are cached for the next process; `prune` hands the cache
/// back to the region.
#[derive(Debug)]
pub struct StackPool {
    base: Address,
    stack_size: Size,
    budget: usize,
    carved: usize,
    cached: Vec<StackRef>,
    spare: Vec<StackRef>,
    outstanding: usize,
}

impl StackPool {
    pub fn new(base: Address, stack_size: Size, budget: usize) -> Self {
        Self {
            base,
            stack_size,
            budget,
            carved: 0,
            cached: Vec::new(),
            spare: Vec::new(),
            outstanding: 0,
        }
    }

    /// Stacks currently owned by processes
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Freed stacks waiting for reuse
    pub fn cached(&self) -> usize {
        self.cached.len()
    }

    fn carve(&mut self) -> Option<StackRef> {
        if self.carved >= self.budget {
            return None;
        }
        let stack = StackRef::new(self.base + self.carved * self.stack_size, self.stack_size);
        self.carved += 1;
        Some(stack)
    }

    fn owns(&self, stack: &StackRef) -> bool {
        let end = self.base + self.carved * self.stack_size;
        stack.base >= self.base
            && stack.base < end
            && (stack.base - self.base) % self.stack_size == 0
            && stack.len == self.stack_size
    }
}

impl Default for StackPool {
    fn default() -> Self {
        Self::new(STACK_REGION_BASE, STACK_SIZE, DEFAULT_STACK_BUDGET)
    }
}

impl StackAllocator for StackPool {
    fn allocate(&mut self) -> Option<StackRef> {
        let stack = self
            .cached
            .pop()
            .or_else(|| self.spare.pop())
            .or_else(|| self.carve())?;
        self.outstanding += 1;
        Some(stack)
    }

    fn free(&mut self, stack: StackRef) {
        if !self.owns(&stack) || self.outstanding == 0 {
            warn!(base = stack.base, len = stack.len, "freeing a stack this pool never handed out");
            return;
        }
        if self.cached.contains(&stack) || self.spare.contains(&stack) {
            warn!(base = stack.base, len = stack.len, "stack freed twice");
            return;
        }
        self.outstanding -= 1;
        self.cached.push(stack);
    }

    fn prune(&mut self) -> Size {
        let count = self.cached.len();
        self.spare.append(&mut self.cached);
        let bytes = count * self.stack_size;
        if bytes > 0 {
            debug!(count, bytes, "pruned idle stacks");
        }
        bytes
    }
}
