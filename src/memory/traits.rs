/*!
 * Memory Traits
 * Storage collaborators consumed by the PCB subsystem
 */

use crate::core::types::{PcbId, Size, StackRef};

/// Raw PCB block allocator
///
/// Hands out storage for exactly one PCB per call. Returning `None` means
/// "no memory"; the caller decides whether that is fatal.
pub trait BlockAllocator: Send {
    /// Obtain a fresh block
    fn allocate(&mut self) -> Option<PcbId>;

    /// Give a block back to the allocator
    fn deallocate(&mut self, id: PcbId);
}

/// Execution stack allocator
pub trait StackAllocator: Send {
    /// Obtain a stack for a new process
    fn allocate(&mut self) -> Option<StackRef>;

    /// Take ownership of a stack released by a terminating process
    fn free(&mut self, stack: StackRef);

    /// Return idle cached stacks to the backing store, reporting bytes reclaimed
    fn prune(&mut self) -> Size {
        0
    }
}

impl<T: BlockAllocator + ?Sized> BlockAllocator for Box<T> {
    fn allocate(&mut self) -> Option<PcbId> {
        (**self).allocate()
    }

    fn deallocate(&mut self, id: PcbId) {
        (**self).deallocate(id)
    }
}

impl<T: StackAllocator + ?Sized> StackAllocator for Box<T> {
    fn allocate(&mut self) -> Option<StackRef> {
        (**self).allocate()
    }

    fn free(&mut self, stack: StackRef) {
        (**self).free(stack)
    }

    fn prune(&mut self) -> Size {
        (**self).prune()
    }
}
