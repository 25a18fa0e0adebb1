/*!
 * Memory Module
 * PCB block storage, the free-PCB pool and stack allocation
 *
 * # Layout
 *
 * - **Arena**: index-addressed PCB records
 * - **Pool**: released blocks waiting for reuse
 * - **Allocator**: bounded raw block budget
 * - **Stack**: fixed-size execution stacks
 */

pub mod allocator;
pub mod arena;
pub mod pool;
pub mod stack;
pub mod traits;

// Re-export for convenience
pub use allocator::BoundedAllocator;
pub use arena::PcbArena;
pub use pool::FreePool;
pub use stack::StackPool;
pub use traits::{BlockAllocator, StackAllocator};
