/*!
 * PCB Kernel Library
 * Process control block management: storage, reuse, the active-process
 * table and console diagnostics
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod process;

// Re-exports
pub use crate::core::errors::{KernelError, PcbError, PcbResult};
pub use crate::core::panic::kpanic;
pub use crate::core::types::{Address, PcbId, Pid, Priority, Size, StackRef, NO_PID};
pub use memory::{BlockAllocator, BoundedAllocator, StackAllocator, StackPool};
pub use monitoring::{init_tracing, TableReport, TableSnapshot};
pub use process::{
    Context, Pcb, PcbConfig, PcbSubsystem, PcbSubsystemBuilder, ProcessState, SharedPcbSubsystem,
    SpawnRequest, SubsystemStats,
};
