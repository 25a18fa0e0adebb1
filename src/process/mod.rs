/*!
 * Process Module
 * Process control blocks, the process table and the PCB lifecycle
 */

pub mod allocator;
pub mod config;
pub mod lifecycle;
pub mod manager;
pub mod pid;
pub mod table;
pub mod types;

// Re-export for convenience
pub use allocator::{AllocatorStats, PcbAllocator};
pub use config::PcbConfig;
pub use lifecycle::SpawnRequest;
pub use manager::{PcbSubsystem, PcbSubsystemBuilder, SharedPcbSubsystem, SubsystemStats};
pub use pid::PidAllocator;
pub use table::ProcessTable;
pub use types::{Context, Pcb, ProcessState, StateLabel};
