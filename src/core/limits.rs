/*!
 * System Limits and Constants
 *
 * Centralized location for the PCB subsystem's limits and magic numbers.
 * Values are grouped by domain; the runtime-tunable ones are mirrored in
 * `PcbConfig`.
 */

use std::mem::size_of;

// =============================================================================
// PROCESS TABLE
// =============================================================================

/// Slots in the active-process table
pub const MAX_PROCS: usize = 32;

/// First PID handed out to user processes
/// Everything below is reserved for kernel-created processes
pub const PID_FIRST_USER: u32 = 100;

// =============================================================================
// PRIORITIES
// =============================================================================

/// Highest (most urgent) priority
pub const PRIO_HIGH: u8 = 0;

/// Default priority for user processes
pub const PRIO_STD: u8 = 1;

/// Low priority
pub const PRIO_LOW: u8 = 2;

/// Largest valid priority value
pub const PRIO_MAX: u8 = 3;

// =============================================================================
// PCB STORAGE
// =============================================================================

/// Free PCB pool capacity
/// Two pooled blocks per table slot absorbs fork/exit churn
pub const DEFAULT_POOL_CAPACITY: usize = MAX_PROCS * 2;

/// Raw PCB block budget for the bundled allocator
pub const DEFAULT_BLOCK_BUDGET: usize = MAX_PROCS * 4;

/// Bytes accounted per PCB block when reporting reclaimed memory
pub const PCB_BLOCK_SIZE: usize = size_of::<crate::process::Pcb>();

/// Raw allocation attempts per `allocate` call (first try + one retry after reclaim)
pub const ALLOC_ATTEMPTS: usize = 2;

// =============================================================================
// STACKS
// =============================================================================

/// Execution stack size in bytes (1024 quadwords)
pub const STACK_SIZE: usize = 1024 * 8;

/// Base address of the bundled stack region
pub const STACK_REGION_BASE: usize = 0x0010_0000;

/// Stacks the bundled stack allocator can hand out
pub const DEFAULT_STACK_BUDGET: usize = MAX_PROCS * 2;
