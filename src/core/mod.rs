/*!
 * Core Module
 * Fundamental kernel types, limits and error handling
 */

pub mod errors;
pub mod limits;
pub mod panic;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use panic::kpanic;
pub use types::*;
