/*!
 * Monitoring
 * Console dumps, structured snapshots and tracing setup
 */

pub mod dump;
pub mod snapshot;
mod tracer;

pub use dump::{write_context, write_pcb, write_table, TableReport};
pub use snapshot::{ProcessEntry, TableSnapshot};
pub use tracer::{init_tracing, span_operation, OperationSpan};
