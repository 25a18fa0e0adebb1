/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{PcbId, Pid};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// PCB operation result
pub type PcbResult<T> = Result<T, PcbError>;

/// PCB subsystem errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum PcbError {
    #[error("PCB storage exhausted after {attempts} allocation attempts")]
    #[diagnostic(
        code(pcb::exhausted),
        help("No free PCB blocks remain and reclaiming idle storage freed nothing.")
    )]
    Exhausted { attempts: usize },

    #[error("Process table full ({capacity} slots)")]
    #[diagnostic(
        code(pcb::table_full),
        help("Fail the process creation and release the freshly allocated PCB.")
    )]
    TableFull { capacity: usize },

    #[error("{0} is not in the process table")]
    #[diagnostic(code(pcb::not_registered))]
    NotRegistered(PcbId),

    #[error("{0} is already in the process table")]
    #[diagnostic(code(pcb::already_registered))]
    AlreadyRegistered(PcbId),

    #[error("PID {0} is already registered")]
    #[diagnostic(
        code(pcb::duplicate_pid),
        help("Assign a fresh PID from the subsystem counter before registering.")
    )]
    DuplicatePid(Pid),

    #[error("{0} does not refer to a live PCB block")]
    #[diagnostic(code(pcb::invalid_handle))]
    InvalidHandle(PcbId),

    #[error("{0} was released twice")]
    #[diagnostic(code(pcb::double_release))]
    DoubleRelease(PcbId),

    #[error("{0} still owns an execution stack")]
    #[diagnostic(
        code(pcb::stack_attached),
        help("Take the stack out of the PCB and free it before releasing the block.")
    )]
    StackAttached(PcbId),

    #[error("No execution stack available")]
    #[diagnostic(code(pcb::no_stack))]
    NoStack,

    #[error("Free PCB pool unavailable: {0}")]
    #[diagnostic(code(pcb::pool_unavailable))]
    PoolUnavailable(String),

    #[error("Invalid PCB configuration: {0}")]
    #[diagnostic(
        code(pcb::invalid_config),
        help("Table and pool capacities must be non-zero.")
    )]
    InvalidConfig(String),
}

impl PcbError {
    /// Errors in this class leave no recovery path at the PCB layer
    pub fn is_fatal(&self) -> bool {
        matches!(self, PcbError::Exhausted { .. } | PcbError::PoolUnavailable(_))
    }
}

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("PCB error: {0}")]
    #[diagnostic(transparent)]
    Pcb(#[from] PcbError),

    #[error("Internal error: {0}")]
    #[diagnostic(
        code(kernel::internal_error),
        help("An unexpected internal error occurred. Please report this issue.")
    )]
    Internal(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(kernel::configuration_error),
        help("Invalid configuration. Review configuration parameters.")
    )]
    Configuration(String),
}

impl From<std::fmt::Error> for KernelError {
    fn from(err: std::fmt::Error) -> Self {
        KernelError::Internal(err.to_string())
    }
}

impl From<&str> for KernelError {
    fn from(msg: &str) -> Self {
        KernelError::Internal(msg.to_string())
    }
}
