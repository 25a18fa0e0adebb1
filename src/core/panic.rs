/*!
 * Kernel Panic
 * Halt path for unrecoverable conditions
 */

use tracing::error;

/// Halt the kernel with a labeled diagnostic
///
/// Logs the failure at `error` level before unwinding so the message is
/// captured by the tracing subscriber even when the panic hook is silent.
#[cold]
#[track_caller]
pub fn kpanic(component: &str, message: &str) -> ! {
    error!(component, message, "kernel panic");
    panic!("{}: {}", component, message);
}
