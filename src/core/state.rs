//! Process state for graceful Ctrl+C handling.
//!
//! Two flags:
//! - `WATCHING`: Is a watch loop running that can shut itself down?
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C or SIGTERM received)

use std::sync::atomic::{AtomicBool, Ordering};

/// A watch loop is polling `SHUTDOWN`
static WATCHING: AtomicBool = AtomicBool::new(false);

/// Shutdown has been requested
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - While watching: sets SHUTDOWN, the watch loop stops and joins its thread
/// - Otherwise: exits immediately, a one-shot compile has nothing to clean up
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        request_shutdown();

        if WATCHING.load(Ordering::SeqCst) {
            crate::log!("watch"; "shutting down...");
        } else {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Ask the watch loop to stop
fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// WATCHING state
// =============================================================================

/// Mark whether a watch loop is running
pub fn set_watching(watching: bool) {
    WATCHING.store(watching, Ordering::SeqCst);
}
