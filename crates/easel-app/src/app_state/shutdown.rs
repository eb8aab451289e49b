//! Graceful shutdown: end the editor session, drop the webview, stop async work.

use super::core::EaselApp;
use super::types::SHUTDOWN_GRACE;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl EaselApp {
    /// Perform graceful shutdown of all subsystems.
    ///
    /// Order matters:
    /// 1. Close the editor session (pending sends fail with `Closed`)
    /// 2. Detach the host (pending primitives fail)
    /// 3. Destroy the webview
    /// 4. Shut down the tokio runtime (cancels transfers and the config watcher)
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");

        self.session = None;
        self.host.detach();
        self.webview = None;
        self.config_rx = None;
        self.queue.drain();

        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(SHUTDOWN_GRACE);
        }

        self.should_exit = true;
        tracing::info!("Graceful shutdown complete");
    }
}

// =============================================================================
// TESTS
// =============================================================================
