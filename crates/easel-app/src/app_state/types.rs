//! Internal constants for the app state module.

use std::time::Duration;

/// How often to poll webview events and drain the script queue (approx 120 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(8);

/// How long shutdown waits for in-flight transfers.
pub(super) const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);
