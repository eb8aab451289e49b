//! Polling of webview events, the script queue, and config reloads.

use std::time::Instant;

use winit::event_loop::ActiveEventLoop;

use super::core::EaselApp;
use super::types::POLL_INTERVAL;

impl EaselApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_config_reload();
            self.poll_webview_events();
            self.flush_script_queue();
        }

        event_loop.set_control_flow(winit::event_loop::ControlFlow::WaitUntil(
            Instant::now() + POLL_INTERVAL,
        ));
    }

    /// Evaluate scripts queued by async flows on the UI thread.
    pub(super) fn flush_script_queue(&mut self) {
        if let Some(ref handle) = self.webview {
            let ran = handle.run_queue(&self.queue);
            if ran > 0 {
                tracing::trace!(scripts = ran, "script queue flushed");
            }
        }
    }

    /// Apply a config the reload watcher published since the last poll.
    pub(super) fn poll_config_reload(&mut self) {
        let Some(ref mut rx) = self.config_rx else {
            return;
        };
        if !rx.has_changed().unwrap_or(false) {
            return;
        }
        let mut config = rx.borrow_and_update().clone();
        // The host page is already loaded.
        config.host.url = self.config.host.url.clone();
        self.apply_config(config);
    }

    /// Swap in a new config. The widget mapping and transfer settings apply
    /// to the next flow; the page runtime keeps its settings until reload.
    pub(super) fn apply_config(&mut self, config: easel_config::EaselConfig) {
        if let Some(ref mut session) = self.session {
            session.reconfigure(self.host.clone(), &config);
        }
        self.config = config;
        tracing::info!(
            widgets_version = self.config.widgets.version,
            "Config reloaded"
        );
    }
}
