//! Window creation, host webview setup, and config reload startup.

use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use easel_config::ReloadManager;
use easel_webview::WebViewConfig;

use super::core::EaselApp;
use super::webview_bridge::window_bounds;

// =============================================================================
// INITIALIZATION
// =============================================================================

impl EaselApp {
    /// Create the window and the host webview inside it.
    /// Returns `false` if initialization failed and the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let size = window
            .inner_size()
            .to_logical::<f64>(window.scale_factor());
        let webview_config = WebViewConfig::for_host(&self.config);
        match self
            .webviews
            .create(window.as_ref(), window_bounds(size.width, size.height), webview_config)
        {
            Ok(handle) => self.webview = Some(handle),
            Err(e) => {
                tracing::error!("Failed to create host webview: {e}");
                return false;
            }
        }

        self.window = Some(window);
        tracing::info!(url = %self.config.host.url, "Window and host webview created");
        true
    }

    /// Start watching the config file. Reloaded configs are picked up on
    /// the next poll.
    pub(super) fn start_config_reload(&mut self) {
        let (Some(rt), Some(path)) = (self.tokio_runtime.as_ref(), self.config_path.clone())
        else {
            tracing::debug!("config reload disabled");
            return;
        };

        let (_, rx) = rt.block_on(ReloadManager::start(path));
        self.config_rx = Some(rx);
        tracing::info!("Config live reload enabled");
    }
}
