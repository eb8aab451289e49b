use std::sync::Arc;

use tracing::debug;
use wry::raw_window_handle;
use wry::WebViewBuilder;

use super::handle::WebViewHandle;
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create a new WebView as a child of the given window.
    ///
    /// The `window` must implement `raw_window_handle::HasWindowHandle`.
    /// The WebView is positioned at `bounds` within the parent window.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<WebViewHandle, wry::Error> {
        let events = Arc::clone(&self.events);

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_devtools(config.devtools)
            .with_clipboard(config.clipboard)
            .with_focused(true);

        for script in &config.init_scripts {
            builder = builder.with_initialization_script(script);
        }

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        // IPC handler: JS -> Rust
        builder = Self::attach_ipc_handler(builder, Arc::clone(&events));

        // Page load handler
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events));

        // Navigation handler, restricted to the configured allowlist
        builder = Self::attach_navigation_handler(
            builder,
            Arc::clone(&events),
            config.allowed_navigation.clone(),
        );

        builder = builder.with_url(&config.url);

        let webview = builder.build_as_child(window)?;

        debug!(url = %config.url, scripts = config.init_scripts.len(), "WebView created");

        Ok(WebViewHandle {
            webview,
            current_url: config.url,
        })
    }
}
