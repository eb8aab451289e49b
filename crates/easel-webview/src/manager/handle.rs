use tracing::warn;
use wry::WebView;

use crate::queue::ScriptQueue;

/// Handle to the host WebView.
pub struct WebViewHandle {
    /// The underlying wry WebView.
    pub(super) webview: WebView,
    /// Current URL (best-effort tracking).
    pub(super) current_url: String,
}

impl WebViewHandle {
    /// Get the current URL.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Track a URL reported by a page load.
    pub fn set_current_url(&mut self, url: String) {
        self.current_url = url;
    }

    /// Execute JavaScript in the WebView context.
    pub fn evaluate_script(&self, js: &str) -> Result<(), wry::Error> {
        self.webview.evaluate_script(js)
    }

    /// Evaluate every queued script. Returns how many ran.
    pub fn run_queue(&self, queue: &ScriptQueue) -> usize {
        let scripts = queue.drain();
        for script in &scripts {
            if let Err(e) = self.evaluate_script(script) {
                warn!(error = %e, script_len = script.len(), "script evaluation failed");
            }
        }
        scripts.len()
    }

    /// Set the WebView bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    /// Open devtools (if enabled).
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }
}
