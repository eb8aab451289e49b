//! Host page lifecycle: drain webview events and track page loads.

use easel_webview::{PageLoadState, WebViewEvent};

use crate::app_state::core::EaselApp;

impl EaselApp {
    /// Drain and handle events from the host webview.
    pub(in crate::app_state) fn poll_webview_events(&mut self) {
        for event in self.webviews.drain_events() {
            self.handle_webview_event(event);
        }
    }

    pub(in crate::app_state) fn handle_webview_event(&mut self, event: WebViewEvent) {
        match event {
            WebViewEvent::IpcMessage { body } => self.handle_ipc_message(&body),
            WebViewEvent::PageLoad {
                state: PageLoadState::Started,
                url,
            } => {
                let from = self.webview.as_ref().map(|h| h.current_url()).unwrap_or("");
                tracing::info!(from, to = %url, "Host page loading");
                // Element handles and the editor frame die with the old page.
                self.session = None;
                self.host.detach();
            }
            WebViewEvent::PageLoad {
                state: PageLoadState::Finished,
                url,
            } => {
                tracing::info!(url = %url, "Host page loaded");
                self.host.reattach();
                if let Some(ref mut handle) = self.webview {
                    handle.set_current_url(url);
                }
            }
            WebViewEvent::NavigationAllowed { .. } | WebViewEvent::NavigationBlocked { .. } => {}
        }
    }
}
