use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use crate::events::{PageLoadState, WebViewEvent};

use super::WebViewManager;

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// Check whether a URL starts with one of the allowed prefixes.
///
/// Prefixes come from `[host] allowed_origins` plus the host URL itself.
/// Everything else is blocked.
pub fn is_navigation_allowed(prefixes: &[String], url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && prefixes.iter().any(|prefix| url.starts_with(prefix.as_str()))
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();

            // Validate that the IPC body is valid JSON before forwarding
            if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                warn!(body_len = body.len(), "IPC message rejected: invalid JSON");
                return;
            }

            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::IpcMessage { body });
            }
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(?state, url = %url, "page load");
            if let Ok(mut evts) = events.lock() {
                evts.push(WebViewEvent::PageLoad { state, url });
            }
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: Arc<Mutex<Vec<WebViewEvent>>>,
        allowed: Vec<String>,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            let allow = is_navigation_allowed(&allowed, &url);
            if allow {
                debug!(url = %url, "navigation allowed");
            } else {
                warn!(url = %url, "navigation blocked: URL not in allowlist");
            }
            if let Ok(mut evts) = events.lock() {
                evts.push(if allow {
                    WebViewEvent::NavigationAllowed { url }
                } else {
                    WebViewEvent::NavigationBlocked { url }
                });
            }
            allow
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
