//! EaselApp struct definition and constructor.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use winit::window::Window;

use easel_config::schema::EaselConfig;
use easel_webview::{ScriptQueue, WebViewHandle, WebViewHost, WebViewManager};

use super::session::EditorSession;

/// Top-level application state.
pub struct EaselApp {
    pub(super) config: EaselConfig,
    pub(super) config_path: Option<PathBuf>,
    pub(super) config_rx: Option<watch::Receiver<EaselConfig>>,

    // Windowing
    pub(super) window: Option<Arc<Window>>,

    // Host webview
    pub(super) webviews: WebViewManager,
    pub(super) webview: Option<WebViewHandle>,
    pub(super) queue: ScriptQueue,
    pub(super) host: Arc<WebViewHost>,

    // Present while the editor frame is loaded
    pub(super) session: Option<EditorSession>,

    pub(super) tokio_runtime: Option<tokio::runtime::Runtime>,

    // Whether the app should exit
    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl EaselApp {
    pub fn new(config: EaselConfig, config_path: Option<PathBuf>) -> Self {
        let tokio_runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("easel-transfer")
            .build()
        {
            Ok(rt) => Some(rt),
            Err(e) => {
                tracing::error!("Failed to start async runtime, transfers disabled: {e}");
                None
            }
        };

        let queue = ScriptQueue::new();
        Self {
            config,
            config_path,
            config_rx: None,
            window: None,
            webviews: WebViewManager::new(),
            webview: None,
            host: Arc::new(WebViewHost::new(queue.clone())),
            queue,
            session: None,
            tokio_runtime,
            should_exit: false,
            last_poll: Instant::now(),
        }
    }
}
