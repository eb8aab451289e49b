//! Per-load editor session.
//!
//! The editor frame can reload at any time, so the hub, channel and
//! orchestrator are rebuilt on every `editor_loaded` and torn down on
//! `editor_unloaded`.
//!
//! The editor channel carries one command at a time, so flows in a session
//! take turns on a shared gate, in arrival order.

use std::sync::Arc;

use tokio::sync::Mutex;

use easel_bridge::{Bridge, EditorPayload, MessageHub, TransferOrchestrator};
use easel_config::schema::EaselConfig;
use easel_webview::{ScriptQueue, WebViewEditorChannel, WebViewHost};

pub(super) struct EditorSession {
    hub: MessageHub,
    channel: Arc<WebViewEditorChannel>,
    bridge: Arc<Bridge>,
    orchestrator: Arc<TransferOrchestrator>,
    flow_gate: Arc<Mutex<()>>,
}

impl EditorSession {
    pub(super) fn open(host: Arc<WebViewHost>, queue: ScriptQueue, config: &EaselConfig) -> Self {
        let hub = MessageHub::new();
        let channel = Arc::new(WebViewEditorChannel::new(
            queue,
            config.editor.iframe_id.clone(),
        ));
        let bridge = Arc::new(Bridge::new(
            channel.clone(),
            hub.clone(),
            config.editor.sentinel.clone(),
        ));
        let orchestrator = Arc::new(TransferOrchestrator::from_config(
            host,
            Arc::clone(&bridge),
            config,
        ));
        Self {
            hub,
            channel,
            bridge,
            orchestrator,
            flow_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Feed one message from the editor frame to whoever is listening.
    pub(super) fn deliver(&self, payload: EditorPayload) {
        self.hub.publish(payload);
    }

    pub(super) fn orchestrator(&self) -> Arc<TransferOrchestrator> {
        Arc::clone(&self.orchestrator)
    }

    /// Gate a flow holds for its whole run. Waiters are served in order.
    pub(super) fn flow_gate(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.flow_gate)
    }

    /// Pick up a reloaded config for the next flow. Flows already running
    /// keep the orchestrator they started with.
    pub(super) fn reconfigure(&mut self, host: Arc<WebViewHost>, config: &EaselConfig) {
        if config.editor.sentinel != self.bridge.sentinel() {
            tracing::warn!(
                "editor.sentinel changed; it applies after the editor reloads"
            );
        }
        self.orchestrator = Arc::new(TransferOrchestrator::from_config(
            host,
            Arc::clone(&self.bridge),
            config,
        ));
    }

    /// Fail pending sends and refuse new posts.
    pub(super) fn close(&self) {
        self.channel.mark_unloaded();
        self.hub.close();
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.close();
    }
}
