//! Outbound editor channel through the host page.

use std::sync::atomic::{AtomicBool, Ordering};

use easel_bridge::{CommandString, EditorChannel};
use easel_common::BridgeError;
use serde_json::json;

use crate::ipc::js_call;
use crate::queue::ScriptQueue;

/// Posts commands into the editor iframe via the page runtime.
///
/// One channel exists per editor load; the app marks it unloaded when the
/// frame goes away so stale bridges fail fast instead of posting into
/// nothing.
pub struct WebViewEditorChannel {
    queue: ScriptQueue,
    iframe_id: String,
    loaded: AtomicBool,
}

impl WebViewEditorChannel {
    pub fn new(queue: ScriptQueue, iframe_id: impl Into<String>) -> Self {
        Self {
            queue,
            iframe_id: iframe_id.into(),
            loaded: AtomicBool::new(true),
        }
    }

    pub fn iframe_id(&self) -> &str {
        &self.iframe_id
    }

    pub fn mark_unloaded(&self) {
        self.loaded.store(false, Ordering::Release);
    }
}

impl EditorChannel for WebViewEditorChannel {
    fn post(&self, command: &CommandString) -> Result<(), BridgeError> {
        if !self.loaded.load(Ordering::Acquire) {
            return Err(BridgeError::Post(format!(
                "editor frame #{} is not loaded",
                self.iframe_id
            )));
        }
        self.queue
            .push(js_call("window.easel.editor.post", &[json!(command.as_str())]));
        Ok(())
    }
}
