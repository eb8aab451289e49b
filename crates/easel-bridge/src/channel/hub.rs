//! Fan-out of the editor's inbound message stream.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::EditorPayload;

#[derive(Default)]
struct HubState {
    next_id: u64,
    listeners: HashMap<u64, mpsc::UnboundedSender<EditorPayload>>,
    closed: bool,
}

/// Shared inbound stream of editor messages.
///
/// Every payload published is delivered to every listener registered at
/// that moment, in publish order. Clones share the same stream.
#[derive(Clone, Default)]
pub struct MessageHub {
    state: Arc<Mutex<HubState>>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives payloads published from now on
    /// until it is dropped or the hub closes.
    pub fn listen(&self) -> Listener {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut id = 0;
        if let Ok(mut state) = self.state.lock() {
            id = state.next_id;
            state.next_id += 1;
            if !state.closed {
                state.listeners.insert(id, tx);
            }
        }
        Listener {
            id,
            rx,
            state: Arc::clone(&self.state),
        }
    }

    /// Deliver `payload` to every registered listener.
    pub fn publish(&self, payload: EditorPayload) {
        if let Ok(mut state) = self.state.lock() {
            if state.closed {
                tracing::debug!(kind = payload.kind(), "editor message after close dropped");
                return;
            }
            // A listener whose receiver is gone is about to deregister anyway.
            state
                .listeners
                .retain(|_, tx| tx.send(payload.clone()).is_ok());
        }
    }

    /// Mark the editor surface as gone. Pending listeners see the end of
    /// the stream; later listeners start closed.
    pub fn close(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed = true;
            state.listeners.clear();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().map(|s| s.closed).unwrap_or(true)
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().map(|s| s.listeners.len()).unwrap_or(0)
    }
}

impl std::fmt::Debug for MessageHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHub")
            .field("listeners", &self.listener_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// A registration on a [`MessageHub`]. Dropping it deregisters.
pub struct Listener {
    id: u64,
    rx: mpsc::UnboundedReceiver<EditorPayload>,
    state: Arc<Mutex<HubState>>,
}

impl Listener {
    /// Next payload, or `None` once the hub has closed.
    pub async fn recv(&mut self) -> Option<EditorPayload> {
        self.rx.recv().await
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.listeners.remove(&self.id);
        }
    }
}
