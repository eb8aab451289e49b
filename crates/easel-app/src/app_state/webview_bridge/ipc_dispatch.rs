//! IPC message validation and dispatch from the page runtime to Rust handlers.

use easel_bridge::ipc::{
    is_ipc_kind_allowed, EditorMessage, HostReply, MutationNotice, KIND_EDITOR_LOADED,
    KIND_EDITOR_MESSAGE, KIND_EDITOR_UNLOADED, KIND_HOST_REPLY, KIND_MUTATION,
    KIND_TRANSFER_REQUEST,
};
use easel_bridge::{with_deadline, IpcMessage, TransferRequest};
use easel_common::TransferError;

use crate::app_state::core::EaselApp;
use crate::app_state::session::EditorSession;

// =============================================================================
// DISPATCH
// =============================================================================

impl EaselApp {
    /// Handle a single IPC message from the host page.
    pub(in crate::app_state) fn handle_ipc_message(&mut self, body: &str) {
        let msg = match IpcMessage::from_json(body) {
            Some(m) => m,
            None => {
                tracing::warn!(body_len = body.len(), "IPC message rejected: failed to parse");
                return;
            }
        };

        if !is_ipc_kind_allowed(&msg.kind) {
            tracing::warn!(kind = %msg.kind, "IPC message rejected: unknown kind");
            return;
        }

        tracing::trace!(kind = %msg.kind, "IPC message dispatched");

        match msg.kind.as_str() {
            KIND_EDITOR_LOADED => self.handle_editor_loaded(),
            KIND_EDITOR_UNLOADED => self.handle_editor_unloaded(),
            KIND_EDITOR_MESSAGE => match msg.payload_as::<EditorMessage>() {
                Ok(payload) => match self.session {
                    Some(ref session) => session.deliver(payload),
                    None => tracing::debug!("editor message with no session, dropped"),
                },
                Err(e) => tracing::warn!(error = %e, "malformed editor message"),
            },
            KIND_HOST_REPLY => match msg.payload_as::<HostReply>() {
                Ok(reply) => self.host.handle_reply(reply),
                Err(e) => tracing::warn!(error = %e, "malformed host reply"),
            },
            KIND_MUTATION => match msg.payload_as::<MutationNotice>() {
                Ok(notice) => self.host.handle_mutation(notice),
                Err(e) => tracing::warn!(error = %e, "malformed mutation notice"),
            },
            KIND_TRANSFER_REQUEST => match msg.payload_as::<TransferRequest>() {
                Ok(request) => self.start_transfer(request),
                Err(e) => tracing::warn!(error = %e, "unrecognized transfer request"),
            },
            _ => {
                // Shouldn't happen: allowlist checked above
                tracing::warn!(kind = %msg.kind, "Unhandled IPC kind");
            }
        }
    }

    fn handle_editor_loaded(&mut self) {
        // A reload replaces the session; the old one closes on drop.
        self.session = Some(EditorSession::open(
            self.host.clone(),
            self.queue.clone(),
            &self.config,
        ));
        tracing::info!(iframe = %self.config.editor.iframe_id, "Editor loaded");
    }

    fn handle_editor_unloaded(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("Editor unloaded");
        }
    }

    /// Run a transfer flow on the async runtime, after any flow already
    /// running in this session.
    fn start_transfer(&mut self, request: TransferRequest) {
        let Some(ref session) = self.session else {
            tracing::warn!(flow = request.name(), "transfer requested before the editor loaded");
            return;
        };
        let Some(ref rt) = self.tokio_runtime else {
            tracing::warn!(flow = request.name(), "transfer dropped: no async runtime");
            return;
        };

        let orchestrator = session.orchestrator();
        let gate = session.flow_gate();
        let deadline = self.config.transfer.reply_timeout();
        let name = request.name();
        tracing::info!(flow = name, "transfer queued");

        rt.spawn(async move {
            let _turn = gate.lock_owned().await;
            tracing::debug!(flow = name, "transfer running");
            let flow = orchestrator.run(request);
            let result: Result<(), TransferError> = match deadline {
                Some(deadline) => with_deadline(deadline, flow).await,
                None => flow.await,
            };
            match result {
                Ok(()) => tracing::info!(flow = name, "transfer complete"),
                Err(e) => tracing::warn!(flow = name, error = %e, "transfer failed"),
            }
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
