use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use easel_common::{BridgeError, Dimensions, TransferError};

use super::{EditorPayload, MessageHub};
use crate::command::CommandString;

/// Outbound half of the editor channel.
pub trait EditorChannel: Send + Sync {
    /// Transmit one command. Delivery is fire-and-forget; responses come
    /// back through the [`MessageHub`].
    fn post(&self, command: &CommandString) -> Result<(), BridgeError>;
}

/// Payloads the editor emitted for one command, sentinel excluded, in
/// arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSequence(Vec<EditorPayload>);

impl ResponseSequence {
    pub fn new(payloads: Vec<EditorPayload>) -> Self {
        Self(payloads)
    }

    pub fn payloads(&self) -> &[EditorPayload] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<EditorPayload> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&EditorPayload> {
        self.0.first()
    }

    /// First payload read as a `"width,height"` document size.
    pub fn document_size(&self) -> Result<Dimensions, TransferError> {
        self.first()
            .and_then(EditorPayload::as_text)
            .and_then(Dimensions::from_pair)
            .ok_or_else(|| self.unexpected("document size"))
    }

    /// First payload read as a boolean. `"true"`/`"false"` text counts too.
    pub fn flag(&self) -> Result<bool, TransferError> {
        match self.first() {
            Some(EditorPayload::Bool(flag)) => Ok(*flag),
            Some(EditorPayload::Text(text)) if text == "true" => Ok(true),
            Some(EditorPayload::Text(text)) if text == "false" => Ok(false),
            _ => Err(self.unexpected("boolean")),
        }
    }

    /// Text-safe form of the binary payload at `index`.
    pub fn buffer(&self, index: usize) -> Result<&str, TransferError> {
        self.0
            .get(index)
            .and_then(EditorPayload::as_buffer)
            .ok_or_else(|| self.unexpected("image buffer"))
    }

    fn unexpected(&self, wanted: &str) -> TransferError {
        let got: Vec<&str> = self.0.iter().map(EditorPayload::kind).collect();
        TransferError::UnexpectedResponse(format!("expected {wanted}, got [{}]", got.join(", ")))
    }
}

/// Sends commands to the editor and collects their responses.
///
/// The editor handle is owned by the bridge; the app builds a new bridge
/// each time the editor frame loads.
pub struct Bridge {
    channel: Arc<dyn EditorChannel>,
    hub: MessageHub,
    sentinel: String,
    in_flight: AtomicBool,
}

impl Bridge {
    pub fn new(channel: Arc<dyn EditorChannel>, hub: MessageHub, sentinel: impl Into<String>) -> Self {
        Self {
            channel,
            hub,
            sentinel: sentinel.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn hub(&self) -> &MessageHub {
        &self.hub
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Send `command` and wait for the sentinel.
    ///
    /// The listener is registered before the command is posted so a fast
    /// reply cannot be missed. There is no timeout: if the editor never
    /// sends the sentinel this never resolves. A hub closed mid-request
    /// (editor frame unloaded) yields [`BridgeError::Closed`].
    pub async fn send(&self, command: CommandString) -> Result<ResponseSequence, BridgeError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::warn!("editor request sent while another is pending; responses may interleave");
        }
        let _in_flight = InFlight(&self.in_flight);

        let mut listener = self.hub.listen();
        tracing::debug!(command_len = command.len(), "posting editor command");
        self.channel.post(&command)?;

        let mut payloads = Vec::new();
        loop {
            match listener.recv().await {
                Some(payload) if payload.is_sentinel(&self.sentinel) => break,
                Some(payload) => payloads.push(payload),
                None => return Err(BridgeError::Closed),
            }
        }
        tracing::debug!(responses = payloads.len(), "editor request complete");
        Ok(ResponseSequence(payloads))
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
