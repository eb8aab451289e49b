//! IPC wire format between the host page runtime and Rust.
//!
//! JavaScript posts `{"kind": ..., "payload": ...}` envelopes through
//! `window.ipc.postMessage`. Rust answers by evaluating scripts; those
//! scripts report back with `host_reply` envelopes carrying the same id.

use easel_common::{HostError, SurfaceTab};
use serde::{Deserialize, Deserializer, Serialize};

use crate::channel::EditorPayload;
use crate::surface::MutationRecord;

pub const KIND_EDITOR_LOADED: &str = "editor_loaded";
pub const KIND_EDITOR_UNLOADED: &str = "editor_unloaded";
pub const KIND_EDITOR_MESSAGE: &str = "editor_message";
pub const KIND_HOST_REPLY: &str = "host_reply";
pub const KIND_MUTATION: &str = "mutation";
pub const KIND_TRANSFER_REQUEST: &str = "transfer_request";

/// Every IPC kind the host runtime may send. Anything else is dropped.
pub const ALLOWED_IPC_KINDS: &[&str] = &[
    KIND_EDITOR_LOADED,
    KIND_EDITOR_UNLOADED,
    KIND_EDITOR_MESSAGE,
    KIND_HOST_REPLY,
    KIND_MUTATION,
    KIND_TRANSFER_REQUEST,
];

pub fn is_ipc_kind_allowed(kind: &str) -> bool {
    ALLOWED_IPC_KINDS.contains(&kind)
}

/// A message from the host page runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl IpcMessage {
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn new(kind: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Decode the payload as `T`.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

/// Result of one host primitive, keyed by the id of the script that ran it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostReply {
    pub id: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl HostReply {
    pub fn into_result(self) -> Result<serde_json::Value, HostError> {
        match self.error {
            Some(error) => Err(HostError::Script(error)),
            None => Ok(self.value),
        }
    }
}

/// Mutations seen by one observer in the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationNotice {
    pub subscription: String,
    #[serde(default)]
    pub records: Vec<MutationRecord>,
}

/// Editor messages are relayed as tagged payloads.
pub type EditorMessage = EditorPayload;

/// A transfer someone asked for: a gallery "send to editor" button, or
/// the editor frame itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransferRequest {
    /// Send the first image of the gallery element with this id to the editor.
    #[serde(rename = "sendGalleryImageToEditor")]
    ToEditor { gallery: String },

    #[serde(rename = "getAndSendImageToWebUITab")]
    ToHost {
        #[serde(rename = "webUiTab")]
        tab: SurfaceTab,
        #[serde(rename = "sendToControlnet", default, deserialize_with = "loose_bool")]
        route_to_auxiliary: bool,
        #[serde(rename = "imageWidgetIndex", default, deserialize_with = "loose_index")]
        widget_index: usize,
        #[serde(rename = "isCurrentLayer", default, deserialize_with = "loose_bool")]
        active_layer_only: bool,
    },

    #[serde(rename = "sendImageWithMaskSelectionToWebUi")]
    SelectionMask,
}

impl TransferRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToEditor { .. } => "host_to_editor",
            Self::ToHost { .. } => "editor_to_host",
            Self::SelectionMask => "selection_mask",
        }
    }
}

/// The editor frame sends flags as booleans or as `"true"`/`"false"`.
fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(flag) => Ok(flag),
        serde_json::Value::String(s) => Ok(s.trim().eq_ignore_ascii_case("true")),
        serde_json::Value::Null => Ok(false),
        other => Err(serde::de::Error::custom(format!("expected boolean, got {other}"))),
    }
}

/// Widget indices arrive as numbers or numeric strings.
fn loose_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid widget index {n}"))),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid widget index {s:?}"))),
        serde_json::Value::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!("expected index, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist() {
        assert!(is_ipc_kind_allowed("editor_message"));
        assert!(is_ipc_kind_allowed("transfer_request"));
        assert!(!is_ipc_kind_allowed("eval"));
        assert!(!is_ipc_kind_allowed(""));
    }

    #[test]
    fn envelope_without_payload() {
        let msg = IpcMessage::from_json(r#"{"kind":"editor_loaded"}"#).unwrap();
        assert_eq!(msg.kind, KIND_EDITOR_LOADED);
        assert!(msg.payload.is_null());
        assert!(IpcMessage::from_json("not json").is_none());
    }

    #[test]
    fn editor_message_payload() {
        let msg = IpcMessage::from_json(
            r#"{"kind":"editor_message","payload":{"type":"text","data":"done"}}"#,
        )
        .unwrap();
        let payload: EditorMessage = msg.payload_as().unwrap();
        assert!(payload.is_sentinel("done"));
    }

    #[test]
    fn host_reply_error_becomes_script_error() {
        let reply: HostReply =
            serde_json::from_str(r#"{"id":"abc","error":"no such element"}"#).unwrap();
        assert!(matches!(reply.into_result(), Err(HostError::Script(_))));

        let reply: HostReply = serde_json::from_str(r#"{"id":"abc","value":[1,2]}"#).unwrap();
        assert_eq!(reply.into_result().unwrap(), serde_json::json!([1, 2]));
    }

    #[test]
    fn mutation_notice() {
        let notice: MutationNotice = serde_json::from_str(
            r#"{"subscription":"s1","records":[{"type":"attributes","attributeName":"style"}]}"#,
        )
        .unwrap();
        assert_eq!(notice.records.len(), 1);
        assert_eq!(notice.records[0].attribute_name.as_deref(), Some("style"));
    }

    #[test]
    fn editor_frame_request_with_string_flags() {
        let req: TransferRequest = serde_json::from_str(
            r#"{"type":"getAndSendImageToWebUITab","webUiTab":"img2img",
                "sendToControlnet":true,"imageWidgetIndex":"1","isCurrentLayer":"true"}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            TransferRequest::ToHost {
                tab: SurfaceTab::Img2img,
                route_to_auxiliary: true,
                widget_index: 1,
                active_layer_only: true,
            }
        );
    }

    #[test]
    fn editor_frame_request_defaults() {
        let req: TransferRequest = serde_json::from_str(
            r#"{"type":"getAndSendImageToWebUITab","webUiTab":"extras","isCurrentLayer":"false"}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            TransferRequest::ToHost {
                tab: SurfaceTab::Extras,
                route_to_auxiliary: false,
                widget_index: 0,
                active_layer_only: false,
            }
        );
    }

    #[test]
    fn mask_and_gallery_requests() {
        let req: TransferRequest =
            serde_json::from_str(r#"{"type":"sendImageWithMaskSelectionToWebUi"}"#).unwrap();
        assert_eq!(req, TransferRequest::SelectionMask);
        assert_eq!(req.name(), "selection_mask");

        let req: TransferRequest =
            serde_json::from_str(r#"{"type":"sendGalleryImageToEditor","gallery":"txt2img_gallery"}"#)
                .unwrap();
        assert_eq!(
            req,
            TransferRequest::ToEditor {
                gallery: "txt2img_gallery".into()
            }
        );
    }

    #[test]
    fn unknown_request_type_is_rejected() {
        assert!(serde_json::from_str::<TransferRequest>(r#"{"type":"deleteEverything"}"#).is_err());
    }
}
