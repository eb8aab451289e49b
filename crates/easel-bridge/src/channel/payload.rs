use serde::{Deserialize, Serialize};

/// One message the editor posted back to the host.
///
/// The editor emits text (document sizes, the sentinel), booleans
/// (selection checks) and binary exports. Binary exports cross IPC as
/// base64 and stay encoded until a flow decodes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum EditorPayload {
    Text(String),
    Bool(bool),
    Buffer(String),
}

impl EditorPayload {
    pub fn is_sentinel(&self, sentinel: &str) -> bool {
        matches!(self, Self::Text(text) if text == sentinel)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&str> {
        match self {
            Self::Buffer(encoded) => Some(encoded),
            _ => None,
        }
    }

    /// Short description for logs; never includes buffer contents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Buffer(_) => "buffer",
        }
    }
}
