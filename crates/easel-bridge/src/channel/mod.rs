//! Request/response correlation over the editor's message channel.
//!
//! The channel carries untagged strings in both directions, so a request
//! is "everything the editor says until it says the sentinel". Only one
//! request may be outstanding per [`Bridge`].

mod bridge;
mod hub;
mod payload;

pub use bridge::{Bridge, EditorChannel, ResponseSequence};
pub use hub::{Listener, MessageHub};
pub use payload::EditorPayload;
