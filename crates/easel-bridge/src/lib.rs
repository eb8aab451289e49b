//! Image transfer between a host web UI and an embedded image editor.
//!
//! The two surfaces only meet through narrow seams: [`surface::HostSurface`]
//! for the host widget tree and [`channel::EditorChannel`] plus
//! [`channel::MessageHub`] for the editor's string-only message channel.
//! [`orchestrator::TransferOrchestrator`] sequences the flows on top.

pub mod channel;
pub mod codec;
pub mod command;
pub mod ipc;
pub mod locator;
pub mod orchestrator;
pub mod router;
pub mod surface;
pub mod watcher;

pub use channel::{Bridge, EditorChannel, EditorPayload, MessageHub, ResponseSequence};
pub use codec::{NamedFile, Transferable};
pub use command::CommandString;
pub use ipc::{IpcMessage, TransferRequest};
pub use locator::WidgetLocator;
pub use orchestrator::{with_deadline, TransferOrchestrator, TransferSettings};
pub use router::{DestinationDescriptor, DestinationRouter};
pub use surface::{ElementRef, HostSurface, MutationSubscription};
pub use watcher::await_structural_change;
