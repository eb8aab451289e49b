//! Glue between the host webview and the bridge.
//!
//! Handles window-to-webview bounds, page lifecycle events, and IPC
//! dispatch into the host, the editor session, and transfer flows.

mod bounds;
mod ipc_dispatch;
mod lifecycle;

pub(super) use bounds::window_bounds;
