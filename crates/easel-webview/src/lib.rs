//! WebView side of Easel.
//!
//! Wraps the `wry` crate to provide:
//! - The host WebView with a navigation allowlist
//! - Bidirectional IPC (Rust <-> JavaScript)
//! - The page runtime that relays editor messages and runs DOM primitives
//! - [`WebViewHost`] and [`WebViewEditorChannel`], the webview-backed seams
//!   the bridge talks through

pub mod editor;
pub mod events;
pub mod host;
pub mod ipc;
pub mod manager;
pub mod queue;
pub mod runtime;

pub use editor::WebViewEditorChannel;
pub use events::{PageLoadState, WebViewEvent};
pub use host::WebViewHost;
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
pub use queue::ScriptQueue;
pub use runtime::runtime_script;
