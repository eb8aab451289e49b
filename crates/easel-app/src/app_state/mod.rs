//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the host webview, the script queue that async flows
//! talk through, and the editor session that exists while the editor
//! frame is loaded.

mod core;
mod event_handler;
mod init;
mod polling;
mod session;
mod shutdown;
mod types;
mod webview_bridge;

pub use core::EaselApp;
