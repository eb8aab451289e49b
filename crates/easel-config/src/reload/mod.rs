//! Live config reload: a [`ConfigWatcher`](crate::watcher::ConfigWatcher)
//! feeding validated configs into a `tokio::sync::watch` channel.

mod manager;


pub use manager::ReloadManager;
