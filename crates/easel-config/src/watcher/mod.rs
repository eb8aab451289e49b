//! Debounced file watching for the config file, built on `notify`.

mod config_watcher;


pub use config_watcher::{ConfigWatcher, DEFAULT_DEBOUNCE};
