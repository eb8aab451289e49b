//! Scripts waiting to be evaluated on the UI thread.
//!
//! `wry::WebView` is not `Send`, so async code never touches it. It pushes
//! scripts here and the event loop evaluates them on its next poll.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct ScriptQueue {
    scripts: Arc<Mutex<VecDeque<String>>>,
}

impl ScriptQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, script: String) {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.push_back(script);
        }
    }

    /// Take every queued script, oldest first.
    pub fn drain(&self) -> Vec<String> {
        match self.scripts.lock() {
            Ok(mut scripts) => scripts.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.scripts.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
