//! Debounced change notifications for the config file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use easel_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Quiet period before a burst of file events counts as one change.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Watches the directory holding the config file and signals once per
/// settled burst of writes to that file.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        if path.file_name().is_none() {
            return Err(ConfigError::WatchError(format!(
                "{} does not name a file",
                path.display()
            )));
        }
        if !path.exists() {
            warn!(path = %path.display(), "config file missing, watching for creation");
        }
        Ok(Self {
            path,
            debounce: DEFAULT_DEBOUNCE,
        })
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run until the underlying watcher goes away, sending `()` on `tx`
    /// after each debounced change.
    pub async fn watch(&self, tx: broadcast::Sender<()>) -> Result<(), ConfigError> {
        let file_name = self.path.file_name().map(OsString::from).unwrap_or_default();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (raw_tx, raw_rx) = mpsc::channel::<()>(16);
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) if touches_file(&event, &file_name) => {
                    let _ = raw_tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => error!(error = %e, "config watcher error"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(format!("failed to watch {}: {e}", dir.display())))?;

        info!(path = %self.path.display(), "watching config file");
        debounce_into(raw_rx, tx, self.debounce).await;
        drop(watcher);
        Ok(())
    }
}

/// Whether a notify event is a write or create of the watched file.
pub(crate) fn touches_file(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()))
}

/// Collapse bursts on `raw` into single sends on `out`.
///
/// Returns when `raw` closes. A burst still settling when that happens is
/// dropped.
pub(crate) async fn debounce_into(
    mut raw: mpsc::Receiver<()>,
    out: broadcast::Sender<()>,
    quiet: Duration,
) {
    while raw.recv().await.is_some() {
        loop {
            match tokio::time::timeout(quiet, raw.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }
        debug!("config change settled");
        if out.send(()).is_err() {
            debug!("no receivers for config reload signal");
        }
    }
}
