//! Live config reload manager.

use crate::schema::EaselConfig;
use crate::toml_loader;
use crate::validation;
use crate::watcher::ConfigWatcher;
use easel_common::ConfigError;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

/// Publishes a fresh [`EaselConfig`] whenever the file changes on disk.
///
/// Transfer flows read the latest value when they start, so an edited
/// widget mapping table applies to the next flow without a restart.
pub struct ReloadManager {
    config_path: PathBuf,
}

impl ReloadManager {
    /// Load the config at `config_path` and keep it current in the background.
    ///
    /// A missing or unreadable file yields defaults rather than an error,
    /// since the watcher will pick the file up once it appears.
    pub async fn start(config_path: PathBuf) -> (EaselConfig, watch::Receiver<EaselConfig>) {
        let initial = toml_loader::load_from_path(&config_path).unwrap_or_else(|e| {
            warn!("failed to load config: {e}, using defaults");
            EaselConfig::default()
        });

        let (config_tx, config_rx) = watch::channel(initial.clone());
        let manager = ReloadManager { config_path };
        tokio::spawn(manager.run(config_tx));

        (initial, config_rx)
    }

    async fn run(self, config_tx: watch::Sender<EaselConfig>) {
        let watcher = match ConfigWatcher::new(self.config_path.clone()) {
            Ok(w) => w,
            Err(e) => {
                error!("config reload disabled: {e}");
                return;
            }
        };

        let (change_tx, mut changes) = broadcast::channel::<()>(16);
        tokio::spawn(async move {
            if let Err(e) = watcher.watch(change_tx).await {
                error!("config watcher stopped: {e}");
            }
        });

        loop {
            match changes.recv().await {
                // A lagged receiver still means the file changed.
                Ok(()) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => {
                    debug!("config watcher channel closed");
                    return;
                }
            }

            match reload(&self.config_path) {
                Ok(config) => {
                    info!(path = %self.config_path.display(), "config reloaded");
                    if config_tx.send(config).is_err() {
                        debug!("no config receivers left, stopping reload");
                        return;
                    }
                }
                Err(e) => warn!("config reload rejected, keeping current config: {e}"),
            }
        }
    }
}

/// Read and validate the config at `path`. Unlike the initial load, a
/// file that fails validation is an error here.
pub(crate) fn reload(path: &Path) -> Result<EaselConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
