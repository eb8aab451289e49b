//! Easel configuration system.
//!
//! Provides TOML-based configuration with live reload and validation.
//! All config sections use sensible defaults so partial configs work out
//! of the box. The `[widgets]` section is the versioned mapping table that
//! tells the bridge how to find widgets in the host UI.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use easel_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod validation;
pub mod watcher;

// Re-export core types for convenience
pub use reload::ReloadManager;
pub use schema::{EaselConfig, WidgetMap, CONFIG_SCHEMA_VERSION};
pub use watcher::ConfigWatcher;

use easel_common::ConfigError;
use std::path::Path;

/// Load config from `path`, or from the platform default path when `None`.
///
/// A missing file is created with the documented defaults. The result is
/// validated; invalid values are rejected here so the app never starts
/// with a broken mapping table.
pub fn load_config(path: Option<&Path>) -> Result<EaselConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_or_create(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &EaselConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
