//! Configuration schema types for Easel.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod editor;
mod host;
mod logging;
mod transfer;
mod widgets;
mod window;

pub use editor::*;
pub use host::*;
pub use logging::*;
pub use transfer::*;
pub use widgets::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Easel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct EaselConfig {
    pub editor: EditorConfig,
    pub host: HostConfig,
    pub widgets: WidgetMap,
    pub transfer: TransferConfig,
    pub logging: LoggingConfig,
    pub window: WindowConfig,
}
