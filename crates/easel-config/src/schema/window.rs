//! Window configuration types.

use serde::{Deserialize, Serialize};

/// Main window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial logical width (valid range: 640-7680).
    pub width: u32,
    /// Initial logical height (valid range: 480-4320).
    pub height: u32,
    /// Enable webview devtools (always on in debug builds).
    pub devtools: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Easel".into(),
            width: 1440,
            height: 960,
            devtools: cfg!(debug_assertions),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
