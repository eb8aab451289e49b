//! Transfer flow settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Send only the editor's active layer instead of the flattened image
    /// when a flow does not say otherwise (the selection-mask flow).
    pub active_layer_only: bool,
    /// Abort a flow when it runs longer than this many milliseconds.
    /// 0 waits forever, which is how the editor protocol behaves natively.
    pub reply_timeout_ms: u64,
    /// Notice shown in the editor when an image opens as a new document.
    pub new_document_notice: String,
    /// Notice shown in the editor when a mask is requested without a selection.
    pub no_selection_notice: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            active_layer_only: false,
            reply_timeout_ms: 0,
            new_document_notice:
                "New document created as the image sent is bigger than the active document".into(),
            no_selection_notice: "No selection in active document!".into(),
        }
    }
}

impl TransferConfig {
    pub fn reply_timeout(&self) -> Option<Duration> {
        (self.reply_timeout_ms > 0).then(|| Duration::from_millis(self.reply_timeout_ms))
    }
}
