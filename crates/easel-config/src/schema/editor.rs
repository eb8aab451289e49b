//! Embedded editor configuration.

use serde::{Deserialize, Serialize};

/// A blank 512x512 white PNG, used as the editor's first document.
pub const BLANK_DOCUMENT: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAgAAAAIAAQMAAADOtka5AAAAAXNSR0IB2cksfwAAAAlwSFlzAAALEwAACxMBAJqcGAAAAANQTFRF////p8QbyAAAADZJREFUeJztwQEBAAAAgiD/r25IQAEAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAfBuCAAAB0niJ8AAAAABJRU5ErkJggg==";

/// Settings for the embedded editor frame and its message protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Base URL of the editor.
    pub url: String,
    /// DOM id of the editor iframe inside the host page.
    pub iframe_id: String,
    /// Where to mount the iframe when the host page does not provide one.
    /// Empty disables mounting.
    pub mount_selector: String,
    /// Iframe width (CSS length).
    pub width: String,
    /// Iframe height in pixels (valid range: 200-4320).
    pub height: u32,
    /// Document opened when the editor first loads (data URL). Empty for none.
    pub initial_document: String,
    /// Payload the editor emits after the last response to a command.
    pub sentinel: String,
    /// File name given to images handed to host widgets.
    pub output_file_name: String,
    /// MIME type of images exported by the editor.
    pub output_mime: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            url: "https://autmake.com/sdplugin".into(),
            iframe_id: "webui-PS-iframe".into(),
            mount_selector: "#tab_PS_embed".into(),
            width: "100%".into(),
            height: 790,
            initial_document: BLANK_DOCUMENT.into(),
            sentinel: "done".into(),
            output_file_name: "PS_output.png".into(),
            output_mime: "image/png".into(),
        }
    }
}

impl EditorConfig {
    /// Full iframe URL. The initial document travels in the fragment as
    /// URI-encoded JSON (`#{"resources":["data:..."]}`).
    pub fn editor_url(&self) -> String {
        if self.initial_document.is_empty() {
            return self.url.clone();
        }
        let params = serde_json::json!({ "resources": [self.initial_document] });
        format!("{}#{}", self.url, urlencoding::encode(&params.to_string()))
    }
}
