//! Command strings sent to the embedded editor.
//!
//! A command is either a single expression statement or a procedure body
//! followed by a call to it. Several commands can be concatenated into one
//! message, which runs them in order inside the editor.

mod scripts;

pub use scripts::{
    EditorScript, ACTIVE_DOCUMENT_SIZE, CREATE_MASK_FROM_SELECTION, EXPORT_ACTIVE_LAYER,
    SELECTION_EXISTS,
};

use std::fmt;

/// Immutable text payload for the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandString(String);

impl CommandString {
    /// A single expression statement. A trailing `;` is added when missing.
    pub fn expression(expr: impl Into<String>) -> Self {
        let mut expr = expr.into();
        if !expr.trim_end().ends_with(';') {
            let len = expr.trim_end().len();
            expr.truncate(len);
            expr.push(';');
        }
        Self(expr)
    }

    /// Define `script` and call it with no arguments.
    pub fn invoke(script: &EditorScript) -> Self {
        Self(format!("{}\n{}();", script.body, script.name))
    }

    /// This command followed by `next`, as one message.
    pub fn then(self, next: CommandString) -> Self {
        Self(format!("{}\n{}", self.0, next.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

pub fn document_size_query() -> CommandString {
    CommandString::invoke(&ACTIVE_DOCUMENT_SIZE)
}

pub fn selection_query() -> CommandString {
    CommandString::invoke(&SELECTION_EXISTS)
}

/// Open `data_url` in the editor. When `as_new_document` is false the image
/// is placed into the active document instead.
pub fn open_image(data_url: &str, as_new_document: bool) -> CommandString {
    CommandString::expression(format!(
        "app.open({}, null, {})",
        js_string(data_url),
        !as_new_document
    ))
}

pub fn rasterize_active_layer() -> CommandString {
    CommandString::expression("app.activeDocument.activeLayer.rasterize()")
}

/// Non-blocking in-editor notice.
pub fn notice(text: &str) -> CommandString {
    CommandString::expression(format!("alert({})", js_string(text)))
}

/// Export the flattened document as PNG.
pub fn save_document() -> CommandString {
    CommandString::expression("app.activeDocument.saveToOE(\"png\")")
}

pub fn save(active_layer_only: bool) -> CommandString {
    if active_layer_only {
        CommandString::invoke(&EXPORT_ACTIVE_LAYER)
    } else {
        save_document()
    }
}

pub fn remove_active_layer() -> CommandString {
    CommandString::expression("app.activeDocument.activeLayer.remove()")
}

/// Create a mask layer from the selection, export it, then remove it.
/// Removal has to come after the export.
pub fn mask_from_selection() -> CommandString {
    CommandString::invoke(&CREATE_MASK_FROM_SELECTION)
        .then(CommandString::invoke(&EXPORT_ACTIVE_LAYER))
        .then(remove_active_layer())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_adds_semicolon_once() {
        assert_eq!(CommandString::expression("a()").as_str(), "a();");
        assert_eq!(CommandString::expression("a(); ").as_str(), "a(); ");
        assert_eq!(CommandString::expression("a()  ").as_str(), "a();");
    }

    #[test]
    fn invoke_defines_then_calls() {
        let cmd = CommandString::invoke(&ACTIVE_DOCUMENT_SIZE);
        assert!(cmd.as_str().starts_with("function getActiveDocumentSize()"));
        assert!(cmd.as_str().ends_with("\ngetActiveDocumentSize();"));
    }

    #[test]
    fn open_image_flag_is_inverted_for_placement() {
        let cmd = open_image("data:image/png;base64,AAAA", true);
        assert_eq!(
            cmd.as_str(),
            "app.open(\"data:image/png;base64,AAAA\", null, false);"
        );
        let cmd = open_image("data:image/png;base64,AAAA", false);
        assert!(cmd.as_str().ends_with("null, true);"));
    }

    #[test]
    fn notice_escapes_text() {
        let cmd = notice("say \"hi\"\nnow");
        assert_eq!(cmd.as_str(), r#"alert("say \"hi\"\nnow");"#);
    }

    #[test]
    fn save_picks_layer_or_document() {
        assert_eq!(save(false), save_document());
        assert!(save(true).as_str().contains("exportSelectedLayerOnly();"));
    }

    #[test]
    fn mask_command_removes_after_export() {
        let cmd = mask_from_selection();
        let text = cmd.as_str();
        let create = text.find("createMaskFromSelection();").unwrap();
        let export = text.find("exportSelectedLayerOnly();").unwrap();
        let remove = text.find("activeLayer.remove();").unwrap();
        assert!(create < export);
        assert!(export < remove);
    }
}
