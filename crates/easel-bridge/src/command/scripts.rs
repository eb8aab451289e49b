//! Named procedures evaluated inside the editor.
//!
//! Each body defines a function called `name`; [`CommandString::invoke`]
//! appends the call so one message both defines and runs it.
//!
//! [`CommandString::invoke`]: super::CommandString::invoke

/// A named editor-side procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorScript {
    pub name: &'static str,
    pub body: &'static str,
}

/// Echoes `"width,height"` of the active document.
pub const ACTIVE_DOCUMENT_SIZE: EditorScript = EditorScript {
    name: "getActiveDocumentSize",
    body: r#"function getActiveDocumentSize() {
  var doc = app.activeDocument;
  app.echoToOE(doc.width + "," + doc.height);
}"#,
};

/// Echoes `true` when the active document has a selection.
pub const SELECTION_EXISTS: EditorScript = EditorScript {
    name: "selectionExists",
    body: r#"function selectionExists() {
  try {
    var bounds = app.activeDocument.selection.bounds;
    app.echoToOE(bounds != null && bounds.length === 4);
  } catch (e) {
    app.echoToOE(false);
  }
}"#,
};

/// Exports the active layer alone as PNG, leaving layer visibility as it was.
pub const EXPORT_ACTIVE_LAYER: EditorScript = EditorScript {
    name: "exportSelectedLayerOnly",
    body: r#"function exportSelectedLayerOnly() {
  var doc = app.activeDocument;
  var active = doc.activeLayer;
  var hidden = [];
  for (var i = 0; i < doc.layers.length; i++) {
    var layer = doc.layers[i];
    if (layer !== active && layer.visible) {
      layer.visible = false;
      hidden.push(layer);
    }
  }
  doc.saveToOE("png");
  for (var j = 0; j < hidden.length; j++) {
    hidden[j].visible = true;
  }
}"#,
};

/// Adds a new active layer holding the selection as white on black.
pub const CREATE_MASK_FROM_SELECTION: EditorScript = EditorScript {
    name: "createMaskFromSelection",
    body: r#"function createMaskFromSelection() {
  var doc = app.activeDocument;
  var black = new SolidColor();
  black.rgb.hexValue = "000000";
  var white = new SolidColor();
  white.rgb.hexValue = "FFFFFF";
  var mask = doc.artLayers.add();
  mask.name = "easel mask";
  doc.activeLayer = mask;
  doc.selection.invert();
  doc.selection.fill(black);
  doc.selection.invert();
  doc.selection.fill(white);
}"#,
};
