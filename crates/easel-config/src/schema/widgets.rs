//! Widget mapping table.
//!
//! The host UI has no stable identifiers for most of the widgets Easel
//! drives, so every selector, label and positional convention lives here,
//! versioned, instead of in code. Bump `version` when the host UI changes
//! layout in a way that needs a new table.

use std::collections::BTreeMap;

use easel_common::SurfaceTab;
use serde::{Deserialize, Serialize};

/// Newest mapping-table layout this build understands.
pub const WIDGET_MAP_VERSION: u32 = 1;

/// Per-tab entries of the mapping table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabWidgets {
    /// Host-global function that activates the tab.
    pub switch_fn: String,
    /// Root element of the tab's content.
    pub root: String,
    /// Container of the auxiliary-model routing accordion for this tab.
    pub aux_container: String,
}

impl TabWidgets {
    fn for_tab(tab: SurfaceTab) -> Self {
        // Extras has no routing accordion of its own and shares img2img's.
        let aux_owner = match tab {
            SurfaceTab::Txt2img => "txt2img",
            SurfaceTab::Img2img | SurfaceTab::Extras => "img2img",
        };
        Self {
            switch_fn: format!("switch_to_{}", tab.as_str()),
            root: format!("#mode_{}", tab.as_str()),
            aux_container: format!("#{aux_owner}_script_container #controlnet"),
        }
    }
}

/// The versioned widget mapping table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetMap {
    pub version: u32,
    /// Container of the host's top-level tab buttons.
    pub tab_bar: String,
    /// Text content of the editor's tab button (exact match).
    pub editor_tab_label: String,
    /// Sub-tab buttons inside a tab root or routing container.
    pub sub_tab_buttons: String,
    /// File input inside a tab root or routing container.
    pub file_input: String,
    /// Text content of the inpaint-upload sub-tab button (exact match).
    pub inpaint_upload_label: String,
    /// File input of the inpaint mask widget.
    pub mask_input: String,
    /// File input of the inpaint base-image widget.
    pub base_input: String,
    /// Element only present inside the routing accordion's content region.
    pub aux_marker: String,
    /// Control that toggles the routing accordion.
    pub aux_expand_control: String,
    /// Same-typed inputs per routing unit; unit `k` uses input `k * stride`.
    pub aux_input_stride: u32,
    /// Image element inside a gallery.
    pub gallery_image: String,
    pub tabs: BTreeMap<SurfaceTab, TabWidgets>,
}

impl Default for WidgetMap {
    fn default() -> Self {
        Self {
            version: WIDGET_MAP_VERSION,
            tab_bar: "#tabs".into(),
            editor_tab_label: "PS ".into(),
            sub_tab_buttons: "div.tab-nav > button".into(),
            file_input: "input[type='file']".into(),
            inpaint_upload_label: "Inpaint upload ".into(),
            mask_input: "#img_inpaint_mask input".into(),
            base_input: "#img_inpaint_base input".into(),
            aux_marker: "iframe".into(),
            aux_expand_control: "span.icon".into(),
            aux_input_stride: 2,
            gallery_image: "img".into(),
            tabs: SurfaceTab::ALL
                .iter()
                .map(|tab| (*tab, TabWidgets::for_tab(*tab)))
                .collect(),
        }
    }
}

impl WidgetMap {
    /// Entries for `tab`, falling back to the built-in defaults when the
    /// table omits it.
    pub fn tab(&self, tab: SurfaceTab) -> TabWidgets {
        self.tabs
            .get(&tab)
            .cloned()
            .unwrap_or_else(|| TabWidgets::for_tab(tab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_map_defaults() {
        let map = WidgetMap::default();
        assert_eq!(map.version, WIDGET_MAP_VERSION);
        assert_eq!(map.aux_input_stride, 2);
        assert_eq!(map.editor_tab_label, "PS ");
        assert_eq!(map.tabs.len(), 3);
    }

    #[test]
    fn default_tabs_follow_host_naming() {
        let map = WidgetMap::default();
        let t2i = map.tab(SurfaceTab::Txt2img);
        assert_eq!(t2i.switch_fn, "switch_to_txt2img");
        assert_eq!(t2i.root, "#mode_txt2img");
        assert_eq!(t2i.aux_container, "#txt2img_script_container #controlnet");
    }

    #[test]
    fn extras_shares_img2img_routing_container() {
        let map = WidgetMap::default();
        assert_eq!(
            map.tab(SurfaceTab::Extras).aux_container,
            map.tab(SurfaceTab::Img2img).aux_container
        );
        assert_eq!(map.tab(SurfaceTab::Extras).root, "#mode_extras");
    }

    #[test]
    fn partial_tab_table_overrides_one_tab() {
        let toml_str = r##"
aux_input_stride = 3

[tabs.img2img]
switch_fn = "goto_img2img"
root = "#img2img_root"
aux_container = "#img2img_controls"
"##;
        let map: WidgetMap = toml::from_str(toml_str).unwrap();
        assert_eq!(map.aux_input_stride, 3);
        assert_eq!(map.tab(SurfaceTab::Img2img).switch_fn, "goto_img2img");
        // Tabs missing from the table keep built-in entries.
        assert_eq!(map.tab(SurfaceTab::Txt2img).switch_fn, "switch_to_txt2img");
        // Defaults preserved
        assert_eq!(map.file_input, "input[type='file']");
    }
}
