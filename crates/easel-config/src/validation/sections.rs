//! Validation for the individual config sections.

use crate::schema::{EaselConfig, WIDGET_MAP_VERSION};

use super::helpers::{validate_http_url, validate_non_empty, validate_range};

/// Validate editor constraints.
pub(crate) fn validate_editor(errors: &mut Vec<String>, config: &EaselConfig) {
    let editor = &config.editor;
    validate_http_url(errors, "editor.url", &editor.url);
    validate_non_empty(errors, "editor.iframe_id", &editor.iframe_id);
    validate_non_empty(errors, "editor.sentinel", &editor.sentinel);
    validate_non_empty(errors, "editor.output_file_name", &editor.output_file_name);
    validate_non_empty(errors, "editor.output_mime", &editor.output_mime);
    validate_range(errors, "editor.height", editor.height, 200, 4320);

    if !editor.initial_document.is_empty() && !editor.initial_document.starts_with("data:") {
        errors.push("editor.initial_document must be a data: URL".into());
    }
}

/// Validate host constraints.
pub(crate) fn validate_host(errors: &mut Vec<String>, config: &EaselConfig) {
    validate_http_url(errors, "host.url", &config.host.url);

    for (i, button) in config.host.gallery_buttons.iter().enumerate() {
        validate_non_empty(
            errors,
            &format!("host.gallery_buttons[{i}].buttons_id"),
            &button.buttons_id,
        );
        validate_non_empty(
            errors,
            &format!("host.gallery_buttons[{i}].gallery_id"),
            &button.gallery_id,
        );
    }
}

/// Validate the widget mapping table.
pub(crate) fn validate_widgets(errors: &mut Vec<String>, config: &EaselConfig) {
    let widgets = &config.widgets;
    validate_range(errors, "widgets.version", widgets.version, 1, WIDGET_MAP_VERSION);
    validate_range(errors, "widgets.aux_input_stride", widgets.aux_input_stride, 1, 16);

    let selectors = [
        ("widgets.tab_bar", &widgets.tab_bar),
        ("widgets.sub_tab_buttons", &widgets.sub_tab_buttons),
        ("widgets.file_input", &widgets.file_input),
        ("widgets.mask_input", &widgets.mask_input),
        ("widgets.base_input", &widgets.base_input),
        ("widgets.aux_marker", &widgets.aux_marker),
        ("widgets.aux_expand_control", &widgets.aux_expand_control),
        ("widgets.gallery_image", &widgets.gallery_image),
    ];
    for (name, value) in selectors {
        validate_non_empty(errors, name, value);
    }

    for (tab, entry) in &widgets.tabs {
        validate_non_empty(errors, &format!("widgets.tabs.{tab}.switch_fn"), &entry.switch_fn);
        validate_non_empty(errors, &format!("widgets.tabs.{tab}.root"), &entry.root);
        validate_non_empty(
            errors,
            &format!("widgets.tabs.{tab}.aux_container"),
            &entry.aux_container,
        );
    }
}

/// Validate window constraints.
pub(crate) fn validate_window(errors: &mut Vec<String>, config: &EaselConfig) {
    validate_range(errors, "window.width", config.window.width, 640, 7680);
    validate_range(errors, "window.height", config.window.height, 480, 4320);
}
