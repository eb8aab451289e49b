//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Easel Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[editor]
# url = "https://autmake.com/sdplugin"   # or "https://www.photopea.com/" for plain Photopea
# iframe_id = "webui-PS-iframe"
# mount_selector = "#tab_PS_embed"   # "" to never mount the iframe
# width = "100%"
# height = 790                       # 200-4320
# sentinel = "done"
# output_file_name = "PS_output.png"
# output_mime = "image/png"

[host]
# url = "http://127.0.0.1:7860/"
# allowed_origins = ["about:blank", "https://autmake.com/", "https://www.photopea.com/"]
# Add the editor's origin here if you point editor.url elsewhere.

# [[host.gallery_buttons]]
# buttons_id = "image_buttons_txt2img"
# gallery_id = "txt2img_gallery"

[widgets]
# version = 1
# tab_bar = "#tabs"
# editor_tab_label = "PS "
# sub_tab_buttons = "div.tab-nav > button"
# file_input = "input[type='file']"
# inpaint_upload_label = "Inpaint upload "
# mask_input = "#img_inpaint_mask input"
# base_input = "#img_inpaint_base input"
# aux_marker = "iframe"
# aux_expand_control = "span.icon"
# aux_input_stride = 2               # 1-16
# gallery_image = "img"

# [widgets.tabs.txt2img]
# switch_fn = "switch_to_txt2img"
# root = "#mode_txt2img"
# aux_container = "#txt2img_script_container #controlnet"

[transfer]
# active_layer_only = false
# reply_timeout_ms = 0               # 0 waits forever
# new_document_notice = "New document created as the image sent is bigger than the active document"
# no_selection_notice = "No selection in active document!"

[logging]
# level = "INFO"                     # DEBUG, INFO, WARNING, ERROR

[window]
# title = "Easel"
# width = 1440                       # 640-7680
# height = 960                       # 480-4320
# devtools = false
"##
    .to_string()
}
