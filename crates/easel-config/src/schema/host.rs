//! Host surface configuration.

use serde::{Deserialize, Serialize};

/// A gallery that gets a "send to editor" button cloned next to its
/// existing image buttons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GalleryButton {
    /// Id of the element holding the gallery's buttons.
    pub buttons_id: String,
    /// Id of the gallery element whose first image is sent.
    pub gallery_id: String,
}

/// Where the host UI lives and what it may navigate to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// URL of the host UI loaded into the main webview.
    pub url: String,
    /// Navigation allowlist prefixes. The host URL is always allowed.
    pub allowed_origins: Vec<String>,
    pub gallery_buttons: Vec<GalleryButton>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:7860/".into(),
            allowed_origins: vec![
                "about:blank".into(),
                "https://autmake.com/".into(),
                "https://www.photopea.com/".into(),
            ],
            gallery_buttons: ["txt2img", "img2img", "extras"]
                .iter()
                .map(|tab| GalleryButton {
                    buttons_id: format!("image_buttons_{tab}"),
                    gallery_id: format!("{tab}_gallery"),
                })
                .collect(),
        }
    }
}

impl HostConfig {
    /// Navigation prefixes including the host itself.
    pub fn navigation_allowlist(&self) -> Vec<String> {
        let mut prefixes = vec![self.url.clone()];
        prefixes.extend(self.allowed_origins.iter().cloned());
        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_config_defaults() {
        let config = HostConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:7860/");
        assert_eq!(config.gallery_buttons.len(), 3);
        assert_eq!(config.gallery_buttons[0].buttons_id, "image_buttons_txt2img");
        assert_eq!(config.gallery_buttons[2].gallery_id, "extras_gallery");
    }

    #[test]
    fn navigation_allowlist_starts_with_host() {
        let config = HostConfig::default();
        let allow = config.navigation_allowlist();
        assert_eq!(allow[0], "http://127.0.0.1:7860/");
        assert!(allow.contains(&"about:blank".to_string()));
    }

    #[test]
    fn host_config_partial_toml() {
        let toml_str = r#"
url = "http://gpu-box:7860/"

[[gallery_buttons]]
buttons_id = "image_buttons_txt2img"
gallery_id = "txt2img_gallery"
"#;
        let config: HostConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.url, "http://gpu-box:7860/");
        assert_eq!(config.gallery_buttons.len(), 1);
        assert_eq!(config.allowed_origins.len(), 3);
    }
}
