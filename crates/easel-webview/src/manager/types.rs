use easel_config::EaselConfig;

/// Configuration for creating the host WebView.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    /// Initial URL to load.
    pub url: String,
    /// Whether to enable dev tools.
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
    /// Whether to enable clipboard access.
    pub clipboard: bool,
    /// Scripts run before any page script, in order.
    pub init_scripts: Vec<String>,
    /// URL prefixes the webview may navigate to.
    pub allowed_navigation: Vec<String>,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            devtools: cfg!(debug_assertions),
            user_agent: Some(format!("Easel/{}", env!("CARGO_PKG_VERSION"))),
            clipboard: true,
            init_scripts: Vec::new(),
            allowed_navigation: vec!["about:blank".to_string()],
        }
    }
}

impl WebViewConfig {
    /// Host webview settings: the host URL, the IPC bridge and page
    /// runtime, and the configured navigation allowlist.
    pub fn for_host(config: &EaselConfig) -> Self {
        Self {
            url: config.host.url.clone(),
            devtools: config.window.devtools,
            init_scripts: vec![
                crate::ipc::IPC_INIT_SCRIPT.to_string(),
                crate::runtime::runtime_script(config),
            ],
            allowed_navigation: config.host.navigation_allowlist(),
            ..Default::default()
        }
    }
}
