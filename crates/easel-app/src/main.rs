mod app_state;
mod cli;

use std::path::PathBuf;

use easel_config::schema::EaselConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

const DEFAULT_LOG_DIRECTIVE: &str = "easel=info";

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- Easel crashed ---");
        eprintln!("Run with --log-level easel=debug to capture the transfer log.");
        eprintln!("---------------------\n");

        default_hook(info);
    }));
}

/// Resolve which config file to use: the CLI override, else the platform
/// default. `None` means no usable path, and the app runs on defaults.
fn config_path(args: &cli::Args) -> Option<PathBuf> {
    match &args.config {
        Some(path) => Some(PathBuf::from(path)),
        None => easel_config::toml_loader::default_config_path().ok(),
    }
}

fn main() {
    install_panic_hook();

    let args = cli::parse();
    let path = config_path(&args);

    // Load config before logging so its level can seed the filter.
    let loaded = easel_config::load_config(path.as_deref());
    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or(DEFAULT_LOG_DIRECTIVE);

    let log_directive = args.log_level.as_deref().unwrap_or(config_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse())
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    tracing::info!("Easel v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        EaselConfig::default()
    });
    if let Some(ref url) = args.host_url {
        tracing::info!("Using host URL override: {url}");
        config.host.url = url.clone();
    }
    tracing::info!(host = %config.host.url, editor = %config.editor.url, "Config loaded");

    if args.print_config {
        println!("{}", easel_config::config_to_json(&config));
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app_state::EaselApp::new(config, path);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
