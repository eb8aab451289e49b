use clap::Parser;

/// Easel: bridges an image-generation web UI and a browser image editor.
#[derive(Parser, Debug)]
#[command(name = "easel", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (a tracing filter such as `easel=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Host UI URL override.
    #[arg(long)]
    pub host_url: Option<String>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
