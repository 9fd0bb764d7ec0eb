use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use url::Url;

use social::{FileSessionStore, Social, SocialHttpClient, ToastQueue};

mod commands;
mod config;
mod log_level;
mod logging;

use commands::{App, Command};
use config::{API_URL_ENV, ConfigToml};
use log_level::LogLevel;

#[derive(Parser, Debug)]
#[command(version, about = "Command-line client for the social network.")]
struct Cli {
    /// Configuration file layered over the built-in defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API root, e.g. `https://social.example.net/api/`.
    #[arg(long, global = true, env = API_URL_ENV)]
    api_url: Option<Url>,

    /// Maximum tracing verbosity: error|warn|info|debug|trace
    #[arg(short, long, global = true)]
    level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigToml::load(cli.config.as_deref())?;
    logging::init_tracing(&config.logging, cli.level)?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    debug!(api = %config.api.base_url, "Configuration loaded");

    let mut builder = SocialHttpClient::builder();
    builder
        .base_url(config.api.base_url.as_str())
        .user_agent_extra(concat!("social-cli/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config.api.request_timeout() {
        builder.request_timeout(timeout);
    }
    let client = builder.build()?;

    let session_file = config
        .session_file()
        .context("No data directory found; set `session.file` in the config")?;
    debug!(path = %session_file.display(), "Session store");

    let toasts = ToastQueue::default();
    let social = Social::with_client(client).with_notifier(toasts.clone());
    let session = social.session(FileSessionStore::new(session_file));

    App {
        social,
        session,
        toasts,
    }
    .run(cli.command)
    .await
}
