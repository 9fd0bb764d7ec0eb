//! Tracing setup for the binary.
//!
//! `RUST_LOG` wins when set. Otherwise the `--level` flag (or the config
//! file's `[logging] level`) sets the default, refined by `module_levels`.

use tracing_subscriber::{EnvFilter, fmt};

use crate::{config::LoggingToml, log_level::LogLevel};

/// Install the global subscriber. Logs go to stderr so command output stays clean.
pub fn init_tracing(config: &LoggingToml, level: Option<LogLevel>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new("").add_directive(level.unwrap_or(config.level).into());
        // A level given on the command line overrides every per-module default.
        if level.is_none() {
            for directive in &config.module_levels {
                filter = filter.add_directive(directive.clone().into());
            }
        }
        filter
    });

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}
