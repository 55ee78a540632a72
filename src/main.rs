//! Softline - toxic text detection and rewriting
//!
//! Main entry point for the Softline CLI.

mod cli;
mod cmd_analytics;
mod cmd_rewrite;
mod register;

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use softline_config::{ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands};
use crate::cmd_rewrite::RewriteArgs;

/// Get the .softline directory path.
fn softline_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".softline"))
        .unwrap_or_else(|| PathBuf::from(".softline"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// Log files are written to ~/.softline/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = softline_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("softline")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes on drop; must outlive every log call.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!(path = %warning.path, "{}", warning.message);
    }
    debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Rewrite {
            file,
            url,
            style,
            backend,
            text,
        } => {
            let args = RewriteArgs {
                file,
                text,
                url,
                style,
                backend,
            };
            cmd_rewrite::run_rewrite(&config, args).await
        }
        Commands::Score { texts } => cmd_rewrite::run_score(&config, &texts).await,
        Commands::Analytics { clear, json, top } => cmd_analytics::run_analytics(&config, clear, json, top),
        Commands::Styles => {
            cmd_analytics::run_styles();
            Ok(())
        }
    }
}
