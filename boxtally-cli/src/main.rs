use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use boxtally_core::config::BoxtallyConfig;
use boxtally_core::error::{BoxtallyError, ConfigError};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use output::OutputWriter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // 로그는 stderr로 — stdout은 리포트 전용
    let log_level = args.log_level.clone().unwrap_or_else(|| "warn".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let writer = OutputWriter::new(args.output);

    match &args.command {
        Commands::Session(session_args) => {
            let config = load_or_default(&args).await?;
            commands::session::run(session_args, &config, &writer).await?;
        }
        Commands::Parse(parse_args) => {
            commands::parse::run(parse_args, &writer)?;
        }
        Commands::Status(status_args) => {
            let config = load_or_default(&args).await?;
            commands::status::run(status_args, &config, &writer).await?;
        }
        Commands::Config(config_args) => {
            commands::config::run(&config_args.action, &args.config, &writer).await?;
        }
    }

    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist.
///
/// Missing files are normal for ad-hoc CLI use; any other error is fatal.
async fn load_or_default(args: &Cli) -> Result<BoxtallyConfig> {
    match BoxtallyConfig::load(&args.config).await {
        Ok(config) => Ok(config),
        Err(BoxtallyError::Config(ConfigError::FileNotFound { path })) => {
            tracing::debug!(path = %path, "config file not found, using defaults");
            let mut config = BoxtallyConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
        Err(e) => Err(e.into()),
    }
}
