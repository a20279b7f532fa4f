use anyhow::Result;
use clap::Parser;

mod cli;

use cli::DaemonCli;

use boxtally_core::config::BoxtallyConfig;
use boxtally_daemon::orchestrator::Orchestrator;
use boxtally_daemon::{logging, metrics_server};

#[tokio::main]
async fn main() -> Result<()> {
    let args = DaemonCli::parse();

    // 설정 로드 + 환경변수 오버라이드, CLI 인자가 최종 우선
    let mut config = BoxtallyConfig::load(&args.config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", args.config.display(), e))?;

    if let Some(level) = &args.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &args.log_format {
        config.general.log_format = format.clone();
    }
    if let Some(pid_file) = &args.pid_file {
        config.general.pid_file = pid_file.clone();
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if args.validate {
        println!("{}: configuration OK", args.config.display());
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(config = %args.config.display(), "boxtally-daemon starting");

    // 메트릭 레코더는 플러그인 초기화 전에 설치
    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)?;
        tracing::info!(port = config.metrics.port, "metrics endpoint enabled");
    }

    let mut orchestrator = Orchestrator::build_from_config(config).await?;
    orchestrator.run().await
}
