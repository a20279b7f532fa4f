//! Module orchestration -- assembly, channel wiring, and lifecycle management.
//!
//! The [`Orchestrator`] is the central coordinator of `boxtally-daemon`.
//! It loads configuration, builds enabled modules, registers them in the
//! core [`PluginRegistry`], manages startup/shutdown ordering, and runs
//! the main event loop.
//!
//! # Startup Order
//!
//! 1. Scan pipeline (collectors + processing loop + submission sink)
//!
//! # Shutdown
//!
//! Triggered by SIGINT (Ctrl+C). Modules are stopped in registration
//! order; the scan pipeline drains its buffer before stopping.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use metrics::gauge;
use tokio::sync::broadcast;

use boxtally_core::config::BoxtallyConfig;
use boxtally_core::metrics as metric_names;
use boxtally_core::plugin::PluginRegistry;

use crate::health::{DaemonHealth, ModuleHealth, aggregate_status};
use crate::modules::scan_pipeline::PipelineChannels;
use crate::modules;

/// Interval between uptime gauge updates.
const UPTIME_UPDATE_INTERVAL: Duration = Duration::from_secs(30);

/// The main daemon orchestrator.
///
/// Manages the complete lifecycle of all boxtally modules:
/// configuration loading, ordered startup, health aggregation,
/// and graceful shutdown.
pub struct Orchestrator {
    /// Loaded and validated configuration.
    config: BoxtallyConfig,
    /// Registry of all plugins (ordered for start/stop).
    plugins: PluginRegistry,
    /// Shutdown broadcast sender (signals all background tasks).
    shutdown_tx: broadcast::Sender<()>,
    /// Daemon start time (for uptime reporting).
    start_time: Instant,
    /// Event receivers from the scan pipeline (consumed by the logger task).
    channels: Option<PipelineChannels>,
}

impl Orchestrator {
    /// Load configuration and build the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read, parsed,
    /// or validated, or if any enabled module fails to initialize.
    pub async fn build(config_path: &Path) -> Result<Self> {
        let config = BoxtallyConfig::load(config_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;
        Self::build_from_config(config).await
    }

    /// Build from an already-loaded configuration.
    ///
    /// Useful for testing or when config has already been loaded.
    pub async fn build_from_config(config: BoxtallyConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        let (shutdown_tx, _) = broadcast::channel(16);
        let mut plugins = PluginRegistry::new();
        let mut channels = None;

        // Initialize scan pipeline
        if let Some((pipeline, pipeline_channels)) = modules::scan_pipeline::init(&config)? {
            plugins
                .register(Box::new(pipeline))
                .map_err(|e| anyhow::anyhow!("failed to register scan pipeline: {}", e))?;
            channels = Some(pipeline_channels);
        }

        tracing::info!(total_plugins = plugins.count(), "orchestrator initialized");

        if config.metrics.enabled {
            gauge!(metric_names::DAEMON_PLUGINS_REGISTERED).set(plugins.count() as f64);
        }

        Ok(Self {
            config,
            plugins,
            shutdown_tx,
            start_time: Instant::now(),
            channels,
        })
    }

    /// Number of registered plugins.
    pub fn plugin_count(&self) -> usize {
        self.plugins.count()
    }

    /// Aggregate the daemon health report.
    pub async fn health(&self) -> DaemonHealth {
        let statuses = self.plugins.health_check_all().await;
        let modules: Vec<ModuleHealth> = statuses
            .into_iter()
            .map(|(name, _state, status)| ModuleHealth {
                name,
                enabled: true,
                status,
            })
            .collect();

        DaemonHealth {
            status: aggregate_status(&modules),
            uptime_secs: self.start_time.elapsed().as_secs(),
            modules,
        }
    }

    /// Start all enabled modules and enter the main event loop.
    ///
    /// This method blocks until a shutdown signal (Ctrl+C) is received.
    pub async fn run(&mut self) -> Result<()> {
        // Write PID file if configured
        if !self.config.general.pid_file.is_empty() {
            let path = Path::new(&self.config.general.pid_file).to_path_buf();
            write_pid_file(&path)?;
        }

        tracing::info!("initializing all plugins");
        if let Err(e) = self.plugins.init_all().await {
            tracing::error!(error = %e, "plugin initialization failed");
            self.cleanup_pid_file();
            return Err(e.into());
        }

        tracing::info!("starting all plugins");
        if let Err(e) = self.plugins.start_all().await {
            // Rollback: stop any plugins that were successfully started
            tracing::warn!("startup failed, rolling back already-started plugins");
            if let Err(stop_err) = self.plugins.stop_all().await {
                tracing::error!(
                    startup_error = %e,
                    rollback_error = %stop_err,
                    "rollback also failed during startup failure cleanup"
                );
            }
            self.cleanup_pid_file();
            return Err(e.into());
        }

        // Spawn event logger task
        let mut event_logger_task = self.channels.take().map(|channels| {
            let shutdown_rx = self.shutdown_tx.subscribe();
            spawn_event_logger(channels, shutdown_rx)
        });

        tracing::info!("boxtally-daemon running — modules active");

        let mut uptime_interval = tokio::time::interval(UPTIME_UPDATE_INTERVAL);
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received");
                    break;
                }
                _ = uptime_interval.tick() => {
                    if self.config.metrics.enabled {
                        gauge!(metric_names::DAEMON_UPTIME_SECONDS)
                            .set(self.start_time.elapsed().as_secs() as f64);
                    }
                }
            }
        }

        // Graceful shutdown: stop event logger, then modules
        let _ = self.shutdown_tx.send(());
        if let Some(task) = event_logger_task.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), task).await;
        }

        if let Err(e) = self.plugins.stop_all().await {
            tracing::error!(error = %e, "errors while stopping plugins");
        }

        self.cleanup_pid_file();
        tracing::info!("boxtally-daemon shut down");
        Ok(())
    }

    /// Remove the PID file if one was configured.
    fn cleanup_pid_file(&self) {
        if !self.config.general.pid_file.is_empty() {
            remove_pid_file(Path::new(&self.config.general.pid_file));
        }
    }
}

/// Spawn a task that logs scan pipeline events.
///
/// Each accepted scan is logged at debug level, completions and
/// submission outcomes at info level.
fn spawn_event_logger(
    mut channels: PipelineChannels,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(event) = channels.scan_rx.recv() => {
                    tracing::debug!(
                        shipment = %event.record.shipment_id,
                        box_number = event.record.box_number,
                        kind = %event.kind,
                        duplicate = event.duplicate,
                        source = %event.source,
                        "scan recorded"
                    );
                }
                Some(event) = channels.completion_rx.recv() => {
                    tracing::info!(
                        shipment = %event.shipment_id,
                        kind = %event.kind,
                        boxes = event.expected_count,
                        "shipment complete"
                    );
                }
                Some(event) = channels.submission_rx.recv() => {
                    if event.success {
                        tracing::info!(
                            kind = %event.kind,
                            shipments = event.shipment_count,
                            "transaction batch submitted"
                        );
                    } else {
                        tracing::warn!(
                            kind = %event.kind,
                            shipments = event.shipment_count,
                            "transaction batch submission failed"
                        );
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("event logger shutting down");
                    break;
                }
                else => break,
            }
        }
    })
}

/// Write the current process id to the PID file.
fn write_pid_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("failed to create pid file directory: {}", e))?;
    }
    std::fs::write(path, std::process::id().to_string())
        .map_err(|e| anyhow::anyhow!("failed to write pid file {}: {}", path.display(), e))?;
    tracing::info!(path = %path.display(), "pid file written");
    Ok(())
}

/// Remove the PID file, logging (not failing) on error.
fn remove_pid_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove pid file");
    }
}
