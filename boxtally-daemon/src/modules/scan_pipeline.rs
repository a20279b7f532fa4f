//! Scan pipeline module initialization.
//!
//! Converts `BoxtallyConfig.scan_pipeline` into a `PipelineConfig`,
//! wires the submission sink when the gateway is enabled, and builds
//! the `ScanPipeline`.
//!
//! # Channel Wiring
//!
//! ```text
//! collectors --RawScan--> ScanPipeline --ScanEvent/CompletionEvent--> daemon loggers
//! ScanPipeline --TransactionPayload--> HttpSubmissionSink --> backend
//! ```

use anyhow::Result;
use tokio::sync::mpsc;

use boxtally_core::config::BoxtallyConfig;
use boxtally_core::event::{CompletionEvent, ScanEvent, SubmissionEvent};

use boxtally_scan_pipeline::submit::HttpSubmissionSink;
use boxtally_scan_pipeline::{PipelineConfig, ScanPipeline, ScanPipelineBuilder};

/// Event receivers handed back to the orchestrator for logging/metrics.
pub struct PipelineChannels {
    /// Accepted scans (including duplicates).
    pub scan_rx: mpsc::Receiver<ScanEvent>,
    /// Shipments whose missing set just became empty.
    pub completion_rx: mpsc::Receiver<CompletionEvent>,
    /// Submission attempt outcomes.
    pub submission_rx: mpsc::Receiver<SubmissionEvent>,
}

/// Initialize the scan pipeline module.
///
/// Returns `None` if the scan pipeline is disabled in configuration.
///
/// # Returns
///
/// * `Ok(Some((ScanPipeline, PipelineChannels)))` - Pipeline ready to init/start
/// * `Ok(None)` - Module disabled in configuration
/// * `Err(_)` - Initialization failed
pub fn init(config: &BoxtallyConfig) -> Result<Option<(ScanPipeline, PipelineChannels)>> {
    if !config.scan_pipeline.enabled {
        tracing::info!("scan pipeline disabled in configuration");
        return Ok(None);
    }

    tracing::info!("initializing scan pipeline");

    let mut pipeline_config = PipelineConfig::from_core(&config.scan_pipeline);
    pipeline_config.auto_submit = config.submit.enabled && config.submit.auto_submit;

    let (scan_tx, scan_rx) = mpsc::channel(1024);
    let (completion_tx, completion_rx) = mpsc::channel(256);
    let (submission_tx, submission_rx) = mpsc::channel(64);

    let mut builder = ScanPipelineBuilder::new()
        .config(pipeline_config)
        .scan_sender(scan_tx)
        .completion_sender(completion_tx)
        .submission_sender(submission_tx)
        .device_id(config.submit.device_id.clone());

    if config.submit.enabled {
        let sink = HttpSubmissionSink::new(config.submit.base_url.clone(), config.submit.timeout_secs)
            .map_err(|e| anyhow::anyhow!("failed to build submission sink: {}", e))?;
        builder = builder.submission_sink(Box::new(sink));
        tracing::info!(base_url = %config.submit.base_url, "submission gateway enabled");
    }

    let (pipeline, _) = builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build scan pipeline: {}", e))?;

    Ok(Some((
        pipeline,
        PipelineChannels {
            scan_rx,
            completion_rx,
            submission_rx,
        },
    )))
}
