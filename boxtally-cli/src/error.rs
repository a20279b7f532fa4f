//! CLI error type.

use boxtally_core::error::BoxtallyError;
use boxtally_scan_pipeline::ScanPipelineError;

/// Errors surfaced by CLI command handlers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Invalid command-line argument value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Scan line failed to parse.
    #[error("scan parse failed: {0}")]
    Parse(String),

    /// Submission to the backend failed.
    #[error("submission failed: {0}")]
    Submit(String),

    /// Core library error (config loading, validation).
    #[error(transparent)]
    Core(#[from] BoxtallyError),

    /// Pipeline library error.
    #[error(transparent)]
    Pipeline(#[from] ScanPipelineError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
