//! CLI argument definitions for boxtally-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Boxtally scan reconciliation daemon.
///
/// Runs the scan pipeline (collectors, parsers, reconciliation ledger)
/// and the submission gateway as long-lived services.
#[derive(Parser, Debug)]
#[command(name = "boxtally-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to boxtally.toml configuration file.
    #[arg(short, long, default_value = "/etc/boxtally/boxtally.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,

    /// Override PID file path (takes precedence over config file).
    #[arg(long)]
    pub pid_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = DaemonCli::try_parse_from(["boxtally-daemon"]).expect("should parse");
        assert_eq!(
            cli.config,
            PathBuf::from("/etc/boxtally/boxtally.toml")
        );
        assert!(cli.log_level.is_none());
        assert!(!cli.validate);
    }

    #[test]
    fn parse_overrides() {
        let cli = DaemonCli::try_parse_from([
            "boxtally-daemon",
            "-c",
            "/tmp/boxtally.toml",
            "--log-level",
            "debug",
            "--validate",
        ])
        .expect("should parse");
        assert_eq!(cli.config, PathBuf::from("/tmp/boxtally.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.validate);
    }
}
