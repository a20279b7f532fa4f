//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Boxtally -- warehouse scan reconciliation toolkit.
///
/// Use `boxtally <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "boxtally", version, about, long_about = None)]
pub struct Cli {
    /// Path to the boxtally.toml configuration file.
    #[arg(short, long, default_value = "boxtally.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an interactive tally session reading scan lines from stdin.
    Session(SessionArgs),

    /// Validate a single scan line and print the parsed record.
    Parse(ParseArgs),

    /// Check whether a running daemon's metrics endpoint is reachable.
    Status(StatusArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- session ----

/// Run an interactive tally session.
///
/// Reads one scan line per stdin line (keyboard-wedge scanners type the
/// line and press Enter). Type `done` or close stdin (Ctrl-D) to finish.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Transaction kind for this session (audit, inward, outward, prn-outward).
    #[arg(short, long, default_value = "inward")]
    pub kind: String,

    /// Submit the tally to the backend when the session ends.
    #[arg(long)]
    pub submit: bool,

    /// Override the backend base URL (defaults to [submit].base_url).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the device id included in the submission payload.
    #[arg(long)]
    pub device_id: Option<String>,
}

// ---- parse ----

/// Validate a single scan line.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Raw scan line, e.g. "LRNO=A1;PkgsNo=3;BoxNo=1;".
    pub raw: String,
}

// ---- status ----

/// Check daemon liveness via the metrics endpoint.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the metrics endpoint URL (defaults to [metrics] config).
    #[arg(long)]
    pub endpoint: Option<String>,
}

// ---- config ----

/// Manage boxtally configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scan_pipeline, submit, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_session_defaults() {
        let cli = Cli::try_parse_from(["boxtally", "session"]).expect("should parse");
        match cli.command {
            Commands::Session(args) => {
                assert_eq!(args.kind, "inward");
                assert!(!args.submit);
                assert!(args.base_url.is_none());
                assert!(args.device_id.is_none());
            }
            _ => panic!("expected Session command"),
        }
    }

    #[test]
    fn test_cli_parse_session_kind_and_submit() {
        let cli = Cli::try_parse_from([
            "boxtally",
            "session",
            "--kind",
            "audit",
            "--submit",
            "--base-url",
            "https://wms.example.com",
        ])
        .expect("should parse");
        match cli.command {
            Commands::Session(args) => {
                assert_eq!(args.kind, "audit");
                assert!(args.submit);
                assert_eq!(args.base_url.as_deref(), Some("https://wms.example.com"));
            }
            _ => panic!("expected Session command"),
        }
    }

    #[test]
    fn test_cli_parse_parse_command() {
        let cli = Cli::try_parse_from(["boxtally", "parse", "LRNO=A1;PkgsNo=3;BoxNo=1;"])
            .expect("should parse");
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.raw, "LRNO=A1;PkgsNo=3;BoxNo=1;");
            }
            _ => panic!("expected Parse command"),
        }
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::try_parse_from(["boxtally", "status"]).expect("should parse");
        match cli.command {
            Commands::Status(args) => assert!(args.endpoint.is_none()),
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn test_cli_parse_status_with_endpoint() {
        let cli =
            Cli::try_parse_from(["boxtally", "status", "--endpoint", "http://localhost:9187"])
                .expect("should parse");
        match cli.command {
            Commands::Status(args) => {
                assert_eq!(args.endpoint.as_deref(), Some("http://localhost:9187"));
            }
            _ => panic!("expected Status command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["boxtally", "config", "validate"]).expect("should parse");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Validate => {}
                _ => panic!("expected Validate action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["boxtally", "config", "show", "--section", "submit"])
            .expect("should parse");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("submit".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_custom_config_path() {
        let cli = Cli::try_parse_from(["boxtally", "-c", "/custom/config.toml", "status"])
            .expect("should parse");
        assert_eq!(cli.config, std::path::PathBuf::from("/custom/config.toml"));
    }

    #[test]
    fn test_cli_parse_output_format_json() {
        let cli =
            Cli::try_parse_from(["boxtally", "--output", "json", "status"]).expect("should parse");
        match cli.output {
            OutputFormat::Json => {}
            _ => panic!("expected Json output format"),
        }
    }

    #[test]
    fn test_cli_parse_invalid_command_fails() {
        assert!(Cli::try_parse_from(["boxtally", "teleport"]).is_err());
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["boxtally"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "boxtally");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert!(subcommands.contains(&"session"));
        assert!(subcommands.contains(&"parse"));
        assert!(subcommands.contains(&"status"));
        assert!(subcommands.contains(&"config"));
    }
}
