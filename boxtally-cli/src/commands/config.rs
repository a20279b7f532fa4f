//! `boxtally config` -- validate and inspect configuration.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use boxtally_core::config::BoxtallyConfig;

use crate::cli::ConfigAction;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Report for `config validate`.
#[derive(Debug, Serialize)]
pub struct ValidateReport {
    /// Path that was checked.
    pub path: String,
    /// Always true when this report is rendered (errors abort earlier).
    pub valid: bool,
}

impl Render for ValidateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{}: configuration OK", self.path)
    }
}

/// Report for `config show`.
#[derive(Debug, Serialize)]
pub struct ShowReport {
    /// Section filter, if any.
    pub section: Option<String>,
    /// Effective configuration rendered as TOML.
    pub toml: String,
}

impl Render for ShowReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write!(w, "{}", self.toml)
    }
}

/// Handle the `config` subcommand.
pub async fn run(
    action: &ConfigAction,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match action {
        ConfigAction::Validate => {
            // load()는 파싱 + 환경변수 오버라이드 + 검증까지 수행
            BoxtallyConfig::load(config_path).await?;
            writer.render(&ValidateReport {
                path: config_path.display().to_string(),
                valid: true,
            })
        }
        ConfigAction::Show { section } => {
            let config = BoxtallyConfig::load(config_path).await?;
            let toml = render_section(&config, section.as_deref())?;
            writer.render(&ShowReport {
                section: section.clone(),
                toml,
            })
        }
    }
}

/// Render the whole config or a single section as TOML.
fn render_section(config: &BoxtallyConfig, section: Option<&str>) -> Result<String, CliError> {
    match section {
        None => Ok(toml::to_string_pretty(config)?),
        Some("general") => Ok(toml::to_string_pretty(&config.general)?),
        Some("scan_pipeline") => Ok(toml::to_string_pretty(&config.scan_pipeline)?),
        Some("submit") => Ok(toml::to_string_pretty(&config.submit)?),
        Some("metrics") => Ok(toml::to_string_pretty(&config.metrics)?),
        Some(other) => Err(CliError::InvalidArgument(format!(
            "unknown config section '{other}' (expected general, scan_pipeline, submit, metrics)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn render_whole_config() {
        let config = BoxtallyConfig::default();
        let toml = render_section(&config, None).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[scan_pipeline]"));
    }

    #[test]
    fn render_single_section() {
        let config = BoxtallyConfig::default();
        let toml = render_section(&config, Some("submit")).unwrap();
        assert!(toml.contains("device_id"));
        assert!(!toml.contains("log_level"));
    }

    #[test]
    fn render_unknown_section_fails() {
        let config = BoxtallyConfig::default();
        let err = render_section(&config, Some("bluetooth")).unwrap_err();
        assert!(err.to_string().contains("bluetooth"));
    }

    #[tokio::test]
    async fn validate_reports_ok_for_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxtally.toml");
        tokio::fs::write(&path, "[general]\nlog_level = \"debug\"\n")
            .await
            .unwrap();

        let writer = OutputWriter::new(OutputFormat::Text);
        run(&ConfigAction::Validate, &path, &writer).await.unwrap();
    }

    #[tokio::test]
    async fn validate_fails_for_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxtally.toml");
        tokio::fs::write(&path, "[general]\nlog_level = \"extreme\"\n")
            .await
            .unwrap();

        let writer = OutputWriter::new(OutputFormat::Text);
        assert!(run(&ConfigAction::Validate, &path, &writer).await.is_err());
    }
}
