//! `boxtally status` -- probe the daemon's metrics endpoint.

use std::io::Write;
use std::time::Duration;

use serde::Serialize;

use boxtally_core::config::BoxtallyConfig;

use crate::cli::StatusArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Probe timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Report for the `status` subcommand.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Metrics endpoint that was probed.
    pub endpoint: String,
    /// Whether the endpoint responded successfully.
    pub reachable: bool,
    /// Number of boxtally metric lines in the scrape output.
    pub metric_lines: usize,
}

impl Render for StatusReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.reachable {
            writeln!(
                w,
                "daemon up — {} ({} boxtally metrics)",
                self.endpoint, self.metric_lines
            )
        } else {
            writeln!(w, "daemon unreachable — {}", self.endpoint)
        }
    }
}

/// Handle the `status` subcommand.
pub async fn run(
    args: &StatusArgs,
    config: &BoxtallyConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let endpoint = args.endpoint.clone().unwrap_or_else(|| {
        format!(
            "http://{}:{}{}",
            config.metrics.listen_addr, config.metrics.port, config.metrics.endpoint
        )
    });

    let report = probe(&endpoint).await;
    writer.render(&report)
}

/// Probe the metrics endpoint and build a report.
///
/// An unreachable daemon is a report, not an error.
async fn probe(endpoint: &str) -> StatusReport {
    let client = match reqwest::Client::builder().timeout(PROBE_TIMEOUT).build() {
        Ok(client) => client,
        Err(_) => {
            return StatusReport {
                endpoint: endpoint.to_owned(),
                reachable: false,
                metric_lines: 0,
            };
        }
    };

    match client.get(endpoint).send().await {
        Ok(response) if response.status().is_success() => {
            let body = response.text().await.unwrap_or_default();
            let metric_lines = body
                .lines()
                .filter(|line| line.starts_with("boxtally_"))
                .count();
            StatusReport {
                endpoint: endpoint.to_owned(),
                reachable: true,
                metric_lines,
            }
        }
        _ => StatusReport {
            endpoint: endpoint.to_owned(),
            reachable: false,
            metric_lines: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_reported_not_an_error() {
        let report = probe("http://127.0.0.1:1/metrics").await;
        assert!(!report.reachable);
        assert_eq!(report.metric_lines, 0);
    }

    #[test]
    fn report_renders_reachable() {
        let report = StatusReport {
            endpoint: "http://localhost:9187/metrics".to_owned(),
            reachable: true,
            metric_lines: 12,
        };
        let mut buf = Vec::new();
        report.render_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("daemon up"));
        assert!(text.contains("12"));
    }

    #[test]
    fn report_renders_unreachable() {
        let report = StatusReport {
            endpoint: "http://localhost:9187/metrics".to_owned(),
            reachable: false,
            metric_lines: 0,
        };
        let mut buf = Vec::new();
        report.render_text(&mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("unreachable"));
    }
}
