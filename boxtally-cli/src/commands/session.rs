//! `boxtally session` -- interactive tally session over stdin.
//!
//! Reads one scan line per stdin line, parses it, and tallies it into a
//! session-local [`ReconStore`]. Progress feedback goes to stderr so the
//! final report on stdout stays machine-readable in JSON mode.

use std::io::Write;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use boxtally_core::config::BoxtallyConfig;
use boxtally_core::types::TransactionKind;
use boxtally_scan_pipeline::collector::RawScan;
use boxtally_scan_pipeline::submit::{
    HttpSubmissionSink, ShipmentEntry, SubmissionSink, TransactionPayload,
};
use boxtally_scan_pipeline::{ParserRouter, ReconStore, ScanDebouncer, ScanOutcome};

use crate::cli::SessionArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Final session report.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    /// Transaction kind the session tallied under.
    pub kind: TransactionKind,
    /// Per-shipment results in first-scan order.
    pub shipments: Vec<ShipmentEntry>,
    /// Scans recorded into the ledger (duplicates excluded).
    pub scans_recorded: u64,
    /// Duplicate scans absorbed.
    pub duplicates: u64,
    /// Lines that failed to parse.
    pub parse_errors: u64,
    /// Lines suppressed by the debounce window.
    pub debounced: u64,
    /// Whether the tally was submitted to the backend.
    pub submitted: bool,
}

impl Render for SessionReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Tally session ({})", self.kind)?;
        writeln!(
            w,
            "{:<20} {:>8} {:>8} {:<10} Missing",
            "LRNO", "Scanned", "Expected", "Status"
        )?;
        writeln!(w, "{}", "-".repeat(68))?;

        for shipment in &self.shipments {
            let status = if shipment.complete { "complete" } else { "open" };
            let missing = if shipment.missing.is_empty() {
                "-".to_owned()
            } else {
                shipment
                    .missing
                    .iter()
                    .map(|b| b.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            writeln!(
                w,
                "{:<20} {:>8} {:>8} {:<10} {}",
                shipment.lrno,
                shipment.boxes.len(),
                shipment.expected_count,
                status,
                missing,
            )?;
        }

        writeln!(w, "{}", "-".repeat(68))?;
        writeln!(
            w,
            "recorded={} duplicates={} parse_errors={} debounced={}",
            self.scans_recorded, self.duplicates, self.parse_errors, self.debounced,
        )?;
        if self.submitted {
            writeln!(w, "submitted to backend")?;
        }
        Ok(())
    }
}

/// Handle the `session` subcommand.
pub async fn run(
    args: &SessionArgs,
    config: &BoxtallyConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let kind = TransactionKind::from_str_loose(&args.kind)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown transaction kind '{}'", args.kind)))?;

    let router = ParserRouter::with_defaults();
    let mut store = ReconStore::with_active(kind);
    let mut debouncer = ScanDebouncer::new(Duration::from_millis(config.scan_pipeline.debounce_ms));

    let mut recorded = 0u64;
    let mut duplicates = 0u64;
    let mut parse_errors = 0u64;

    if writer.is_text() {
        eprintln!("tally session ({kind}) — scan lines, 'done' or Ctrl-D to finish");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "done" {
            break;
        }

        let raw = RawScan::new(Bytes::copy_from_slice(line.as_bytes()), "hid:stdin");
        if !debouncer.accept(&raw) {
            continue;
        }

        match router.parse(raw.data.as_ref()) {
            Ok(record) => {
                let outcome = store.add_scan(&record);
                match outcome {
                    ScanOutcome::Duplicate => {
                        duplicates += 1;
                        if writer.is_text() {
                            eprintln!("  ! duplicate: {} box {}", record.shipment_id, record.box_number);
                        }
                    }
                    ScanOutcome::NewShipment | ScanOutcome::Recorded => {
                        recorded += 1;
                        if writer.is_text() {
                            let missing = store
                                .missing_boxes(&record.shipment_id)
                                .unwrap_or_default()
                                .len();
                            eprintln!(
                                "  + {} box {}/{} (missing: {})",
                                record.shipment_id,
                                record.box_number,
                                record.expected_count,
                                missing,
                            );
                        }
                    }
                }
            }
            Err(e) => {
                parse_errors += 1;
                // 재스캔 유도: 세션은 계속된다
                if writer.is_text() {
                    eprintln!("  ! unreadable scan: {e}");
                }
            }
        }
    }

    let mut submitted = false;
    if args.submit {
        submitted = submit_tally(args, config, &mut store).await?;
    }

    let report = SessionReport {
        kind,
        shipments: store
            .snapshot()
            .iter()
            .map(|t| ShipmentEntry::from_tally(t))
            .collect(),
        scans_recorded: recorded,
        duplicates,
        parse_errors,
        debounced: debouncer.suppressed_count(),
        submitted,
    };

    writer.render(&report)
}

/// Submit the session tally and clear the context on confirmed success.
async fn submit_tally(
    args: &SessionArgs,
    config: &BoxtallyConfig,
    store: &mut ReconStore,
) -> Result<bool, CliError> {
    let base_url = args
        .base_url
        .clone()
        .or_else(|| {
            if config.submit.base_url.is_empty() {
                None
            } else {
                Some(config.submit.base_url.clone())
            }
        })
        .ok_or_else(|| {
            CliError::InvalidArgument(
                "--submit requires --base-url or [submit].base_url in the config".to_owned(),
            )
        })?;

    let device_id = args
        .device_id
        .clone()
        .unwrap_or_else(|| config.submit.device_id.clone());

    let payload =
        TransactionPayload::from_snapshot(store.active_context(), device_id, &store.snapshot());
    if payload.shipment_count() == 0 {
        return Ok(false);
    }

    let sink = HttpSubmissionSink::new(base_url, config.submit.timeout_secs)?;
    sink.submit(&payload)
        .await
        .map_err(|e| CliError::Submit(e.to_string()))?;

    // 성공이 확인된 뒤에만 컨텍스트를 비운다
    store.clear();
    Ok(true)
}
