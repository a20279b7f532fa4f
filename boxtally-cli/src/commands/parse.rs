//! `boxtally parse` -- validate a single scan line.

use std::io::Write;

use serde::Serialize;

use boxtally_core::types::ScanRecord;
use boxtally_scan_pipeline::ParserRouter;

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Report for a successfully parsed scan line.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    /// The parsed record.
    pub record: ScanRecord,
    /// Missing boxes if this were the only scan of the shipment.
    pub remaining_boxes: i64,
}

impl Render for ParseReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "LRNO:     {}", self.record.shipment_id)?;
        writeln!(w, "PkgsNo:   {}", self.record.expected_count)?;
        writeln!(w, "BoxNo:    {}", self.record.box_number)?;
        writeln!(w, "Remaining after this scan: {}", self.remaining_boxes)?;
        Ok(())
    }
}

/// Handle the `parse` subcommand.
pub fn run(args: &ParseArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let router = ParserRouter::with_defaults();

    let record = router
        .parse(args.raw.as_bytes())
        .map_err(|e| CliError::Parse(e.to_string()))?;

    let remaining_boxes = (record.expected_count - 1).max(0);
    writer.render(&ParseReport {
        record,
        remaining_boxes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn parse_valid_line() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let args = ParseArgs {
            raw: "LRNO=A1;PkgsNo=3;BoxNo=1;".to_owned(),
        };
        run(&args, &writer).expect("valid line should parse");
    }

    #[test]
    fn parse_invalid_line_fails() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let args = ParseArgs {
            raw: "LRNO=A1;PkgsNo=abc;BoxNo=1;".to_owned(),
        };
        let err = run(&args, &writer).unwrap_err();
        assert!(matches!(err, CliError::Parse(_)));
    }

    #[test]
    fn report_renders_all_fields() {
        let report = ParseReport {
            record: ScanRecord {
                shipment_id: "A1".to_owned(),
                expected_count: 3,
                box_number: 1,
            },
            remaining_boxes: 2,
        };
        let mut buf = Vec::new();
        report.render_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("A1"));
        assert!(text.contains("3"));
        assert!(text.contains("Remaining after this scan: 2"));
    }
}
