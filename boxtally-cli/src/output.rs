//! Output formatting abstraction for text vs JSON rendering
//!
//! All subcommand output flows through [`OutputWriter`] which handles format switching.
//! This keeps format-specific logic out of command handlers entirely.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Abstraction for writing CLI output in different formats.
///
/// Subcommand handlers call `writer.render(&payload)` where `payload`
/// implements both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Whether the writer is in text mode.
    ///
    /// Commands use this to suppress incremental progress lines in JSON mode.
    pub fn is_text(&self) -> bool {
        matches!(self.format, OutputFormat::Text)
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Text => {
                payload.render_text(&mut handle)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, payload)?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestPayload {
        field1: String,
        field2: u32,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Field1: {}", self.field1)?;
            writeln!(w, "Field2: {}", self.field2)?;
            Ok(())
        }
    }

    #[test]
    fn test_render_text_format() {
        let payload = TestPayload {
            field1: "test value".to_owned(),
            field2: 42,
        };

        let mut buffer = Vec::new();
        payload
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Field1: test value"));
        assert!(output.contains("Field2: 42"));
    }

    #[test]
    fn test_json_format_structure() {
        let payload = TestPayload {
            field1: "test".to_owned(),
            field2: 100,
        };

        let json = serde_json::to_string(&payload).expect("json serialization should succeed");
        let parsed: serde_json::Value =
            serde_json::from_str(&json).expect("should parse back to JSON");

        assert_eq!(parsed["field1"].as_str(), Some("test"));
        assert_eq!(parsed["field2"].as_u64(), Some(100));
    }

    #[test]
    fn test_is_text() {
        assert!(OutputWriter::new(OutputFormat::Text).is_text());
        assert!(!OutputWriter::new(OutputFormat::Json).is_text());
    }
}
