//! Two-column CSV export: step number and label.

use flowscribe_core::Step;

use crate::error::Result;
use crate::export::{ExportFormat, Exporter};

/// Header row written before the steps.
pub const CSV_HEADER: &str = "step,label";

/// CSV with RFC 4180 quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn export(&self, steps: &[Step]) -> Result<String> {
        let mut out = String::with_capacity(16 + steps.len() * 32);
        out.push_str(CSV_HEADER);
        out.push_str("\r\n");
        for step in steps {
            out.push_str(&step.number.to_string());
            out.push(',');
            out.push_str(&escape_field(&step.label));
            out.push_str("\r\n");
        }
        Ok(out)
    }
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows() {
        let steps = vec![
            Step::matched(1, "Process customer order"),
            Step::matched(2, "Generate invoice"),
        ];
        let out = CsvExporter.export(&steps).unwrap();
        assert_eq!(
            out,
            "step,label\r\n1,Process customer order\r\n2,Generate invoice\r\n"
        );
    }

    #[test]
    fn fields_with_commas_and_quotes_are_quoted() {
        assert_eq!(escape_field("Pick, pack"), "\"Pick, pack\"");
        assert_eq!(escape_field("Say \"hi\""), "\"Say \"\"hi\"\"\"");
        assert_eq!(escape_field("plain"), "plain");
    }

    #[test]
    fn empty_steps_still_have_header() {
        assert_eq!(CsvExporter.export(&[]).unwrap(), "step,label\r\n");
    }
}
