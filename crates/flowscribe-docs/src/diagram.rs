//! Mermaid flowchart export.
//!
//! Each step becomes a node and is chained to the next one:
//!
//! ```text
//! flowchart TD
//!     S1["Process customer order"]
//!     S2["Generate invoice"]
//!     S1 --> S2
//! ```
//!
//! The diagram is rebuilt from the steps on every call.

use flowscribe_core::Step;

use crate::error::Result;
use crate::export::{ExportFormat, Exporter};

/// Default maximum node label width, in characters.
pub const DEFAULT_LABEL_WIDTH: usize = 40;

/// Sequential flowchart of the steps.
#[derive(Debug, Clone, Copy)]
pub struct DiagramExporter {
    label_width: usize,
}

impl DiagramExporter {
    /// `label_width` below 4 is raised to 4 so the `...` suffix fits.
    pub fn new(label_width: usize) -> Self {
        Self {
            label_width: label_width.max(4),
        }
    }
}

impl Default for DiagramExporter {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_WIDTH)
    }
}

impl Exporter for DiagramExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Diagram
    }

    fn export(&self, steps: &[Step]) -> Result<String> {
        let mut out = String::from("flowchart TD\n");
        for (i, step) in steps.iter().enumerate() {
            out.push_str(&format!(
                "    S{}[\"{}\"]\n",
                i + 1,
                node_label(&step.label, self.label_width)
            ));
        }
        for i in 1..steps.len() {
            out.push_str(&format!("    S{} --> S{}\n", i, i + 1));
        }
        Ok(out)
    }
}

/// Truncate to `width` chars and replace double quotes.
fn node_label(label: &str, width: usize) -> String {
    let label = label.replace('"', "'");
    if label.chars().count() <= width {
        return label;
    }
    let mut cut: String = label.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_steps_in_order() {
        let steps = vec![
            Step::matched(1, "Register new user"),
            Step::matched(2, "Authenticate user login"),
            Step::matched(3, "Deploy application"),
        ];
        let out = DiagramExporter::default().export(&steps).unwrap();
        assert_eq!(
            out,
            "flowchart TD\n    S1[\"Register new user\"]\n    S2[\"Authenticate user login\"]\n    \
             S3[\"Deploy application\"]\n    S1 --> S2\n    S2 --> S3\n"
        );
    }

    #[test]
    fn single_step_has_no_edges() {
        let out = DiagramExporter::default()
            .export(&[Step::matched(1, "Start process")])
            .unwrap();
        assert!(!out.contains("-->"));
    }

    #[test]
    fn labels_are_escaped_and_truncated() {
        assert_eq!(node_label("Say \"hi\"", 40), "Say 'hi'");
        let long = node_label("Email the quarterly summary to every stakeholder", 20);
        assert_eq!(long, "Email the quarter...");
        assert_eq!(long.chars().count(), 20);
    }

    #[test]
    fn tiny_width_is_clamped() {
        let exporter = DiagramExporter::new(0);
        let out = exporter.export(&[Step::matched(1, "Generate invoice")]).unwrap();
        assert!(out.contains("S1[\"G...\"]"));
    }
}
