//! Markdown report export.
//!
//! Layout:
//!
//! ```text
//! # <title>
//!
//! - Generated: <timestamp>
//! - Steps: <count>
//! - Source: <source>
//!
//! 1. <label>
//!
//! 2. <label>
//! ```

use chrono::{DateTime, Utc};

use flowscribe_core::Step;

use crate::error::Result;
use crate::export::{ExportFormat, Exporter};

/// Optional block printed under the title.
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    /// Where the description came from (file name, "stdin", ...).
    pub source: Option<String>,
}

impl ReportMetadata {
    /// Metadata stamped with the current time.
    pub fn now(source: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
        }
    }
}

/// Title, optional metadata, then one numbered paragraph per step.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    pub title: String,
    pub metadata: Option<ReportMetadata>,
}

impl Exporter for ReportExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Report
    }

    fn export(&self, steps: &[Step]) -> Result<String> {
        let mut out = format!("# {}\n\n", self.title.trim());

        if let Some(meta) = &self.metadata {
            out.push_str(&format!(
                "- Generated: {}\n",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            out.push_str(&format!("- Steps: {}\n", steps.len()));
            if let Some(source) = &meta.source {
                out.push_str(&format!("- Source: {source}\n"));
            }
            out.push('\n');
        }

        let paragraphs: Vec<String> = steps
            .iter()
            .map(|s| format!("{}. {}", s.number, s.label))
            .collect();
        out.push_str(&paragraphs.join("\n\n"));
        out.push('\n');
        Ok(out)
    }
}
