//! Export formats and the [`Exporter`] trait.
//!
//! Every exporter is a one-way projection of the classifier's ordered steps;
//! none of them adds, drops, or reorders entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use flowscribe_core::Step;

use crate::csv::CsvExporter;
use crate::diagram::DiagramExporter;
use crate::error::{DocsError, Result};
use crate::pdf::PdfExporter;
use crate::report::{ReportExporter, ReportMetadata};

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// `Step <n>: <label>` lines.
    Text,
    /// Two-column CSV: step number, label.
    Csv,
    /// Markdown report with title and metadata.
    Report,
    /// The report laid out as a PDF document.
    Pdf,
    /// `{"workflow": [...]}`.
    Json,
    /// Mermaid flowchart.
    Diagram,
}

impl ExportFormat {
    /// All formats, in display order.
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Text,
        ExportFormat::Csv,
        ExportFormat::Report,
        ExportFormat::Pdf,
        ExportFormat::Json,
        ExportFormat::Diagram,
    ];

    /// Whether the output is binary and must go to a file.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Report => "md",
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Diagram => "mmd",
        }
    }

    /// Guess the format from an output file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "md" | "markdown" => Some(Self::Report),
            "pdf" => Some(Self::Pdf),
            "json" => Some(Self::Json),
            "mmd" | "mermaid" => Some(Self::Diagram),
            _ => None,
        }
    }

    /// Canonical lower-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Csv => "csv",
            Self::Report => "report",
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Diagram => "diagram",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = DocsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "report" | "md" | "markdown" => Ok(Self::Report),
            "pdf" => Ok(Self::Pdf),
            "json" => Ok(Self::Json),
            "diagram" | "mermaid" | "mmd" => Ok(Self::Diagram),
            _ => Err(DocsError::UnknownExportFormat { name: s.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Exporter trait
// ---------------------------------------------------------------------------

/// Renders an ordered list of steps into one output format.
pub trait Exporter: Send + Sync {
    /// The format this exporter produces.
    fn format(&self) -> ExportFormat;

    /// Render `steps` in order as text.
    fn export(&self, steps: &[Step]) -> Result<String>;

    /// Render `steps` in order as file contents.
    fn render(&self, steps: &[Step]) -> Result<Vec<u8>> {
        self.export(steps).map(String::into_bytes)
    }
}

/// Settings shared by [`exporter_for`].
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Report title (Markdown and PDF).
    pub title: String,
    /// Report metadata block; `None` omits it.
    pub metadata: Option<ReportMetadata>,
    /// Pretty-print JSON.
    pub pretty: bool,
    /// Maximum diagram node label width in characters.
    pub diagram_label_width: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Generated Workflow".into(),
            metadata: None,
            pretty: true,
            diagram_label_width: crate::diagram::DEFAULT_LABEL_WIDTH,
        }
    }
}

/// Build the exporter for `format`.
pub fn exporter_for(format: ExportFormat, options: &ExportOptions) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Text => Box::new(TextExporter),
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Report => Box::new(ReportExporter {
            title: options.title.clone(),
            metadata: options.metadata.clone(),
        }),
        ExportFormat::Pdf => Box::new(PdfExporter {
            title: options.title.clone(),
            metadata: options.metadata.clone(),
        }),
        ExportFormat::Json => Box::new(JsonExporter {
            pretty: options.pretty,
        }),
        ExportFormat::Diagram => Box::new(DiagramExporter::new(options.diagram_label_width)),
    }
}

// ---------------------------------------------------------------------------
// Text and JSON
// ---------------------------------------------------------------------------

/// One `Step <n>: <label>` line per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn export(&self, steps: &[Step]) -> Result<String> {
        let mut out = String::new();
        for step in steps {
            out.push_str(&step.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Labels under a `workflow` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    workflow: Vec<&'a str>,
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export(&self, steps: &[Step]) -> Result<String> {
        let doc = JsonDocument {
            workflow: steps.iter().map(|s| s.label.as_str()).collect(),
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };
        Ok(json)
    }
}
