//! Collaborators around the Flowscribe classifier.
//!
//! - **[`extract`]** -- turns uploaded documents into plain text.
//! - **[`export`]** -- the [`Exporter`] trait, [`ExportFormat`], and the
//!   text/JSON exporters.
//! - **[`csv`]**, **[`report`]**, **[`diagram`]** -- tabular, Markdown
//!   report, and Mermaid flowchart exporters.
//! - **[`pdf`]** -- PDF text extraction and the PDF report exporter.
//!
//! Nothing here feeds back into classification: exporters only project the
//! ordered steps they are given.

pub mod csv;
pub mod diagram;
pub mod error;
pub mod export;
pub mod extract;
pub mod pdf;
pub mod report;

pub use csv::CsvExporter;
pub use diagram::DiagramExporter;
pub use error::{DocsError, Result};
pub use export::{ExportFormat, ExportOptions, Exporter, JsonExporter, TextExporter, exporter_for};
pub use extract::{extract_from_bytes, extract_text, truncate_input};
pub use pdf::{PdfExporter, extract_pdf_text};
pub use report::{ReportExporter, ReportMetadata};
