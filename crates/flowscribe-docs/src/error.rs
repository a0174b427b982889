//! Error types for extraction and export.

use std::path::PathBuf;

use crate::export::ExportFormat;

/// Unified error type for the docs crate.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// The document type cannot be turned into text.
    #[error("unsupported document format `{extension}` for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// An export format name was not recognized.
    #[error("unknown export format `{name}` (expected text, csv, report, pdf, json or diagram)")]
    UnknownExportFormat { name: String },

    /// Reading a document failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A PDF could not be parsed or written.
    #[error("pdf error: {reason}")]
    Pdf { reason: String },

    /// A binary format was asked for as text.
    #[error("{format} output is binary; write it to a file")]
    BinaryFormat { format: ExportFormat },

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the docs crate.
pub type Result<T> = std::result::Result<T, DocsError>;
