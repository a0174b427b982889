//! Core error types.
//!
//! Classification itself never fails: empty input and unmatched text are
//! reported as placeholder steps.  [`CoreError`] covers the fallible edges
//! around it: loading and validating rule tables, and editing drafts.

use std::path::PathBuf;

/// Unified error type for the Flowscribe core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    // -- Rule table errors ---------------------------------------------------
    /// The rule table is structurally invalid.
    #[error("invalid rule set: {reason}")]
    InvalidRules { reason: String },

    /// A domain filter referenced a domain the rule table does not define.
    #[error("unknown domain: {name}")]
    UnknownDomain { name: String },

    /// A rule file could not be read.
    #[error("failed to read rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -- Draft errors --------------------------------------------------------
    /// A 1-based step position is outside the draft.
    #[error("step {number} is out of range (workflow has {len} steps)")]
    StepOutOfRange { number: usize, len: usize },

    /// A step label was empty after trimming.
    #[error("step label must not be empty")]
    EmptyLabel,

    /// The label is already present in the draft.
    #[error("step `{label}` is already in the workflow")]
    DuplicateLabel { label: String },

    /// The draft is in the wrong status for the requested operation.
    #[error("invalid workflow state: {reason}")]
    InvalidDraftState { reason: String },

    // -- Serialization -------------------------------------------------------
    /// TOML deserialization failed.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
