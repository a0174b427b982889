//! Flowscribe core: free-text process descriptions in, numbered workflow
//! steps out.
//!
//! This crate provides:
//!
//! - **Rule tables**: ordered, data-driven keyword → label rules grouped
//!   into gated domains, via [`rules::RuleSet`].
//! - **Classification**: a pure, stateless sentence classifier via
//!   [`classifier::StepClassifier`] and the [`classify`] shortcut.
//! - **Drafts**: a caller-owned, editable workflow value via
//!   [`workflow::WorkflowDraft`].

pub mod classifier;
pub mod error;
pub mod result;
pub mod rules;
pub mod sentence;
pub mod workflow;

pub use classifier::{StepClassifier, classify};
pub use error::{CoreError, Result};
pub use result::{EMPTY_INPUT_MESSAGE, NO_STEPS_MESSAGE, Step, StepKind, WorkflowResult};
pub use rules::{Domain, Rule, RuleSet};
pub use workflow::{DraftStatus, WorkflowDraft};
