//! Classification output: numbered steps and placeholders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message returned for empty or whitespace-only input.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a workflow description";

/// Message returned when the input contains no sentences at all.
pub const NO_STEPS_MESSAGE: &str = "No workflow steps detected";

/// Maximum length, in characters, of a fallback label echoed from input.
pub const FALLBACK_LABEL_MAX_CHARS: usize = 80;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// How a step came to be in a [`WorkflowResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A canonical label produced by a rule.
    Matched,
    /// Nothing matched; the label echoes the first sentence.
    Fallback,
    /// The input was empty or whitespace-only.
    EmptyInput,
    /// The input contained no sentences.
    NoSteps,
}

/// One numbered workflow step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in the workflow.
    pub number: usize,
    /// Human-readable label, e.g. "Process customer order".
    pub label: String,
    /// Whether this is a genuine step or a placeholder.
    pub kind: StepKind,
}

impl Step {
    /// Create a matched step.
    pub fn matched(number: usize, label: impl Into<String>) -> Self {
        Self {
            number,
            label: label.into(),
            kind: StepKind::Matched,
        }
    }

    /// Returns `true` for anything other than a rule match.
    pub fn is_placeholder(&self) -> bool {
        self.kind != StepKind::Matched
    }
}

impl fmt::Display for Step {
    /// Renders `Step <n>: <label>`; message placeholders render as the bare
    /// message.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            StepKind::Matched | StepKind::Fallback => {
                write!(f, "Step {}: {}", self.number, self.label)
            }
            StepKind::EmptyInput | StepKind::NoSteps => f.write_str(&self.label),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowResult
// ---------------------------------------------------------------------------

/// The ordered steps produced by one classification call.
///
/// Never empty: when nothing matched it holds exactly one placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    steps: Vec<Step>,
}

impl WorkflowResult {
    /// Number deduplicated labels in order.
    pub(crate) fn from_labels(labels: Vec<String>) -> Self {
        let steps = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Step::matched(i + 1, label))
            .collect();
        Self { steps }
    }

    pub(crate) fn placeholder(kind: StepKind, label: impl Into<String>) -> Self {
        Self {
            steps: vec![Step {
                number: 1,
                label: label.into(),
                kind,
            }],
        }
    }

    pub(crate) fn empty_input() -> Self {
        Self::placeholder(StepKind::EmptyInput, EMPTY_INPUT_MESSAGE)
    }

    pub(crate) fn no_steps() -> Self {
        Self::placeholder(StepKind::NoSteps, NO_STEPS_MESSAGE)
    }

    /// Build a one-step workflow from the first sentence of unmatched input.
    pub(crate) fn fallback(sentence: &str) -> Self {
        Self::placeholder(StepKind::Fallback, fallback_label(sentence))
    }

    /// All steps, in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Labels only, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.label.as_str()).collect()
    }

    /// Number of entries, placeholders included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns `true` when the result is a single placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.steps.as_slice(), [only] if only.is_placeholder())
    }

    /// Iterate over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Consume the result, returning the steps.
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a WorkflowResult {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Capitalize the first letter and cap the length.
fn fallback_label(sentence: &str) -> String {
    let mut chars = sentence.chars();
    let mut label: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    if label.chars().count() > FALLBACK_LABEL_MAX_CHARS {
        label = label.chars().take(FALLBACK_LABEL_MAX_CHARS - 3).collect();
        label.truncate(label.trim_end().len());
        label.push_str("...");
    }
    label
}
