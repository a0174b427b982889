//! Caller-owned workflow drafts.
//!
//! The classifier is stateless; whatever the application treats as "the
//! current workflow" lives in a [`WorkflowDraft`] value that the caller owns
//! and threads through edit, reorder, and approve operations.  Step numbers
//! are never stored: they are derived from order every time [`steps`] is
//! called.
//!
//! [`steps`]: WorkflowDraft::steps

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::result::{Step, StepKind, WorkflowResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Review status of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// Editable.
    Draft,
    /// Signed off; mutations are rejected until reopened.
    Approved,
}

/// An editable, ordered list of step labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDraft {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable title.
    pub title: String,
    /// When the draft was created.
    pub created_at: DateTime<Utc>,
    /// Current review status.
    pub status: DraftStatus,
    labels: Vec<String>,
}

impl WorkflowDraft {
    /// Create an empty draft.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            created_at: Utc::now(),
            status: DraftStatus::Draft,
            labels: Vec::new(),
        }
    }

    /// Start a draft from a classification result.
    ///
    /// Matched and fallback steps are kept; message placeholders (empty
    /// input, no steps) produce an empty draft.
    pub fn from_result(title: impl Into<String>, result: &WorkflowResult) -> Self {
        let mut draft = Self::new(title);
        draft.labels = result
            .iter()
            .filter(|s| matches!(s.kind, StepKind::Matched | StepKind::Fallback))
            .map(|s| s.label.clone())
            .collect();
        debug!(id = %draft.id, steps = draft.labels.len(), "draft created from result");
        draft
    }

    /// Steps numbered from the current order.
    pub fn steps(&self) -> Vec<Step> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| Step::matched(i + 1, label.clone()))
            .collect()
    }

    /// Labels in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_approved(&self) -> bool {
        self.status == DraftStatus::Approved
    }

    // -- Mutations -----------------------------------------------------------

    /// Replace the label of step `number`.
    pub fn edit(&mut self, number: usize, label: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        let index = self.index_of(number)?;
        let label = normalize_label(label)?;
        if self.labels[index] != label {
            self.ensure_unique(&label)?;
        }
        debug!(number, label = %label, "step edited");
        self.labels[index] = label;
        Ok(())
    }

    /// Insert a step so that it becomes step `number`.
    ///
    /// `number` may be one past the end to append.
    pub fn insert(&mut self, number: usize, label: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        if number == 0 || number > self.labels.len() + 1 {
            return Err(CoreError::StepOutOfRange {
                number,
                len: self.labels.len(),
            });
        }
        let label = normalize_label(label)?;
        self.ensure_unique(&label)?;
        debug!(number, label = %label, "step inserted");
        self.labels.insert(number - 1, label);
        Ok(())
    }

    /// Append a step at the end.
    pub fn push(&mut self, label: impl Into<String>) -> Result<()> {
        self.insert(self.labels.len() + 1, label)
    }

    /// Remove step `number`, returning its label.
    pub fn remove(&mut self, number: usize) -> Result<String> {
        self.ensure_editable()?;
        let index = self.index_of(number)?;
        let label = self.labels.remove(index);
        debug!(number, label = %label, "step removed");
        Ok(label)
    }

    /// Move step `from` so that it becomes step `to`.
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_editable()?;
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        let label = self.labels.remove(from_index);
        self.labels.insert(to_index, label);
        debug!(from, to, "step moved");
        Ok(())
    }

    // -- Status --------------------------------------------------------------

    /// Sign off the draft.
    pub fn approve(&mut self) -> Result<()> {
        if self.status != DraftStatus::Draft {
            return Err(CoreError::InvalidDraftState {
                reason: format!("cannot approve workflow in {:?} state", self.status),
            });
        }
        if self.labels.is_empty() {
            return Err(CoreError::InvalidDraftState {
                reason: "cannot approve a workflow with no steps".into(),
            });
        }
        self.status = DraftStatus::Approved;
        info!(id = %self.id, steps = self.labels.len(), "workflow approved");
        Ok(())
    }

    /// Return an approved draft to editable state.
    pub fn reopen(&mut self) -> Result<()> {
        if self.status != DraftStatus::Approved {
            return Err(CoreError::InvalidDraftState {
                reason: format!("cannot reopen workflow in {:?} state", self.status),
            });
        }
        self.status = DraftStatus::Draft;
        info!(id = %self.id, "workflow reopened");
        Ok(())
    }

    // -- Private helpers -----------------------------------------------------

    fn ensure_editable(&self) -> Result<()> {
        if self.is_approved() {
            return Err(CoreError::InvalidDraftState {
                reason: "workflow is approved; reopen it before editing".into(),
            });
        }
        Ok(())
    }

    fn index_of(&self, number: usize) -> Result<usize> {
        if number == 0 || number > self.labels.len() {
            return Err(CoreError::StepOutOfRange {
                number,
                len: self.labels.len(),
            });
        }
        Ok(number - 1)
    }

    fn ensure_unique(&self, label: &str) -> Result<()> {
        if self.labels.iter().any(|l| l == label) {
            return Err(CoreError::DuplicateLabel {
                label: label.to_string(),
            });
        }
        Ok(())
    }
}

fn normalize_label(label: impl Into<String>) -> Result<String> {
    let label = label.into();
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn sample() -> WorkflowDraft {
        let result = classify("Customer places order. Pay the invoice. Email the receipt.");
        WorkflowDraft::from_result("Order flow", &result)
    }

    fn labels(draft: &WorkflowDraft) -> Vec<&str> {
        draft.labels().iter().map(String::as_str).collect()
    }

    #[test]
    fn from_result_keeps_matched_steps() {
        let draft = sample();
        assert_eq!(
            labels(&draft),
            vec![
                "Process customer order",
                "Process payment transaction",
                "Generate invoice",
                "Send notification"
            ]
        );
        assert_eq!(draft.status, DraftStatus::Draft);
    }

    #[test]
    fn from_placeholder_is_empty() {
        let draft = WorkflowDraft::from_result("empty", &classify(""));
        assert!(draft.is_empty());

        let draft = WorkflowDraft::from_result("fallback", &classify("the sky is blue"));
        assert_eq!(labels(&draft), vec!["The sky is blue"]);
    }

    #[test]
    fn move_renumbers() {
        let mut draft = sample();
        draft.move_step(4, 1).unwrap();
        let steps = draft.steps();
        assert_eq!(steps[0].number, 1);
        assert_eq!(steps[0].label, "Send notification");
        assert_eq!(steps[3].label, "Generate invoice");
        assert_eq!(steps[3].number, 4);
    }

    #[test]
    fn edit_insert_remove() {
        let mut draft = sample();
        draft.edit(4, "  Email receipt to customer ").unwrap();
        draft.insert(1, "Receive order request").unwrap();
        let removed = draft.remove(4).unwrap();
        assert_eq!(removed, "Generate invoice");
        draft.push("Close ticket").unwrap();
        assert_eq!(
            labels(&draft),
            vec![
                "Receive order request",
                "Process customer order",
                "Process payment transaction",
                "Email receipt to customer",
                "Close ticket"
            ]
        );
    }

    #[test]
    fn edit_to_same_label_is_allowed() {
        let mut draft = sample();
        draft.edit(1, "Process customer order").unwrap();
    }

    #[test]
    fn out_of_range_positions() {
        let mut draft = sample();
        assert!(matches!(
            draft.edit(0, "x"),
            Err(CoreError::StepOutOfRange { number: 0, len: 4 })
        ));
        assert!(draft.remove(5).is_err());
        assert!(draft.move_step(1, 9).is_err());
        assert!(draft.insert(6, "x").is_err());
        draft.insert(5, "Archive order").unwrap();
    }

    #[test]
    fn empty_and_duplicate_labels_rejected() {
        let mut draft = sample();
        assert!(matches!(draft.push("   "), Err(CoreError::EmptyLabel)));
        assert!(matches!(
            draft.edit(2, "Generate invoice"),
            Err(CoreError::DuplicateLabel { .. })
        ));
    }

    #[test]
    fn approved_draft_is_read_only() {
        let mut draft = sample();
        draft.approve().unwrap();
        assert!(draft.is_approved());
        assert!(matches!(
            draft.push("Late step"),
            Err(CoreError::InvalidDraftState { .. })
        ));
        assert!(draft.approve().is_err());

        draft.reopen().unwrap();
        draft.push("Late step").unwrap();
        assert!(draft.reopen().is_err());
    }

    #[test]
    fn empty_draft_cannot_be_approved() {
        let mut draft = WorkflowDraft::new("empty");
        assert!(draft.approve().is_err());
    }

    #[test]
    fn serializes_labels_and_status() {
        let mut draft = sample();
        draft.approve().unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["status"], "approved");
        assert_eq!(json["labels"][0], "Process customer order");
    }
}
