//! Error taxonomy for pipeline commands.
//!
//! These are local validation failures. Persistence and CLI code wraps them in
//! `anyhow::Error`; callers that need to branch on the kind can use
//! `err.downcast_ref::<PipelineError>()`.

use thiserror::Error;

use crate::models::stage::StageId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The command is illegal in the current state. This is a caller bug.
    #[error("Cannot {action} now: {reason}")]
    InvalidTransition { action: String, reason: String },

    /// A business-rule gate is not yet satisfied.
    #[error("Stage '{stage}' is not ready: {reason}")]
    StageNotReady { stage: StageId, reason: String },

    /// Reconciliation cannot complete while differing fields have no source.
    #[error("{} field(s) still differ without a selected source: {}", .fields.len(), .fields.join(", "))]
    UnresolvedFields { fields: Vec<String> },

    #[error("Unknown field '{0}': it is not present in either review")]
    UnknownField(String),

    #[error("Stage '{stage}' holds a '{found}' payload")]
    PayloadMismatch { stage: StageId, found: StageId },

    #[error("Timeline for deal '{deal_id}' is inconsistent: {reason}")]
    CorruptTimeline { deal_id: String, reason: String },
}

impl PipelineError {
    pub fn invalid_transition(action: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::InvalidTransition {
            action: action.into(),
            reason: reason.into(),
        }
    }

    pub fn not_ready(stage: StageId, reason: impl Into<String>) -> Self {
        PipelineError::StageNotReady {
            stage,
            reason: reason.into(),
        }
    }

    /// Whether the operator can fix this by completing a missing prerequisite.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::StageNotReady { .. } | PipelineError::UnresolvedFields { .. }
        )
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
