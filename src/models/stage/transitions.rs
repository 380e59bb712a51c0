use crate::errors::{PipelineError, PipelineResult};

use super::types::StageStatus;

impl StageStatus {
    /// Check if transitioning from the current status to the new status is valid.
    ///
    /// Valid transitions:
    /// - `Pending` -> `InProgress` | `Skipped`
    /// - `InProgress` -> `ActionRequired` | `Completed` | `Skipped`
    /// - `ActionRequired` -> `InProgress` | `Completed` | `Skipped`
    /// - `Completed` is a terminal state
    /// - `Skipped` is a terminal state
    pub fn can_transition_to(&self, new_status: &StageStatus) -> bool {
        // Same status is always valid (no-op)
        if self == new_status {
            return true;
        }

        match self {
            StageStatus::Pending => {
                matches!(new_status, StageStatus::InProgress | StageStatus::Skipped)
            }
            StageStatus::InProgress => matches!(
                new_status,
                StageStatus::ActionRequired | StageStatus::Completed | StageStatus::Skipped
            ),
            StageStatus::ActionRequired => matches!(
                new_status,
                StageStatus::InProgress | StageStatus::Completed | StageStatus::Skipped
            ),
            StageStatus::Completed => false, // Terminal state
            StageStatus::Skipped => false,   // Terminal state
        }
    }

    /// Attempt to transition to a new status, returning an error if invalid.
    pub fn try_transition(&self, new_status: StageStatus) -> PipelineResult<StageStatus> {
        if self.can_transition_to(&new_status) {
            Ok(new_status)
        } else {
            Err(PipelineError::invalid_transition(
                format!("move stage to {new_status}"),
                format!("invalid stage status transition {self} -> {new_status}"),
            ))
        }
    }

    /// Returns the list of valid statuses this status can transition to.
    pub fn valid_transitions(&self) -> Vec<StageStatus> {
        match self {
            StageStatus::Pending => vec![StageStatus::InProgress, StageStatus::Skipped],
            StageStatus::InProgress => vec![
                StageStatus::ActionRequired,
                StageStatus::Completed,
                StageStatus::Skipped,
            ],
            StageStatus::ActionRequired => vec![
                StageStatus::InProgress,
                StageStatus::Completed,
                StageStatus::Skipped,
            ],
            StageStatus::Completed => vec![], // Terminal state
            StageStatus::Skipped => vec![],   // Terminal state
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Skipped)
    }

    /// `InProgress` or `ActionRequired`: the status the current stage holds.
    pub fn is_active(&self) -> bool {
        matches!(self, StageStatus::InProgress | StageStatus::ActionRequired)
    }
}
