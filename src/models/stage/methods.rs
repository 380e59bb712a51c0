use chrono::{DateTime, Utc};

use crate::errors::PipelineResult;
use crate::models::payload::StagePayload;

use super::types::{StageEnvelope, StageId, StageStatus};

impl StageEnvelope {
    /// A pending envelope holding the empty payload for `stage`.
    pub fn pending(stage: StageId) -> Self {
        Self {
            status: StageStatus::Pending,
            completed_at: None,
            data: StagePayload::empty_for(stage),
        }
    }

    /// Attempt to transition the envelope to a new status with validation.
    ///
    /// This is the primary method for changing stage status. It validates
    /// that the transition is allowed before applying it.
    pub fn try_transition(&mut self, new_status: StageStatus) -> PipelineResult<()> {
        self.status = self.status.try_transition(new_status)?;
        Ok(())
    }

    /// Make this the working stage.
    pub fn try_start(&mut self) -> PipelineResult<()> {
        self.try_transition(StageStatus::InProgress)
    }

    /// Complete the stage and stamp `completed_at`.
    pub fn try_complete(&mut self, now: DateTime<Utc>) -> PipelineResult<()> {
        self.try_transition(StageStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Skip the stage. `completed_at` stays empty: nothing was completed.
    pub fn try_skip(&mut self) -> PipelineResult<()> {
        self.try_transition(StageStatus::Skipped)
    }

    pub fn try_mark_action_required(&mut self) -> PipelineResult<()> {
        self.try_transition(StageStatus::ActionRequired)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
