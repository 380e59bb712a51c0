//! Stage progression over a [`TimelineRecord`].
//!
//! These functions mutate the record in memory only; the machine persists the
//! result. Every failure leaves the record untouched because the machine works
//! on a draft copy.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::{PipelineError, PipelineResult};
use crate::models::payload::StagePayload;
use crate::models::stage::{StageId, StageStatus};
use crate::models::timeline::TimelineRecord;

impl TimelineRecord {
    /// Why `stage` cannot complete yet, or `None` when its completion
    /// predicate holds.
    pub fn completion_blocker(&self, stage: StageId) -> PipelineResult<Option<String>> {
        let blocker = match &self.envelope(stage)?.data {
            StagePayload::DemoCall(data) => {
                if !data.transcript_uploaded {
                    Some("the demo call transcript has not been uploaded")
                } else if !data.intake_analyzed {
                    Some("the intake analysis has not been run")
                } else {
                    None
                }
            }
            StagePayload::SalesIntake(data) => {
                (!data.is_submitted()).then_some("the sales intake form has not been submitted")
            }
            StagePayload::FollowUpEmail(data) => {
                (!data.is_sent()).then_some("the follow-up email has not been sent")
            }
            StagePayload::ReminderSequence(state) => {
                (!state.is_access_received()).then_some("ledger access has not been received")
            }
            StagePayload::InternalReview(data) => {
                (!data.is_approved()).then_some("the internal review has not been approved")
            }
            StagePayload::GlReview(data) => {
                (!data.is_submitted()).then_some("the team GL review has not been submitted")
            }
            StagePayload::GlReviewComparison(state) => {
                if !state.has_team_record() {
                    Some("the team GL review has not been submitted")
                } else if !state.all_resolved() {
                    return Ok(Some(format!(
                        "{} differing field(s) have no selected source: {}",
                        state.unresolved_fields().len(),
                        state.unresolved_fields().join(", ")
                    )));
                } else {
                    None
                }
            }
        };
        Ok(blocker.map(str::to_string))
    }

    /// Fail unless `stage` is the current, still-open stage.
    pub(crate) fn require_current(&self, stage: StageId, action: &str) -> PipelineResult<()> {
        if stage != self.current_stage {
            return Err(PipelineError::invalid_transition(
                action,
                format!(
                    "stage '{stage}' is not the current stage ('{}')",
                    self.current_stage
                ),
            ));
        }

        let status = self.envelope(stage)?.status;
        if status.is_terminal() {
            return Err(PipelineError::invalid_transition(
                action,
                format!("stage '{stage}' is already {status}"),
            ));
        }
        Ok(())
    }

    /// Complete the current stage and move to the next one.
    ///
    /// Advancing the comparison stage completes its reconciliation first if
    /// that has not happened yet.
    pub(crate) fn advance_stage(&mut self, stage: StageId, now: DateTime<Utc>) -> PipelineResult<()> {
        self.require_current(stage, &format!("advance stage '{stage}'"))?;

        if let Some(reason) = self.completion_blocker(stage)? {
            return Err(PipelineError::not_ready(stage, reason));
        }

        if stage == StageId::GlReviewComparison {
            let state = self.envelope_mut(stage)?.data.as_reconciliation_mut()?;
            if !state.is_completed() {
                state.complete(now)?;
            }
        }

        self.envelope_mut(stage)?.try_complete(now)?;
        info!(deal_id = %self.deal_id, %stage, "stage completed");
        self.move_past(stage)
    }

    /// Mark the current stage skipped and move on without checking its
    /// completion predicate.
    pub(crate) fn skip_stage(&mut self, stage: StageId) -> PipelineResult<()> {
        self.require_current(stage, &format!("skip stage '{stage}'"))?;

        self.envelope_mut(stage)?.try_skip()?;
        info!(deal_id = %self.deal_id, %stage, "stage skipped");
        self.move_past(stage)
    }

    pub(crate) fn set_stage_status(
        &mut self,
        stage: StageId,
        status: StageStatus,
        now: DateTime<Utc>,
    ) -> PipelineResult<()> {
        match status {
            StageStatus::Completed => self.advance_stage(stage, now),
            StageStatus::Skipped => self.skip_stage(stage),
            StageStatus::InProgress | StageStatus::ActionRequired => {
                self.require_current(stage, &format!("mark stage '{stage}' {status}"))?;
                self.envelope_mut(stage)?.try_transition(status)?;
                info!(deal_id = %self.deal_id, %stage, %status, "stage status set");
                Ok(())
            }
            StageStatus::Pending => Err(PipelineError::invalid_transition(
                format!("mark stage '{stage}' pending"),
                "stages never move back to pending",
            )),
        }
    }

    /// Advance `stage` if it is current and its predicate holds. Returns
    /// whether it advanced.
    pub(crate) fn advance_if_ready(&mut self, stage: StageId, now: DateTime<Utc>) -> PipelineResult<bool> {
        if stage != self.current_stage || self.envelope(stage)?.is_terminal() {
            return Ok(false);
        }
        if self.completion_blocker(stage)?.is_some() {
            return Ok(false);
        }
        self.advance_stage(stage, now)?;
        Ok(true)
    }

    fn move_past(&mut self, stage: StageId) -> PipelineResult<()> {
        match stage.next() {
            Some(next) => {
                self.envelope_mut(next)?.try_start()?;
                self.current_stage = next;
                info!(deal_id = %self.deal_id, stage = %next, "stage started");
            }
            None => info!(deal_id = %self.deal_id, "pipeline finished"),
        }
        Ok(())
    }
}
