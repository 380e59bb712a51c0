//! Operator commands.
//!
//! Each command targets one stage, persists once, and advances the pipeline
//! when it satisfies the current stage's completion predicate. The
//! comparison stage is the exception: it only advances through
//! [`StageMachine::complete_reconciliation`] or an explicit advance, so the
//! operator can keep toggling sources until they are done.

use anyhow::Result;
use tracing::info;

use crate::errors::PipelineError;
use crate::models::field::{FieldRecord, FieldValue};
use crate::models::stage::StageId;
use crate::recipients::RecipientDirectory;
use crate::reconcile::Source;
use crate::reminder::{Platform, UnenrollReason};
use crate::store::TimelineStore;

use super::machine::StageMachine;

/// The sales intake form as submitted by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesIntakeForm {
    pub contact_name: String,
    pub contact_email: String,
    pub company_name: String,
    pub platform: Option<Platform>,
    pub notes: Option<String>,
}

/// What a command did to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The payload changed; the current stage stays open.
    Recorded,
    /// The command satisfied the current stage, which completed and handed
    /// over to the next one.
    Advanced { completed: StageId },
}

impl CommandOutcome {
    fn from_advanced(advanced: bool, stage: StageId) -> Self {
        if advanced {
            CommandOutcome::Advanced { completed: stage }
        } else {
            CommandOutcome::Recorded
        }
    }

    pub fn advanced(&self) -> bool {
        matches!(self, CommandOutcome::Advanced { .. })
    }
}

impl<S: TimelineStore> StageMachine<S> {
    pub fn mark_transcript_uploaded(&mut self, file_name: Option<String>) -> Result<CommandOutcome> {
        let stage = StageId::DemoCall;
        self.apply("mark transcript uploaded", |record, now| {
            record.require_current(stage, "mark the transcript uploaded")?;
            let data = record.envelope_mut(stage)?.data.as_demo_call_mut()?;
            data.transcript_uploaded = true;
            data.transcript_file_name = file_name;
            data.uploaded_at = Some(now);
            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    pub fn mark_intake_analyzed(&mut self) -> Result<CommandOutcome> {
        let stage = StageId::DemoCall;
        self.apply("mark intake analyzed", |record, now| {
            record.require_current(stage, "mark the intake analyzed")?;
            let data = record.envelope_mut(stage)?.data.as_demo_call_mut()?;
            if !data.transcript_uploaded {
                return Err(PipelineError::not_ready(
                    stage,
                    "the transcript must be uploaded before the intake is analyzed",
                ));
            }
            data.intake_analyzed = true;
            data.analyzed_at = Some(now);
            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    /// Record the intake form. The platform also decides which reminder
    /// sequence, if any, the follow-up email will schedule.
    pub fn submit_sales_intake(&mut self, form: SalesIntakeForm) -> Result<CommandOutcome> {
        let stage = StageId::SalesIntake;
        self.apply("submit sales intake", |record, now| {
            record.require_current(stage, "submit the sales intake")?;
            for (label, value) in [
                ("contact name", &form.contact_name),
                ("contact email", &form.contact_email),
                ("company name", &form.company_name),
            ] {
                if value.trim().is_empty() {
                    return Err(PipelineError::not_ready(stage, format!("the {label} is required")));
                }
            }

            if let Some(platform) = form.platform {
                record
                    .envelope_mut(StageId::ReminderSequence)?
                    .data
                    .as_reminder_mut()?
                    .set_platform(platform)?;
            }

            let data = record.envelope_mut(stage)?.data.as_sales_intake_mut()?;
            data.contact_name = form.contact_name.trim().to_string();
            data.contact_email = form.contact_email.trim().to_string();
            data.company_name = form.company_name.trim().to_string();
            data.platform = form.platform;
            data.notes = form.notes;
            data.submitted_at = Some(now);

            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    /// Mark the follow-up email sent to the currently active recipients and
    /// schedule the reminder sequence when the platform has one.
    pub fn mark_follow_up_sent(&mut self, directory: &dyn RecipientDirectory) -> Result<CommandOutcome> {
        let stage = StageId::FollowUpEmail;
        let delay = self.policy().enrollment_delay_business_days;
        let recipients = directory.active_recipients();

        self.apply("mark follow-up email sent", |record, now| {
            record.require_current(stage, "mark the follow-up email sent")?;
            if recipients.is_empty() {
                return Err(PipelineError::not_ready(
                    stage,
                    "no active recipients are configured",
                ));
            }

            let reminder = record
                .envelope_mut(StageId::ReminderSequence)?
                .data
                .as_reminder_mut()?;
            if reminder.has_sequence() {
                reminder.schedule(now, delay)?;
            } else {
                info!(
                    deal_id = %record.deal_id,
                    "no reminder sequence for this platform; waiting for access"
                );
            }

            let data = record.envelope_mut(stage)?.data.as_follow_up_email_mut()?;
            data.recipients = recipients;
            data.sent_at = Some(now);

            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    /// Whether the operator should be prompted to enroll the contact now.
    pub fn is_enrollment_due(&self) -> bool {
        self.payload(StageId::ReminderSequence)
            .and_then(|payload| payload.as_reminder())
            .map(|reminder| {
                reminder.is_enrollment_due(self.now(), self.policy().enrollment_delay_business_days)
            })
            .unwrap_or(false)
    }

    pub fn enroll_reminder(&mut self) -> Result<CommandOutcome> {
        let stage = StageId::ReminderSequence;
        let delay = self.policy().enrollment_delay_business_days;
        self.apply("enroll reminder", |record, now| {
            record.require_current(stage, "enroll the contact")?;
            record
                .envelope_mut(stage)?
                .data
                .as_reminder_mut()?
                .enroll(now, delay)?;
            info!(deal_id = %record.deal_id, "contact enrolled in reminder sequence");
            Ok(CommandOutcome::Recorded)
        })
    }

    pub fn unenroll_reminder(&mut self, reason: UnenrollReason) -> Result<CommandOutcome> {
        let stage = StageId::ReminderSequence;
        self.apply("unenroll reminder", |record, now| {
            record.require_current(stage, "unenroll the contact")?;
            record
                .envelope_mut(stage)?
                .data
                .as_reminder_mut()?
                .unenroll(reason, now)?;
            info!(deal_id = %record.deal_id, %reason, "contact unenrolled");
            Ok(CommandOutcome::Recorded)
        })
    }

    /// Ledger access arrived. `platform` defaults to the intake platform.
    pub fn mark_access_received(&mut self, platform: Option<Platform>) -> Result<CommandOutcome> {
        let stage = StageId::ReminderSequence;
        self.apply("mark access received", |record, now| {
            record.require_current(stage, "mark access received")?;
            let reminder = record.envelope_mut(stage)?.data.as_reminder_mut()?;
            let platform = platform.or(reminder.platform).unwrap_or(Platform::Other);
            reminder.mark_access_received(platform, now)?;
            info!(deal_id = %record.deal_id, %platform, "ledger access received");

            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    pub fn approve_internal_review(
        &mut self,
        reviewer: impl Into<String>,
        notes: Option<String>,
    ) -> Result<CommandOutcome> {
        let stage = StageId::InternalReview;
        let reviewer = reviewer.into();
        self.apply("approve internal review", |record, now| {
            record.require_current(stage, "approve the internal review")?;
            if reviewer.trim().is_empty() {
                return Err(PipelineError::not_ready(stage, "a reviewer name is required"));
            }
            let data = record.envelope_mut(stage)?.data.as_internal_review_mut()?;
            data.reviewer = Some(reviewer.trim().to_string());
            data.notes = notes;
            data.approved_at = Some(now);

            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    /// Record the team's GL review. It also becomes the team side of the
    /// reconciliation.
    pub fn submit_gl_review(
        &mut self,
        form: FieldRecord,
        submitted_by: Option<String>,
    ) -> Result<CommandOutcome> {
        let stage = StageId::GlReview;
        self.apply("submit GL review", |record, now| {
            record.require_current(stage, "submit the GL review")?;

            record
                .envelope_mut(StageId::GlReviewComparison)?
                .data
                .as_reconciliation_mut()?
                .set_team_record(form.clone())?;

            let data = record.envelope_mut(stage)?.data.as_gl_review_mut()?;
            data.form = Some(form);
            data.submitted_by = submitted_by;
            data.submitted_at = Some(now);

            let advanced = record.advance_if_ready(stage, now)?;
            Ok(CommandOutcome::from_advanced(advanced, stage))
        })
    }

    /// Attach the AI-generated review. Allowed at any point until the
    /// comparison stage is finished.
    pub fn attach_ai_review(&mut self, review: FieldRecord) -> Result<CommandOutcome> {
        let stage = StageId::GlReviewComparison;
        self.apply("attach AI review", |record, _| {
            let envelope = record.envelope_mut(stage)?;
            if envelope.is_terminal() {
                return Err(PipelineError::invalid_transition(
                    "attach the AI review",
                    format!("stage '{stage}' is already {}", envelope.status),
                ));
            }
            let fields = review.len();
            envelope.data.as_reconciliation_mut()?.set_ai_record(review)?;
            info!(deal_id = %record.deal_id, fields, "AI review attached");
            Ok(CommandOutcome::Recorded)
        })
    }

    pub fn select_source(&mut self, field: &str, source: Source) -> Result<CommandOutcome> {
        let stage = StageId::GlReviewComparison;
        self.apply(&format!("select {source} for {field}"), |record, _| {
            record.require_current(stage, "select a field source")?;
            record
                .envelope_mut(stage)?
                .data
                .as_reconciliation_mut()?
                .select_source(field, source)?;
            Ok(CommandOutcome::Recorded)
        })
    }

    pub fn set_custom_value(&mut self, field: &str, value: FieldValue) -> Result<CommandOutcome> {
        let stage = StageId::GlReviewComparison;
        self.apply(&format!("set custom value for {field}"), |record, _| {
            record.require_current(stage, "set a custom value")?;
            record
                .envelope_mut(stage)?
                .data
                .as_reconciliation_mut()?
                .set_custom_value(field, value)?;
            Ok(CommandOutcome::Recorded)
        })
    }

    /// Freeze the merged record and complete the comparison stage.
    pub fn complete_reconciliation(&mut self) -> Result<CommandOutcome> {
        let stage = StageId::GlReviewComparison;
        self.apply("complete reconciliation", |record, now| {
            record.require_current(stage, "complete the reconciliation")?;
            record
                .envelope_mut(stage)?
                .data
                .as_reconciliation_mut()?
                .complete(now)?;
            record.advance_stage(stage, now)?;
            Ok(CommandOutcome::Advanced { completed: stage })
        })
    }
}
