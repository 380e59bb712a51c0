use chrono::{DateTime, Utc};
use tracing::debug;

use crate::calendar::{add_business_days, elapsed_business_days, local_date};
use crate::errors::{PipelineError, PipelineResult};
use crate::models::stage::StageId;

use super::types::{
    EnrollmentSource, Platform, ReminderState, ReminderStatus, UnenrollReason,
};

impl ReminderStatus {
    /// Check if moving from the current status to `new_status` is legal.
    ///
    /// Unlike stage statuses there is no same-status no-op: enrolling an
    /// enrolled contact is a caller bug.
    pub fn can_transition_to(&self, new_status: &ReminderStatus) -> bool {
        match self {
            ReminderStatus::NotEnrolled => matches!(
                new_status,
                ReminderStatus::Scheduled | ReminderStatus::AccessReceived
            ),
            ReminderStatus::Scheduled => matches!(
                new_status,
                ReminderStatus::Enrolled | ReminderStatus::AccessReceived
            ),
            ReminderStatus::Enrolled => matches!(
                new_status,
                ReminderStatus::UnenrolledResponse
                    | ReminderStatus::UnenrolledAccess
                    | ReminderStatus::AccessReceived
            ),
            ReminderStatus::UnenrolledResponse | ReminderStatus::UnenrolledAccess => {
                matches!(new_status, ReminderStatus::AccessReceived)
            }
            ReminderStatus::AccessReceived => false, // Terminal state
        }
    }

    fn try_transition(&self, new_status: ReminderStatus, action: &str) -> PipelineResult<()> {
        if self.can_transition_to(&new_status) {
            Ok(())
        } else {
            Err(PipelineError::invalid_transition(
                action,
                format!("reminder is {self}"),
            ))
        }
    }
}

impl ReminderState {
    /// Record the platform access is requested for. Only legal before the
    /// sequence has been scheduled.
    pub fn set_platform(&mut self, platform: Platform) -> PipelineResult<()> {
        if self.status != ReminderStatus::NotEnrolled {
            return Err(PipelineError::invalid_transition(
                "change the reminder platform",
                format!("reminder is {}", self.status),
            ));
        }
        self.platform = Some(platform);
        self.sequence_type = platform.sequence_type();
        Ok(())
    }

    /// Whether a reminder sequence exists for the recorded platform.
    pub fn has_sequence(&self) -> bool {
        self.sequence_type.is_some()
    }

    /// `not_enrolled -> scheduled`, triggered by the follow-up email.
    ///
    /// The enrollment date is `delay_business_days` business days after
    /// `sent_at`.
    pub fn schedule(&mut self, sent_at: DateTime<Utc>, delay_business_days: u32) -> PipelineResult<()> {
        const ACTION: &str = "schedule the reminder sequence";

        self.status.try_transition(ReminderStatus::Scheduled, ACTION)?;
        match self.platform {
            None => {
                return Err(PipelineError::invalid_transition(
                    ACTION,
                    "no platform has been recorded for this deal",
                ))
            }
            Some(platform) if platform.sequence_type().is_none() => {
                return Err(PipelineError::invalid_transition(
                    ACTION,
                    format!("platform '{platform}' has no automated reminder sequence"),
                ))
            }
            Some(_) => {}
        }

        self.status = ReminderStatus::Scheduled;
        self.email_sent_at = Some(sent_at);
        self.scheduled_enrollment_at = Some(add_business_days(sent_at, delay_business_days));
        debug!(scheduled_for = ?self.scheduled_enrollment_at, "reminder scheduled");
        Ok(())
    }

    /// Business days elapsed since the follow-up email, or 0 if unsent.
    pub fn business_days_since_email(&self, now: DateTime<Utc>) -> u32 {
        self.email_sent_at
            .map(|sent_at| elapsed_business_days(sent_at, now))
            .unwrap_or(0)
    }

    /// The prompt predicate: the sequence is scheduled and at least
    /// `delay_business_days` business days have elapsed since the email.
    pub fn is_enrollment_due(&self, now: DateTime<Utc>, delay_business_days: u32) -> bool {
        self.status == ReminderStatus::Scheduled
            && self.email_sent_at.is_some()
            && self.business_days_since_email(now) >= delay_business_days
    }

    /// `scheduled -> enrolled`, operator-confirmed.
    pub fn enroll(&mut self, now: DateTime<Utc>, delay_business_days: u32) -> PipelineResult<()> {
        self.status
            .try_transition(ReminderStatus::Enrolled, "enroll the contact")?;

        if !self.is_enrollment_due(now, delay_business_days) {
            let opens = self
                .scheduled_enrollment_at
                .map(|at| local_date(at).to_string())
                .unwrap_or_else(|| "an unknown date".to_string());
            return Err(PipelineError::not_ready(
                StageId::ReminderSequence,
                format!(
                    "{} of {delay_business_days} business days have elapsed since the follow-up email (enrollment opens {opens})",
                    self.business_days_since_email(now)
                ),
            ));
        }

        self.status = ReminderStatus::Enrolled;
        self.enrolled_at = Some(now);
        self.enrolled_by = Some(EnrollmentSource::Manual);
        Ok(())
    }

    /// `enrolled -> unenrolled_response | unenrolled_access`.
    pub fn unenroll(&mut self, reason: UnenrollReason, now: DateTime<Utc>) -> PipelineResult<()> {
        let target = reason.status();
        self.status.try_transition(target, "unenroll the contact")?;

        self.status = target;
        self.unenrolled_at = Some(now);
        self.unenrollment_reason = Some(reason);
        if reason == UnenrollReason::ContactResponded {
            self.contact_responded_at = Some(now);
        }
        Ok(())
    }

    /// Any non-terminal status `-> access_received`. Terminal.
    pub fn mark_access_received(&mut self, platform: Platform, now: DateTime<Utc>) -> PipelineResult<()> {
        self.status
            .try_transition(ReminderStatus::AccessReceived, "mark access received")?;

        self.status = ReminderStatus::AccessReceived;
        self.access_received_at = Some(now);
        self.access_platform = Some(platform);
        Ok(())
    }

    pub fn is_access_received(&self) -> bool {
        self.status == ReminderStatus::AccessReceived
    }
}
