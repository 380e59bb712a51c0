//! Per-stage payloads.
//!
//! [`StagePayload`] is a closed union with exactly one variant per
//! [`StageId`]. Persisted as an internally tagged map (`kind: demo-call`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, PipelineResult};
use crate::models::field::FieldRecord;
use crate::models::stage::StageId;
use crate::recipients::Recipient;
use crate::reconcile::ReconciliationState;
use crate::reminder::{Platform, ReminderState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoCallData {
    #[serde(default)]
    pub transcript_uploaded: bool,
    #[serde(default)]
    pub transcript_file_name: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub intake_analyzed: bool,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Intake form captured after the demo call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesIntakeData {
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl SalesIntakeData {
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpEmailData {
    /// Snapshot of the active team at send time.
    #[serde(default)]
    pub recipients: Vec<Recipient>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

impl FollowUpEmailData {
    pub fn is_sent(&self) -> bool {
        self.sent_at.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalReviewData {
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl InternalReviewData {
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

/// The human-submitted GL review form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlReviewData {
    #[serde(default)]
    pub form: Option<FieldRecord>,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl GlReviewData {
    pub fn is_submitted(&self) -> bool {
        self.form.is_some() && self.submitted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StagePayload {
    DemoCall(DemoCallData),
    SalesIntake(SalesIntakeData),
    FollowUpEmail(FollowUpEmailData),
    ReminderSequence(ReminderState),
    InternalReview(InternalReviewData),
    GlReview(GlReviewData),
    GlReviewComparison(ReconciliationState),
}

/// Generates the `as_*` / `as_*_mut` accessor pair for one variant.
macro_rules! payload_accessors {
    ($variant:ident, $ty:ty, $get:ident, $get_mut:ident) => {
        pub fn $get(&self) -> PipelineResult<&$ty> {
            match self {
                StagePayload::$variant(data) => Ok(data),
                other => Err(other.mismatch(StageId::$variant)),
            }
        }

        pub fn $get_mut(&mut self) -> PipelineResult<&mut $ty> {
            match self {
                StagePayload::$variant(data) => Ok(data),
                other => Err(other.mismatch(StageId::$variant)),
            }
        }
    };
}

impl StagePayload {
    /// The stage this payload variant belongs to.
    pub fn stage(&self) -> StageId {
        match self {
            StagePayload::DemoCall(_) => StageId::DemoCall,
            StagePayload::SalesIntake(_) => StageId::SalesIntake,
            StagePayload::FollowUpEmail(_) => StageId::FollowUpEmail,
            StagePayload::ReminderSequence(_) => StageId::ReminderSequence,
            StagePayload::InternalReview(_) => StageId::InternalReview,
            StagePayload::GlReview(_) => StageId::GlReview,
            StagePayload::GlReviewComparison(_) => StageId::GlReviewComparison,
        }
    }

    /// Fresh payload for a stage that has not been touched yet.
    pub fn empty_for(stage: StageId) -> Self {
        match stage {
            StageId::DemoCall => StagePayload::DemoCall(DemoCallData::default()),
            StageId::SalesIntake => StagePayload::SalesIntake(SalesIntakeData::default()),
            StageId::FollowUpEmail => StagePayload::FollowUpEmail(FollowUpEmailData::default()),
            StageId::ReminderSequence => StagePayload::ReminderSequence(ReminderState::default()),
            StageId::InternalReview => StagePayload::InternalReview(InternalReviewData::default()),
            StageId::GlReview => StagePayload::GlReview(GlReviewData::default()),
            StageId::GlReviewComparison => {
                StagePayload::GlReviewComparison(ReconciliationState::default())
            }
        }
    }

    fn mismatch(&self, expected: StageId) -> PipelineError {
        PipelineError::PayloadMismatch {
            stage: expected,
            found: self.stage(),
        }
    }

    payload_accessors!(DemoCall, DemoCallData, as_demo_call, as_demo_call_mut);
    payload_accessors!(SalesIntake, SalesIntakeData, as_sales_intake, as_sales_intake_mut);
    payload_accessors!(FollowUpEmail, FollowUpEmailData, as_follow_up_email, as_follow_up_email_mut);
    payload_accessors!(ReminderSequence, ReminderState, as_reminder, as_reminder_mut);
    payload_accessors!(InternalReview, InternalReviewData, as_internal_review, as_internal_review_mut);
    payload_accessors!(GlReview, GlReviewData, as_gl_review, as_gl_review_mut);
    payload_accessors!(
        GlReviewComparison,
        ReconciliationState,
        as_reconciliation,
        as_reconciliation_mut
    );
}
