use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use std::sync::Arc;

use crate::calendar::FixedClock;
use crate::errors::PipelineError;
use crate::models::field::{FieldRecord, FieldValue};
use crate::models::stage::StageId;
use crate::recipients::{Recipient, StaticRecipients};
use crate::reminder::Platform;
use crate::store::MemoryTimelineStore;

use super::{PipelinePolicy, SalesIntakeForm, StageMachine};


type TestMachine<'a> = StageMachine<&'a MemoryTimelineStore>;

// 2024-06-03 is a Monday
fn monday_9am() -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

fn create_test_machine(store: &MemoryTimelineStore) -> TestMachine<'_> {
    StageMachine::open_with(
        store,
        "acme-001",
        Arc::new(FixedClock(monday_9am())),
        PipelinePolicy::default(),
    )
    .unwrap()
}

fn set_time(machine: &mut TestMachine<'_>, at: DateTime<Utc>) {
    machine.set_clock(Arc::new(FixedClock(at)));
}

fn pipeline_error(err: &anyhow::Error) -> &PipelineError {
    err.downcast_ref::<PipelineError>()
        .unwrap_or_else(|| panic!("not a pipeline error: {err:#}"))
}

fn intake_form(platform: Platform) -> SalesIntakeForm {
    SalesIntakeForm {
        contact_name: "Jordan Reyes".to_string(),
        contact_email: "jordan@acme.test".to_string(),
        company_name: "Acme Bookkeeping".to_string(),
        platform: Some(platform),
        notes: None,
    }
}

fn team() -> StaticRecipients {
    StaticRecipients(vec![
        Recipient::new("Dana", "dana@example.com"),
        Recipient::new("Sam", "sam@example.com"),
    ])
}

fn review(active_classes: &str) -> FieldRecord {
    FieldRecord::new()
        .with("activeClasses", FieldValue::scalar(active_classes))
        .with("companyName", FieldValue::scalar("Acme Bookkeeping"))
}

/// Drive the machine through real commands until `target` is current.
fn drive_to(machine: &mut TestMachine<'_>, target: StageId) {
    while machine.current_stage() < target {
        match machine.current_stage() {
            StageId::DemoCall => {
                machine
                    .mark_transcript_uploaded(Some("demo.txt".to_string()))
                    .unwrap();
                machine.mark_intake_analyzed().unwrap();
            }
            StageId::SalesIntake => {
                machine
                    .submit_sales_intake(intake_form(Platform::QuickBooks))
                    .unwrap();
            }
            StageId::FollowUpEmail => {
                machine.mark_follow_up_sent(&team()).unwrap();
            }
            StageId::ReminderSequence => {
                machine.mark_access_received(None).unwrap();
            }
            StageId::InternalReview => {
                machine.approve_internal_review("Dana", None).unwrap();
            }
            StageId::GlReview => {
                machine.submit_gl_review(review("5"), None).unwrap();
            }
            StageId::GlReviewComparison => unreachable!("last stage"),
        }
    }
}

fn days(n: i64) -> Duration {
    Duration::days(n)
}
