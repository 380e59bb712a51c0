//! Integration tests driving a deal through every stage on disk

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use dealflow::calendar::FixedClock;
use dealflow::errors::PipelineError;
use dealflow::models::field::{FieldRecord, FieldValue};
use dealflow::models::stage::{StageId, StageStatus};
use dealflow::pipeline::{CommandOutcome, PipelinePolicy, SalesIntakeForm, StageMachine};
use dealflow::recipients::{Recipient, StaticRecipients};
use dealflow::reconcile::Source;
use dealflow::reminder::{Platform, ReminderStatus, UnenrollReason};
use dealflow::store::{FileTimelineStore, TimelineStore};
use std::sync::Arc;
use tempfile::TempDir;

// 2024-06-03 is a Monday
fn monday_9am() -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(2024, 6, 3, 9, 0, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

fn open_at<'a>(
    store: &'a FileTimelineStore,
    deal_id: &str,
    at: DateTime<Utc>,
) -> StageMachine<&'a FileTimelineStore> {
    StageMachine::open_with(store, deal_id, Arc::new(FixedClock(at)), PipelinePolicy::default())
        .expect("Should open deal")
}

fn team() -> StaticRecipients {
    StaticRecipients(vec![Recipient::new("Dana", "dana@example.com")])
}

#[test]
fn test_full_pipeline_survives_reopening() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileTimelineStore::at(temp_dir.path().join("timelines"));
    let start = monday_9am();

    // Demo call and intake on Monday
    {
        let mut machine = open_at(&store, "acme", start);
        assert_eq!(machine.current_stage(), StageId::DemoCall);
        machine
            .mark_transcript_uploaded(Some("acme-demo.txt".to_string()))
            .expect("Should record transcript");
        let outcome = machine.mark_intake_analyzed().expect("Should analyze intake");
        assert_eq!(outcome, CommandOutcome::Advanced { completed: StageId::DemoCall });

        machine
            .submit_sales_intake(SalesIntakeForm {
                contact_name: "Jordan Reyes".to_string(),
                contact_email: "jordan@acme.test".to_string(),
                company_name: "Acme Bookkeeping".to_string(),
                platform: Some(Platform::QuickBooks),
                notes: Some("Two entities".to_string()),
            })
            .expect("Should submit intake");
        machine.mark_follow_up_sent(&team()).expect("Should send follow-up");
        assert_eq!(machine.current_stage(), StageId::ReminderSequence);
    }

    // Wednesday: a fresh process sees the persisted state and may enroll
    {
        let mut machine = open_at(&store, "acme", start + Duration::days(2));
        assert_eq!(machine.current_stage(), StageId::ReminderSequence);
        assert!(machine.is_enrollment_due());
        machine.enroll_reminder().expect("Should enroll");
        machine
            .unenroll_reminder(UnenrollReason::ContactResponded)
            .expect("Should unenroll");
        machine.mark_access_received(None).expect("Should receive access");

        let reminder = machine
            .payload(StageId::ReminderSequence)
            .unwrap()
            .as_reminder()
            .unwrap();
        assert_eq!(reminder.status, ReminderStatus::AccessReceived);
        assert_eq!(reminder.access_platform, Some(Platform::QuickBooks));
        assert_eq!(machine.current_stage(), StageId::InternalReview);
    }

    // Reviews and reconciliation the following week
    {
        let mut machine = open_at(&store, "acme", start + Duration::days(7));
        machine
            .approve_internal_review("Sam", Some("Looks good".to_string()))
            .expect("Should approve");
        machine
            .attach_ai_review(
                FieldRecord::new()
                    .with("activeClasses", FieldValue::scalar("4"))
                    .with("entityType", FieldValue::scalar("LLC")),
            )
            .expect("Should attach AI review");
        machine
            .submit_gl_review(
                FieldRecord::new()
                    .with("activeClasses", FieldValue::scalar("5"))
                    .with("entityType", FieldValue::scalar("LLC")),
                Some("Dana".to_string()),
            )
            .expect("Should submit GL review");
        assert_eq!(machine.current_stage(), StageId::GlReviewComparison);

        machine
            .select_source("activeClasses", Source::Team)
            .expect("Should select team");
        machine.complete_reconciliation().expect("Should complete");
        assert!(machine.is_complete());
    }

    let record = store
        .get("acme")
        .expect("Should read timeline")
        .expect("Timeline should exist");
    assert!(record.is_complete());
    assert_eq!(record.finished_count(), StageId::ALL.len());
    for stage in StageId::ALL {
        assert_eq!(record.status_of(stage), Some(StageStatus::Completed));
    }

    let merged = record
        .envelope(StageId::GlReviewComparison)
        .unwrap()
        .data
        .as_reconciliation()
        .unwrap()
        .merged_record
        .clone()
        .expect("Merged record should be frozen");
    assert_eq!(merged.get("activeClasses"), Some(&FieldValue::scalar("5")));
    assert_eq!(merged.get("entityType"), Some(&FieldValue::scalar("LLC")));
}

#[test]
fn test_skipping_stages_still_finishes() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileTimelineStore::at(temp_dir.path());
    let mut machine = open_at(&store, "beta", monday_9am());

    for stage in StageId::ALL {
        machine.skip(stage).expect("Should skip current stage");
    }

    assert!(machine.is_complete());
    let record = store.get("beta").unwrap().unwrap();
    assert_eq!(record.finished_count(), StageId::ALL.len());
    assert_eq!(record.status_of(StageId::GlReview), Some(StageStatus::Skipped));
}

#[test]
fn test_rejected_command_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileTimelineStore::at(temp_dir.path());
    let mut machine = open_at(&store, "gamma", monday_9am());
    let before = std::fs::read_to_string(store.timeline_path("gamma").unwrap()).unwrap();

    let err = machine
        .advance(StageId::DemoCall)
        .expect_err("Demo call is not ready");
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::StageNotReady { stage: StageId::DemoCall, .. })
    ));

    let after = std::fs::read_to_string(store.timeline_path("gamma").unwrap()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_list_returns_every_deal_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileTimelineStore::at(temp_dir.path());
    for deal in ["zeta", "alpha", "mid"] {
        open_at(&store, deal, monday_9am());
    }
    std::fs::write(temp_dir.path().join("broken.md"), "no frontmatter here").unwrap();

    let deals: Vec<String> = store
        .list()
        .expect("Should list deals")
        .into_iter()
        .map(|record| record.deal_id)
        .collect();
    assert_eq!(deals, vec!["alpha", "mid", "zeta"]);
}
