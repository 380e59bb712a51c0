//! `dealflow status`: one line per deal.

use anyhow::Result;
use colored::Colorize;

use crate::calendar::{Clock, SystemClock};
use crate::models::constants::display::OVERDUE_ENROLLMENT_BUSINESS_DAYS;
use crate::models::stage::{StageId, StageStatus};
use crate::models::timeline::TimelineRecord;
use crate::pipeline::PipelinePolicy;

use super::common::{colored_status, status_marker, truncate, DealContext};

const DEAL_WIDTH: usize = 24;
const STAGE_WIDTH: usize = 22;

pub fn execute() -> Result<()> {
    let ctx = DealContext::discover()?;
    let store = ctx.store();
    let records = store.list()?;
    let now = SystemClock.now();
    let policy = ctx.config.policy();

    println!("\n{}", "Deals".bold());
    println!("{}", "─".repeat(72).dimmed());

    if records.is_empty() {
        println!("  No deals yet. Record the first demo call with 'dealflow demo transcript <deal>'.");
        return Ok(());
    }

    println!(
        "  {:<DEAL_WIDTH$} {:<STAGE_WIDTH$} {:<16} {}",
        "DEAL".dimmed(),
        "STAGE".dimmed(),
        "STATUS".dimmed(),
        "PROGRESS".dimmed()
    );

    let mut due = Vec::new();
    for record in &records {
        print_row(record);
        if enrollment_prompt(record, now, policy).is_some() {
            due.push(record);
        }
    }

    if !due.is_empty() {
        println!();
        for record in due {
            if let Some(prompt) = enrollment_prompt(record, now, policy) {
                println!("  {} {}: {prompt}", "!".yellow().bold(), record.deal_id.bold());
            }
        }
    }
    Ok(())
}

fn print_row(record: &TimelineRecord) {
    let progress = format!("{}/{}", record.finished_count(), StageId::ALL.len());
    if record.is_complete() {
        println!(
            "  {:<DEAL_WIDTH$} {:<STAGE_WIDTH$} {:<16} {}",
            truncate(&record.deal_id, DEAL_WIDTH),
            "finished",
            status_marker(StageStatus::Completed),
            progress.green()
        );
        return;
    }

    let stage = record.current_stage;
    let status = record.status_of(stage).unwrap_or_default();
    println!(
        "  {:<DEAL_WIDTH$} {:<STAGE_WIDTH$} {} {:<14} {}",
        truncate(&record.deal_id, DEAL_WIDTH),
        stage.title(),
        status_marker(status),
        colored_status(status),
        progress.dimmed()
    );
}

/// The operator prompt shown when a deal's reminder enrollment is due.
pub fn enrollment_prompt(
    record: &TimelineRecord,
    now: chrono::DateTime<chrono::Utc>,
    policy: PipelinePolicy,
) -> Option<String> {
    if record.current_stage != StageId::ReminderSequence {
        return None;
    }
    let reminder = record
        .envelope(StageId::ReminderSequence)
        .ok()?
        .data
        .as_reminder()
        .ok()?;
    if !reminder.is_enrollment_due(now, policy.enrollment_delay_business_days) {
        return None;
    }

    let elapsed = reminder.business_days_since_email(now);
    let overdue_after = policy.enrollment_delay_business_days + OVERDUE_ENROLLMENT_BUSINESS_DAYS;
    if elapsed >= overdue_after {
        Some(format!(
            "reminder enrollment overdue ({elapsed} business days since follow-up)"
        ))
    } else {
        Some("ready to enroll in the reminder sequence".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::pipeline::StageMachine;
    use crate::recipients::{Recipient, StaticRecipients};
    use crate::reminder::Platform;
    use crate::pipeline::SalesIntakeForm;
    use crate::store::MemoryTimelineStore;
    use chrono::{Duration, Local, TimeZone, Utc};
    use std::sync::Arc;

    fn record_waiting_on_reminder() -> (TimelineRecord, chrono::DateTime<Utc>) {
        // Monday 2025-01-06, 09:00 local time
        let sent = Local
            .with_ymd_and_hms(2025, 1, 6, 9, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc);
        let store = MemoryTimelineStore::new();
        let mut machine = StageMachine::open_with(
            &store,
            "acme",
            Arc::new(FixedClock(sent)),
            PipelinePolicy::default(),
        )
        .unwrap();
        machine.mark_transcript_uploaded(None).unwrap();
        machine.mark_intake_analyzed().unwrap();
        machine
            .submit_sales_intake(SalesIntakeForm {
                contact_name: "Pat".to_string(),
                contact_email: "pat@acme.test".to_string(),
                company_name: "Acme".to_string(),
                platform: Some(Platform::Xero),
                notes: None,
            })
            .unwrap();
        machine
            .mark_follow_up_sent(&StaticRecipients(vec![Recipient::new(
                "Dana",
                "dana@example.com",
            )]))
            .unwrap();
        (machine.into_record(), sent)
    }

    #[test]
    fn test_prompt_waits_for_delay() {
        let (record, sent) = record_waiting_on_reminder();
        let policy = PipelinePolicy::default();

        assert!(enrollment_prompt(&record, sent + Duration::days(1), policy).is_none());
        let prompt = enrollment_prompt(&record, sent + Duration::days(2), policy).unwrap();
        assert!(prompt.contains("ready to enroll"));
    }

    #[test]
    fn test_prompt_flags_overdue() {
        let (record, sent) = record_waiting_on_reminder();
        let prompt =
            enrollment_prompt(&record, sent + Duration::days(7), PipelinePolicy::default()).unwrap();
        assert!(prompt.contains("overdue"));
    }
}
