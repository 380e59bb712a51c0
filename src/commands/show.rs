//! `dealflow show <deal>`: the full timeline of one deal.

use anyhow::Result;
use colored::Colorize;

use crate::calendar::local_date;
use crate::models::payload::StagePayload;
use crate::models::stage::{StageEnvelope, StageId};

use super::common::{colored_status, open_deal, relative_to_cwd, status_marker};

pub fn execute(deal_id: String) -> Result<()> {
    let (ctx, machine) = open_deal(&deal_id)?;
    let record = machine.record();

    println!("\n{} {}", "Deal".bold(), record.deal_id.bold());
    println!(
        "{}",
        format!(
            "Created {} · updated {}",
            local_date(record.created_at),
            local_date(record.updated_at)
        )
        .dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());

    for stage in StageId::ALL {
        let envelope = machine.envelope(stage)?;
        print_stage(stage, envelope, stage == record.current_stage && !record.is_complete());

        if stage == record.current_stage && !envelope.is_terminal() {
            if let Some(blocker) = machine.completion_blocker(stage)? {
                println!("      {} {blocker}", "Waiting on:".yellow());
            }
        }
    }

    if machine.is_enrollment_due() {
        println!(
            "\n{} Reminder enrollment is due. Run 'dealflow reminder enroll {}'.",
            "!".yellow().bold(),
            record.deal_id
        );
    }

    if let Ok(path) = ctx.store().timeline_path(&deal_id) {
        println!("\n{}", relative_to_cwd(&path).display().to_string().dimmed());
    }
    Ok(())
}

fn print_stage(stage: StageId, envelope: &StageEnvelope, current: bool) {
    let title = if current {
        stage.title().bold()
    } else {
        stage.title().normal()
    };
    let completed = envelope
        .completed_at
        .map(|at| format!(" {}", local_date(at)).dimmed().to_string())
        .unwrap_or_default();
    println!(
        "  {} {title} {}{completed}",
        status_marker(envelope.status),
        colored_status(envelope.status)
    );

    for line in payload_summary(&envelope.data) {
        println!("      {}", line.dimmed());
    }
}

/// Short human-readable lines describing what a stage has recorded.
pub fn payload_summary(payload: &StagePayload) -> Vec<String> {
    let mut lines = Vec::new();
    match payload {
        StagePayload::DemoCall(data) => {
            if data.transcript_uploaded {
                let name = data.transcript_file_name.as_deref().unwrap_or("transcript");
                lines.push(format!("Transcript: {name}"));
            }
            if data.intake_analyzed {
                lines.push("Intake analyzed".to_string());
            }
        }
        StagePayload::SalesIntake(data) => {
            if data.is_submitted() {
                lines.push(format!(
                    "{} ({}) at {}",
                    data.contact_name, data.contact_email, data.company_name
                ));
            }
            if let Some(platform) = data.platform {
                lines.push(format!("Platform: {platform}"));
            }
        }
        StagePayload::FollowUpEmail(data) => {
            if data.is_sent() {
                let names: Vec<&str> = data.recipients.iter().map(|r| r.name.as_str()).collect();
                lines.push(format!("Sent to {}", names.join(", ")));
            }
        }
        StagePayload::ReminderSequence(state) => {
            lines.push(format!("Reminder: {}", state.status));
            if let Some(at) = state.scheduled_enrollment_at {
                lines.push(format!("Enrollment opens {}", local_date(at)));
            }
        }
        StagePayload::InternalReview(data) => {
            if let Some(reviewer) = &data.reviewer {
                lines.push(format!("Approved by {reviewer}"));
            }
        }
        StagePayload::GlReview(data) => {
            if let Some(form) = &data.form {
                let by = data.submitted_by.as_deref().unwrap_or("team");
                lines.push(format!("{} fields submitted by {by}", form.len()));
            }
        }
        StagePayload::GlReviewComparison(state) => {
            if !state.source_record_a.is_empty() {
                lines.push(format!("AI review: {} fields", state.source_record_a.len()));
            }
            if state.has_team_record() {
                let differing = state.differing_fields().len();
                let unresolved = state.unresolved_fields().len();
                lines.push(format!("{differing} differing, {unresolved} unresolved"));
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field::{FieldRecord, FieldValue};
    use crate::reconcile::ReconciliationState;

    #[test]
    fn test_empty_payloads_have_no_summary() {
        assert!(payload_summary(&StagePayload::empty_for(StageId::DemoCall)).is_empty());
        assert!(payload_summary(&StagePayload::empty_for(StageId::GlReview)).is_empty());
    }

    #[test]
    fn test_comparison_summary_counts_fields() {
        let ai = FieldRecord::new()
            .with("activeClasses", FieldValue::scalar("4"))
            .with("entity", FieldValue::scalar("LLC"));
        let team = FieldRecord::new()
            .with("activeClasses", FieldValue::scalar("5"))
            .with("entity", FieldValue::scalar("LLC"));
        let state = ReconciliationState::new(ai, Some(team));

        let lines = payload_summary(&StagePayload::GlReviewComparison(state));
        assert_eq!(lines, vec!["AI review: 2 fields", "1 differing, 1 unresolved"]);
    }
}
