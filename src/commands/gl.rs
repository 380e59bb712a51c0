//! GL review and the field-by-field comparison against the AI review.

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::models::field::FieldValue;
use crate::models::stage::StageId;
use crate::reconcile::{FieldComparison, Source};

use super::common::{open_deal, print_outcome, read_field_record, truncate};

const FIELD_WIDTH: usize = 22;
const VALUE_WIDTH: usize = 28;

pub fn submit(deal_id: String, file: PathBuf, submitted_by: Option<String>) -> Result<()> {
    let form = read_field_record(&file)?;
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let fields = form.len();

    let outcome = machine.submit_gl_review(form, submitted_by)?;
    print_outcome(&format!("GL review submitted ({fields} fields)"), outcome, &machine);
    Ok(())
}

pub fn attach_ai(deal_id: String, file: PathBuf) -> Result<()> {
    let review = read_field_record(&file)?;
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let fields = review.len();

    let outcome = machine.attach_ai_review(review)?;
    print_outcome(&format!("AI review attached ({fields} fields)"), outcome, &machine);
    Ok(())
}

/// Print the comparison table. `all` includes fields that agree.
pub fn diff(deal_id: String, all: bool) -> Result<()> {
    let (_ctx, machine) = open_deal(&deal_id)?;
    let state = machine
        .payload(StageId::GlReviewComparison)?
        .as_reconciliation()?;

    println!("\n{} {}", "GL Review Comparison".bold(), deal_id.dimmed());
    println!("{}", "─".repeat(90).dimmed());

    if !state.has_team_record() {
        println!("  The team has not submitted the GL review yet.");
        return Ok(());
    }

    let rows: Vec<FieldComparison> = state
        .field_comparisons()
        .into_iter()
        .filter(|row| all || row.differs)
        .collect();
    if rows.is_empty() {
        println!("  {} Both reviews agree on every field.", "✓".green().bold());
        return Ok(());
    }

    println!(
        "  {:<FIELD_WIDTH$} {:<VALUE_WIDTH$} {:<VALUE_WIDTH$} {}",
        "FIELD".dimmed(),
        "AI".dimmed(),
        "TEAM".dimmed(),
        "SOURCE".dimmed()
    );
    for row in &rows {
        print_row(row);
    }

    let unresolved = state.unresolved_fields();
    if state.is_completed() {
        println!("\n  {} Reconciliation completed", "✓".green().bold());
    } else if unresolved.is_empty() {
        println!(
            "\n  All fields resolved. Run 'dealflow gl complete {deal_id}' to finish."
        );
    } else {
        println!(
            "\n  {} {} field(s) need a source: {}",
            "!".yellow().bold(),
            unresolved.len(),
            unresolved.join(", ")
        );
    }
    Ok(())
}

fn print_row(row: &FieldComparison) {
    let ai = row.ai.as_ref().map(FieldValue::display).unwrap_or_else(|| "(missing)".to_string());
    let team = row
        .team
        .as_ref()
        .map(FieldValue::display)
        .unwrap_or_else(|| "(missing)".to_string());
    let source = match (row.source, &row.custom) {
        (Some(Source::Custom), Some(value)) => format!("custom: {}", value.display()).cyan(),
        (Some(source), _) => source.to_string().green(),
        (None, _) => "unresolved".yellow(),
    };
    let field = truncate(&row.field, FIELD_WIDTH);
    let field = if row.differs { field.bold() } else { field.normal() };

    println!(
        "  {:<FIELD_WIDTH$} {:<VALUE_WIDTH$} {:<VALUE_WIDTH$} {source}",
        field,
        truncate(&ai, VALUE_WIDTH),
        truncate(&team, VALUE_WIDTH)
    );
}

pub fn select(deal_id: String, field: String, source: Source) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.select_source(&field, source)?;
    print_outcome(&format!("'{field}' will use the {source} value"), outcome, &machine);
    Ok(())
}

pub fn set(deal_id: String, field: String, value: String) -> Result<()> {
    let value = FieldValue::parse_lenient(&value)?;
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let display = value.display();

    let outcome = machine.set_custom_value(&field, value)?;
    print_outcome(&format!("'{field}' set to {display}"), outcome, &machine);
    Ok(())
}

pub fn complete(deal_id: String) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.complete_reconciliation()?;

    let merged = machine
        .payload(StageId::GlReviewComparison)?
        .as_reconciliation()?
        .merged_record
        .as_ref()
        .map(|record| record.len())
        .unwrap_or_default();
    print_outcome(
        &format!("Reconciliation completed ({merged} fields merged)"),
        outcome,
        &machine,
    );
    Ok(())
}
