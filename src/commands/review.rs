use anyhow::Result;

use super::common::{open_deal, print_outcome};

pub fn approve(deal_id: String, reviewer: String, notes: Option<String>) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.approve_internal_review(&reviewer, notes)?;
    print_outcome(
        &format!("Internal review approved by {reviewer}"),
        outcome,
        &machine,
    );
    Ok(())
}
