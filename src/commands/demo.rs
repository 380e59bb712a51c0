use anyhow::Result;

use super::common::{open_deal, print_outcome};

pub fn transcript(deal_id: String, file_name: Option<String>) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.mark_transcript_uploaded(file_name)?;
    print_outcome("Transcript marked uploaded", outcome, &machine);
    Ok(())
}

pub fn analyzed(deal_id: String) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.mark_intake_analyzed()?;
    print_outcome("Intake marked analyzed", outcome, &machine);
    Ok(())
}
