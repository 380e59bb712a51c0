use anyhow::Result;

use crate::reminder::{Platform, UnenrollReason};

use super::common::{open_deal, print_outcome};

pub fn enroll(deal_id: String) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.enroll_reminder()?;
    print_outcome("Contact enrolled in the reminder sequence", outcome, &machine);
    Ok(())
}

pub fn unenroll(deal_id: String, reason: UnenrollReason) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.unenroll_reminder(reason)?;
    print_outcome(&format!("Contact unenrolled ({reason})"), outcome, &machine);
    Ok(())
}

pub fn access(deal_id: String, platform: Option<Platform>) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let outcome = machine.mark_access_received(platform)?;
    print_outcome("Ledger access received", outcome, &machine);
    Ok(())
}
