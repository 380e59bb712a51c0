//! Generic stage transitions: advance, skip, set-status.

use anyhow::Result;

use crate::models::stage::{StageId, StageStatus};
use crate::pipeline::CommandOutcome;

use super::common::{open_deal, print_outcome, resolve_stage};

pub fn advance(deal_id: String, stage: Option<StageId>) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let stage = resolve_stage(&machine, stage);

    machine.advance(stage)?;
    print_outcome(
        &format!("Advanced '{}'", stage.title()),
        CommandOutcome::Advanced { completed: stage },
        &machine,
    );
    Ok(())
}

pub fn skip(deal_id: String, stage: Option<StageId>) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let stage = resolve_stage(&machine, stage);

    machine.skip(stage)?;
    print_outcome(
        &format!("Skipped '{}'", stage.title()),
        CommandOutcome::Recorded,
        &machine,
    );
    Ok(())
}

pub fn set_status(deal_id: String, status: StageStatus, stage: Option<StageId>) -> Result<()> {
    let (_ctx, mut machine) = open_deal(&deal_id)?;
    let stage = resolve_stage(&machine, stage);

    machine.set_status(stage, status)?;
    let outcome = if status == StageStatus::Completed {
        CommandOutcome::Advanced { completed: stage }
    } else {
        CommandOutcome::Recorded
    };
    print_outcome(
        &format!("Set '{}' to {status}", stage.title()),
        outcome,
        &machine,
    );
    Ok(())
}
