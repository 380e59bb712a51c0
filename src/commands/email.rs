use anyhow::Result;
use colored::Colorize;

use crate::models::stage::StageId;

use super::common::{open_deal, print_outcome};

/// Mark the follow-up email sent to the configured recipients.
pub fn sent(deal_id: String) -> Result<()> {
    let (ctx, mut machine) = open_deal(&deal_id)?;
    let directory = ctx.config.recipient_directory();

    let outcome = machine.mark_follow_up_sent(&directory)?;
    print_outcome("Follow-up email marked sent", outcome, &machine);

    let reminder = machine.payload(StageId::ReminderSequence)?.as_reminder()?;
    match reminder.scheduled_enrollment_at {
        Some(at) => println!(
            "  {} enrollment opens {}",
            "Reminder:".dimmed(),
            crate::calendar::local_date(at)
        ),
        None => println!(
            "  {} no automated sequence for this platform",
            "Reminder:".dimmed()
        ),
    }
    Ok(())
}
