use anyhow::Result;
use dealflow::commands::common::find_work_dir;
use dealflow::commands::{demo, email, gl, init, intake, reminder, review, stage, show, status};
use dealflow::completions::{complete_deal_ids, generate_completions, Shell};
use dealflow::pipeline::SalesIntakeForm;
use std::str::FromStr;

use super::types::{
    Cli, Commands, DemoCommands, EmailCommands, GlCommands, IntakeCommands, ReminderCommands,
    ReviewCommands, StageCommands,
};

pub fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Init => init::execute(),
        Commands::Status => status::execute(),
        Commands::Show { deal_id } => show::execute(deal_id),
        Commands::Stage { command } => match command {
            StageCommands::Advance { deal_id, stage: s } => stage::advance(deal_id, s),
            StageCommands::Skip { deal_id, stage: s } => stage::skip(deal_id, s),
            StageCommands::SetStatus {
                deal_id,
                status,
                stage: s,
            } => stage::set_status(deal_id, status, s),
        },
        Commands::Demo { command } => match command {
            DemoCommands::Transcript { deal_id, file } => demo::transcript(deal_id, file),
            DemoCommands::Analyzed { deal_id } => demo::analyzed(deal_id),
        },
        Commands::Intake { command } => match command {
            IntakeCommands::Submit {
                deal_id,
                contact,
                email,
                company,
                platform,
                notes,
            } => intake::submit(
                deal_id,
                SalesIntakeForm {
                    contact_name: contact,
                    contact_email: email,
                    company_name: company,
                    platform,
                    notes,
                },
            ),
        },
        Commands::Email { command } => match command {
            EmailCommands::Sent { deal_id } => email::sent(deal_id),
        },
        Commands::Reminder { command } => match command {
            ReminderCommands::Enroll { deal_id } => reminder::enroll(deal_id),
            ReminderCommands::Unenroll { deal_id, reason } => reminder::unenroll(deal_id, reason),
            ReminderCommands::Access { deal_id, platform } => reminder::access(deal_id, platform),
        },
        Commands::Review { command } => match command {
            ReviewCommands::Approve {
                deal_id,
                reviewer,
                notes,
            } => review::approve(deal_id, reviewer, notes),
        },
        Commands::Gl { command } => match command {
            GlCommands::Submit { deal_id, file, by } => gl::submit(deal_id, file, by),
            GlCommands::AttachAi { deal_id, file } => gl::attach_ai(deal_id, file),
            GlCommands::Diff { deal_id, all } => gl::diff(deal_id, all),
            GlCommands::Select {
                deal_id,
                field,
                source,
            } => gl::select(deal_id, field, source),
            GlCommands::Set {
                deal_id,
                field,
                value,
            } => gl::set(deal_id, field, value),
            GlCommands::Complete { deal_id } => gl::complete(deal_id),
        },
        Commands::Completions { shell } => {
            let shell = Shell::from_str(&shell)?;
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate_completions(&mut cmd, shell);
            Ok(())
        }
        Commands::Complete { prefix } => {
            // No work dir means no candidates.
            if let Ok(work_dir) = find_work_dir() {
                for id in complete_deal_ids(&work_dir.timelines_dir(), &prefix)? {
                    println!("{id}");
                }
            }
            Ok(())
        }
    }
}
