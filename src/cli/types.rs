use clap::{Parser, Subcommand};
use dealflow::validation::clap_id_validator;

pub use super::types_stage::{
    DemoCommands, EmailCommands, GlCommands, IntakeCommands, ReminderCommands, ReviewCommands,
    StageCommands,
};

const HELP_TEMPLATE: &str = "
  ┌┬┐┌─┐┌─┐┬  ┌─┐┬  ┌─┐┬ ┬
   ││├┤ ├─┤│  ├┤ │  │ ││││
  ─┴┘└─┘┴ ┴┴─┘└  ┴─┘└─┘└┴┘

{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

#[derive(Parser)]
#[command(name = "dealflow")]
#[command(about = "Sales pipeline tracker for onboarding deals", long_about = None)]
#[command(version)]
#[command(help_template = HELP_TEMPLATE)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the .work/ directory and a default config.toml
    Init,

    /// Show every deal with its current stage
    Status,

    /// Show the full timeline of one deal
    Show {
        /// Deal ID (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,
    },

    /// Generic stage transitions (advance, skip, set-status)
    Stage {
        #[command(subcommand)]
        command: StageCommands,
    },

    /// Demo call: transcript upload and intake analysis
    Demo {
        #[command(subcommand)]
        command: DemoCommands,
    },

    /// Sales intake form
    Intake {
        #[command(subcommand)]
        command: IntakeCommands,
    },

    /// Follow-up email to the team
    Email {
        #[command(subcommand)]
        command: EmailCommands,
    },

    /// Reminder sequence enrollment and ledger access
    Reminder {
        #[command(subcommand)]
        command: ReminderCommands,
    },

    /// Internal review sign-off
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },

    /// GL review submission and reconciliation against the AI review
    Gl {
        #[command(subcommand)]
        command: GlCommands,
    },

    /// Generate shell completion script
    Completions {
        /// Shell type: bash, zsh, or fish
        shell: String,
    },

    /// Print deal IDs matching a prefix (used by completion scripts)
    #[command(hide = true)]
    Complete {
        #[arg(default_value = "")]
        prefix: String,
    },
}
