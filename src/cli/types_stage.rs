//! Per-stage CLI command types

use clap::Subcommand;
use dealflow::models::stage::{StageId, StageStatus};
use dealflow::reconcile::Source;
use dealflow::reminder::{Platform, UnenrollReason};
use dealflow::validation::{clap_email_validator, clap_id_validator, clap_notes_validator};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum StageCommands {
    /// Complete a stage and hand over to the next one (checks its completion requirements)
    Advance {
        /// Deal ID (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// Stage to advance (defaults to the current stage)
        #[arg(long)]
        stage: Option<StageId>,
    },

    /// Skip a stage without satisfying it
    Skip {
        /// Deal ID (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// Stage to skip (defaults to the current stage)
        #[arg(long)]
        stage: Option<StageId>,
    },

    /// Set a stage status (in_progress, action_required, completed, skipped)
    SetStatus {
        /// Deal ID (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        status: StageStatus,

        /// Stage to update (defaults to the current stage)
        #[arg(long)]
        stage: Option<StageId>,
    },
}

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Mark the demo call transcript as uploaded
    Transcript {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// Name of the uploaded transcript file
        #[arg(long)]
        file: Option<String>,
    },

    /// Mark the intake as analyzed (completes the demo call)
    Analyzed {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,
    },
}

#[derive(Subcommand)]
pub enum IntakeCommands {
    /// Submit the sales intake form
    Submit {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        #[arg(long)]
        contact: String,

        #[arg(long, value_parser = clap_email_validator)]
        email: String,

        #[arg(long)]
        company: String,

        /// Accounting platform: quickbooks, xero, or other
        #[arg(long)]
        platform: Option<Platform>,

        /// Free-form notes (max 2000 characters)
        #[arg(long, value_parser = clap_notes_validator)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EmailCommands {
    /// Mark the follow-up email sent to the configured recipients
    Sent {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,
    },
}

#[derive(Subcommand)]
pub enum ReminderCommands {
    /// Enroll the contact in the reminder sequence (once the delay has elapsed)
    Enroll {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,
    },

    /// Stop the reminder sequence
    Unenroll {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// Why: response or access
        reason: UnenrollReason,
    },

    /// Record that ledger access was granted (completes the reminder stage)
    Access {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// Platform access was granted on (defaults to the intake platform)
        #[arg(long)]
        platform: Option<Platform>,
    },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// Approve the internal review
    Approve {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        #[arg(long)]
        reviewer: String,

        /// Review notes (max 2000 characters)
        #[arg(long, value_parser = clap_notes_validator)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum GlCommands {
    /// Submit the team's GL review from a JSON file
    Submit {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// JSON object of field name to value
        file: PathBuf,

        #[arg(long)]
        by: Option<String>,
    },

    /// Attach the AI-generated review from a JSON file
    AttachAi {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        file: PathBuf,
    },

    /// Show the field comparison between the AI and team reviews
    Diff {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        /// Include fields both reviews agree on
        #[arg(short, long)]
        all: bool,
    },

    /// Choose which review a field's final value comes from
    Select {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        field: String,

        /// ai, team, or custom
        source: Source,
    },

    /// Override a field with a custom value (JSON or bare text)
    Set {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,

        field: String,

        value: String,
    },

    /// Freeze the merged record and finish the pipeline
    Complete {
        #[arg(value_parser = clap_id_validator)]
        deal_id: String,
    },
}
