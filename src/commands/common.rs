//! Helpers shared by the command implementations: work directory discovery,
//! opening a deal, and the status markers used in every listing.

use anyhow::{bail, Context, Result};
use colored::{ColoredString, Colorize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::fs::work_dir::{WorkDir, WORK_DIR_ENV};
use crate::models::field::FieldRecord;
use crate::models::stage::{StageId, StageStatus};
use crate::pipeline::{CommandOutcome, StageMachine};
use crate::store::FileTimelineStore;

/// Find the .work directory by walking up from the current directory.
///
/// `DEALFLOW_WORK_DIR` short-circuits the search.
pub fn find_work_dir() -> Result<WorkDir> {
    if std::env::var_os(WORK_DIR_ENV).is_some_and(|v| !v.is_empty()) {
        let work_dir = WorkDir::from_env()?;
        work_dir.load()?;
        return Ok(work_dir);
    }

    let mut current = std::env::current_dir().context("Failed to get current directory")?;
    loop {
        if current.join(".work").is_dir() {
            let work_dir = WorkDir::new(&current)?;
            work_dir.load()?;
            return Ok(work_dir);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => bail!("Could not find .work directory. Run 'dealflow init' first."),
        }
    }
}

/// Configuration for the discovered work directory, or defaults when there
/// is none yet.
pub fn load_config() -> Result<Config> {
    match find_work_dir() {
        Ok(work_dir) => Config::load(work_dir.root()),
        Err(_) => Ok(Config::default()),
    }
}

pub struct DealContext {
    pub work_dir: WorkDir,
    pub config: Config,
}

impl DealContext {
    pub fn discover() -> Result<Self> {
        let work_dir = find_work_dir()?;
        let config = Config::load(work_dir.root())?;
        Ok(Self { work_dir, config })
    }

    pub fn store(&self) -> FileTimelineStore {
        FileTimelineStore::new(&self.work_dir)
    }

    /// Open (creating on first use) the deal's timeline.
    pub fn open(&self, deal_id: &str) -> Result<StageMachine<FileTimelineStore>> {
        StageMachine::open_with(
            self.store(),
            deal_id,
            std::sync::Arc::new(crate::calendar::SystemClock),
            self.config.policy(),
        )
    }
}

/// Shortcut for commands that act on one deal.
pub fn open_deal(deal_id: &str) -> Result<(DealContext, StageMachine<FileTimelineStore>)> {
    let ctx = DealContext::discover()?;
    let machine = ctx.open(deal_id)?;
    Ok((ctx, machine))
}

pub fn status_marker(status: StageStatus) -> ColoredString {
    match status {
        StageStatus::Completed => "✓".green().bold(),
        StageStatus::Skipped => "⊘".dimmed(),
        StageStatus::InProgress => "●".blue().bold(),
        StageStatus::ActionRequired => "!".yellow().bold(),
        StageStatus::Pending => "○".dimmed(),
    }
}

pub fn colored_status(status: StageStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        StageStatus::Completed => text.green(),
        StageStatus::Skipped => text.dimmed(),
        StageStatus::InProgress => text.blue(),
        StageStatus::ActionRequired => text.yellow(),
        StageStatus::Pending => text.normal(),
    }
}

/// Print what a command did, and where the deal stands now.
pub fn print_outcome<S: crate::store::TimelineStore>(
    message: &str,
    outcome: CommandOutcome,
    machine: &StageMachine<S>,
) {
    println!("{} {message}", "✓".green().bold());
    if let CommandOutcome::Advanced { completed } = outcome {
        println!("  {} {} completed", status_marker(StageStatus::Completed), completed.title());
    }
    print_current(machine);
}

pub fn print_current<S: crate::store::TimelineStore>(machine: &StageMachine<S>) {
    if machine.is_complete() {
        println!("  Pipeline for '{}' is finished", machine.deal_id());
        return;
    }

    let stage = machine.current_stage();
    let status = machine.status(stage).unwrap_or_default();
    println!(
        "  Current stage: {} {}",
        stage.title().bold(),
        format!("({status})").dimmed()
    );
    if let Ok(Some(blocker)) = machine.completion_blocker(stage) {
        println!("  {} {blocker}", "Waiting on:".dimmed());
    }
}

/// The stage to act on: the one given, or the current stage.
pub fn resolve_stage<S: crate::store::TimelineStore>(
    machine: &StageMachine<S>,
    stage: Option<StageId>,
) -> StageId {
    stage.unwrap_or_else(|| machine.current_stage())
}

pub fn read_field_record(path: &Path) -> Result<FieldRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read review file: {}", path.display()))?;
    FieldRecord::from_json(&content)
        .with_context(|| format!("Invalid review file: {}", path.display()))
}

/// Truncate a string for table display, appending `…` when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn relative_to_cwd(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}
