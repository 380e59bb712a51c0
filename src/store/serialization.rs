//! Timeline serialization and deserialization
//!
//! A timeline file is the serialized [`TimelineRecord`] as YAML frontmatter,
//! followed by a markdown summary for humans browsing `.work/timelines/`.
//! Only the frontmatter is read back.

use anyhow::{Context, Result};

use crate::models::stage::{StageId, StageStatus};
use crate::models::timeline::TimelineRecord;
use crate::parser::frontmatter::{parse_from_markdown, render_with_frontmatter};

pub fn parse_timeline_from_markdown(content: &str) -> Result<TimelineRecord> {
    parse_from_markdown(content, "TimelineRecord")
}

pub fn serialize_timeline_to_markdown(record: &TimelineRecord) -> Result<String> {
    render_with_frontmatter(record, &summary_body(record))
        .with_context(|| format!("Failed to serialize timeline for deal {}", record.deal_id))
}

fn summary_body(record: &TimelineRecord) -> String {
    let mut body = String::new();
    body.push_str(&format!("# Deal: {}\n\n", record.deal_id));
    body.push_str(&format!(
        "**Current stage**: {} ({}/{} finished)\n\n",
        record.current_stage.title(),
        record.finished_count(),
        StageId::ALL.len()
    ));

    body.push_str("## Stages\n\n");
    for stage in StageId::ALL {
        let Some(envelope) = record.stages.get(&stage) else {
            body.push_str(&format!("- [?] {} (missing)\n", stage.title()));
            continue;
        };
        let mark = match envelope.status {
            StageStatus::Completed => "x",
            StageStatus::Skipped => "-",
            StageStatus::InProgress | StageStatus::ActionRequired => ">",
            StageStatus::Pending => " ",
        };
        body.push_str(&format!("- [{mark}] {}: {}", stage.title(), envelope.status));
        if let Some(at) = envelope.completed_at {
            body.push_str(&format!(" ({})", at.format("%Y-%m-%d %H:%M UTC")));
        }
        body.push('\n');
    }
    body.push('\n');
    body
}
