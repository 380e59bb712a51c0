use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::payload::StagePayload;

/// Identifier of a pipeline stage.
///
/// Declaration order is progression order: `PartialOrd`/`Ord` compare by
/// position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageId {
    DemoCall,
    SalesIntake,
    FollowUpEmail,
    ReminderSequence,
    InternalReview,
    GlReview,
    GlReviewComparison,
}

impl StageId {
    /// Every stage, in progression order.
    pub const ALL: [StageId; 7] = [
        StageId::DemoCall,
        StageId::SalesIntake,
        StageId::FollowUpEmail,
        StageId::ReminderSequence,
        StageId::InternalReview,
        StageId::GlReview,
        StageId::GlReviewComparison,
    ];

    pub fn first() -> StageId {
        StageId::ALL[0]
    }

    pub fn last() -> StageId {
        StageId::ALL[StageId::ALL.len() - 1]
    }

    /// Zero-based position in the pipeline.
    pub fn position(self) -> usize {
        StageId::ALL
            .iter()
            .position(|stage| *stage == self)
            .unwrap_or_default()
    }

    /// The stage that follows this one, or `None` for the last stage.
    pub fn next(self) -> Option<StageId> {
        StageId::ALL.get(self.position() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::DemoCall => "demo-call",
            StageId::SalesIntake => "sales-intake",
            StageId::FollowUpEmail => "follow-up-email",
            StageId::ReminderSequence => "reminder-sequence",
            StageId::InternalReview => "internal-review",
            StageId::GlReview => "gl-review",
            StageId::GlReviewComparison => "gl-review-comparison",
        }
    }

    /// Human-readable title for dashboards.
    pub fn title(self) -> &'static str {
        match self {
            StageId::DemoCall => "Demo Call",
            StageId::SalesIntake => "Sales Intake",
            StageId::FollowUpEmail => "Follow-up Email",
            StageId::ReminderSequence => "Reminder Sequence",
            StageId::InternalReview => "Internal Review",
            StageId::GlReview => "GL Review",
            StageId::GlReviewComparison => "GL Review Comparison",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StageId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StageId::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = StageId::ALL.iter().map(|s| s.as_str()).collect();
                anyhow::anyhow!("Unknown stage: {s}. Use one of: {}", known.join(", "))
            })
    }
}

/// Status of a stage in the pipeline lifecycle.
///
/// State machine transitions:
/// - `Pending` -> `InProgress` (when the previous stage finishes) | `Skipped`
/// - `InProgress` -> `ActionRequired` | `Completed` | `Skipped`
/// - `ActionRequired` -> `InProgress` | `Completed` | `Skipped`
/// - `Completed` and `Skipped` are terminal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage lies ahead of the current stage.
    #[default]
    Pending,

    /// Current stage; the operator is working on it.
    InProgress,

    /// Current stage; blocked on something the operator must do.
    ActionRequired,

    /// Completion predicate held when the stage was advanced. Terminal.
    Completed,

    /// Operator skipped the stage without satisfying it. Terminal.
    Skipped,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::InProgress => write!(f, "in_progress"),
            StageStatus::ActionRequired => write!(f, "action_required"),
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for StageStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(StageStatus::Pending),
            "in_progress" => Ok(StageStatus::InProgress),
            "action_required" => Ok(StageStatus::ActionRequired),
            "completed" => Ok(StageStatus::Completed),
            "skipped" => Ok(StageStatus::Skipped),
            _ => anyhow::bail!(
                "Invalid stage status: {s}. Use: pending, in_progress, action_required, completed, skipped"
            ),
        }
    }
}

/// Status and payload wrapper around one stage's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEnvelope {
    pub status: StageStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub data: StagePayload,
}
