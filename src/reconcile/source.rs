use serde::{Deserialize, Serialize};

/// Where a field's final value is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The AI-generated review (record A).
    Ai,
    /// The team-submitted review (record B).
    Team,
    /// An operator-entered override.
    Custom,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Ai => write!(f, "ai"),
            Source::Team => write!(f, "team"),
            Source::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ai" => Ok(Source::Ai),
            "team" => Ok(Source::Team),
            "custom" => Ok(Source::Custom),
            _ => anyhow::bail!("Invalid source: {s}. Use: ai, team, custom"),
        }
    }
}
