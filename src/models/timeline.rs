use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{PipelineError, PipelineResult};
use crate::models::stage::{StageEnvelope, StageId, StageStatus};

/// The whole pipeline state of one deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    /// Opaque key owned by the deal tracker.
    pub deal_id: String,
    pub current_stage: StageId,
    pub stages: BTreeMap<StageId, StageEnvelope>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimelineRecord {
    /// A fresh timeline: every stage pending except the first, which is
    /// in progress.
    pub fn new(deal_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        let mut stages: BTreeMap<StageId, StageEnvelope> = StageId::ALL
            .iter()
            .map(|stage| (*stage, StageEnvelope::pending(*stage)))
            .collect();
        if let Some(first) = stages.get_mut(&StageId::first()) {
            first.status = StageStatus::InProgress;
        }

        Self {
            deal_id: deal_id.into(),
            current_stage: StageId::first(),
            stages,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn envelope(&self, stage: StageId) -> PipelineResult<&StageEnvelope> {
        self.stages
            .get(&stage)
            .ok_or_else(|| self.corrupt(format!("stage '{stage}' is missing")))
    }

    pub fn envelope_mut(&mut self, stage: StageId) -> PipelineResult<&mut StageEnvelope> {
        let deal_id = self.deal_id.clone();
        self.stages
            .get_mut(&stage)
            .ok_or_else(|| PipelineError::CorruptTimeline {
                deal_id,
                reason: format!("stage '{stage}' is missing"),
            })
    }

    pub fn status_of(&self, stage: StageId) -> Option<StageStatus> {
        self.stages.get(&stage).map(|envelope| envelope.status)
    }

    /// Every stage is completed or skipped.
    pub fn is_complete(&self) -> bool {
        StageId::ALL
            .iter()
            .all(|stage| self.status_of(*stage).is_some_and(|s| s.is_terminal()))
    }

    /// Number of stages that are completed or skipped.
    pub fn finished_count(&self) -> usize {
        self.stages
            .values()
            .filter(|envelope| envelope.is_terminal())
            .count()
    }

    /// Structural validation of a loaded record.
    ///
    /// Stages before `current_stage` are terminal; stages after it are
    /// pending; the current stage is active unless the whole pipeline is
    /// finished. Every payload matches its stage.
    pub fn check_invariants(&self) -> PipelineResult<()> {
        for stage in StageId::ALL {
            let envelope = self.envelope(stage)?;

            if envelope.data.stage() != stage {
                return Err(PipelineError::PayloadMismatch {
                    stage,
                    found: envelope.data.stage(),
                });
            }

            let status = envelope.status;
            let ok = match stage.cmp(&self.current_stage) {
                std::cmp::Ordering::Less => status.is_terminal(),
                std::cmp::Ordering::Greater => status == StageStatus::Pending,
                std::cmp::Ordering::Equal => {
                    status.is_active() || (stage == StageId::last() && status.is_terminal())
                }
            };
            if !ok {
                return Err(self.corrupt(format!(
                    "stage '{stage}' is {status} while the current stage is '{}'",
                    self.current_stage
                )));
            }
        }
        Ok(())
    }

    fn corrupt(&self, reason: String) -> PipelineError {
        PipelineError::CorruptTimeline {
            deal_id: self.deal_id.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-03T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_new_timeline_layout() {
        let record = TimelineRecord::new("deal-1", now());

        assert_eq!(record.current_stage, StageId::DemoCall);
        assert_eq!(record.stages.len(), StageId::ALL.len());
        assert_eq!(record.status_of(StageId::DemoCall), Some(StageStatus::InProgress));
        for stage in &StageId::ALL[1..] {
            assert_eq!(record.status_of(*stage), Some(StageStatus::Pending));
        }
        assert_eq!(record.created_at, record.updated_at);
        assert!(!record.is_complete());
        record.check_invariants().unwrap();
    }

    #[test]
    fn test_missing_stage_is_corrupt() {
        let mut record = TimelineRecord::new("deal-1", now());
        record.stages.remove(&StageId::GlReview);

        assert!(matches!(
            record.envelope(StageId::GlReview),
            Err(PipelineError::CorruptTimeline { .. })
        ));
        assert!(record.check_invariants().is_err());
    }

    #[test]
    fn test_pending_stage_behind_current_is_corrupt() {
        let mut record = TimelineRecord::new("deal-1", now());
        record.current_stage = StageId::SalesIntake;

        let err = record.check_invariants().unwrap_err();
        assert!(err.to_string().contains("demo-call"));
    }

    #[test]
    fn test_swapped_payload_is_mismatch() {
        let mut record = TimelineRecord::new("deal-1", now());
        let intake = record.stages[&StageId::SalesIntake].data.clone();
        record.envelope_mut(StageId::DemoCall).unwrap().data = intake;

        assert_eq!(
            record.check_invariants().unwrap_err(),
            PipelineError::PayloadMismatch {
                stage: StageId::DemoCall,
                found: StageId::SalesIntake,
            }
        );
    }

    #[test]
    fn test_complete_when_all_terminal() {
        let mut record = TimelineRecord::new("deal-1", now());
        for envelope in record.stages.values_mut() {
            envelope.status = StageStatus::Skipped;
        }
        record.current_stage = StageId::last();

        assert!(record.is_complete());
        assert_eq!(record.finished_count(), StageId::ALL.len());
        record.check_invariants().unwrap();
    }

    #[test]
    fn test_yaml_roundtrip() {
        let record = TimelineRecord::new("deal-1", now());
        let yaml = serde_yaml::to_string(&record).unwrap();
        assert!(yaml.contains("current_stage: demo-call"));
        let parsed: TimelineRecord = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, record);
    }
}
