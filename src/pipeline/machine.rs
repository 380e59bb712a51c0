use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::calendar::{Clock, SystemClock};
use crate::errors::{PipelineError, PipelineResult};
use crate::models::constants::DEFAULT_ENROLLMENT_DELAY_BUSINESS_DAYS;
use crate::models::payload::StagePayload;
use crate::models::stage::{StageEnvelope, StageId, StageStatus};
use crate::models::timeline::TimelineRecord;
use crate::store::TimelineStore;

/// Tunables that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelinePolicy {
    pub enrollment_delay_business_days: u32,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            enrollment_delay_business_days: DEFAULT_ENROLLMENT_DELAY_BUSINESS_DAYS,
        }
    }
}

/// Orchestrates one deal's timeline.
///
/// Every command works on a copy of the record and writes it through the
/// store before the in-memory record is replaced, so a failed command (engine
/// error or write error) leaves both untouched.
pub struct StageMachine<S: TimelineStore> {
    store: S,
    record: TimelineRecord,
    clock: Arc<dyn Clock>,
    policy: PipelinePolicy,
}

impl<S: TimelineStore> StageMachine<S> {
    /// Open the deal's timeline with the wall clock and default policy,
    /// creating it on first access.
    pub fn open(store: S, deal_id: &str) -> Result<Self> {
        Self::open_with(store, deal_id, Arc::new(SystemClock), PipelinePolicy::default())
    }

    pub fn open_with(
        store: S,
        deal_id: &str,
        clock: Arc<dyn Clock>,
        policy: PipelinePolicy,
    ) -> Result<Self> {
        let record = store
            .get_or_create(deal_id, clock.now())
            .with_context(|| format!("Failed to load timeline for deal {deal_id}"))?;
        record
            .check_invariants()
            .with_context(|| format!("Timeline for deal {deal_id} failed validation"))?;

        Ok(Self {
            store,
            record,
            clock,
            policy,
        })
    }

    /// Replace the clock, e.g. to replay a later command in tests.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    pub fn policy(&self) -> PipelinePolicy {
        self.policy
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn record(&self) -> &TimelineRecord {
        &self.record
    }

    pub fn into_record(self) -> TimelineRecord {
        self.record
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn deal_id(&self) -> &str {
        &self.record.deal_id
    }

    pub fn current_stage(&self) -> StageId {
        self.record.current_stage
    }

    pub fn status(&self, stage: StageId) -> PipelineResult<StageStatus> {
        Ok(self.record.envelope(stage)?.status)
    }

    /// Every stage is completed or skipped.
    pub fn is_complete(&self) -> bool {
        self.record.is_complete()
    }

    pub fn envelope(&self, stage: StageId) -> PipelineResult<&StageEnvelope> {
        self.record.envelope(stage)
    }

    pub fn payload(&self, stage: StageId) -> PipelineResult<&StagePayload> {
        Ok(&self.record.envelope(stage)?.data)
    }

    pub fn completion_blocker(&self, stage: StageId) -> PipelineResult<Option<String>> {
        self.record.completion_blocker(stage)
    }

    /// Mutate one stage's payload and persist it. Does not advance.
    pub fn update_payload<F>(&mut self, stage: StageId, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut StagePayload) -> PipelineResult<()>,
    {
        self.apply(&format!("update payload of '{stage}'"), |record, _| {
            let payload = &mut record.envelope_mut(stage)?.data;
            mutator(payload)?;
            if payload.stage() != stage {
                return Err(PipelineError::PayloadMismatch {
                    stage,
                    found: payload.stage(),
                });
            }
            Ok(())
        })
    }

    /// Complete `stage`, which must be current, and start the next one.
    pub fn advance(&mut self, stage: StageId) -> Result<()> {
        self.apply(&format!("advance '{stage}'"), |record, now| {
            record.advance_stage(stage, now)
        })
    }

    /// Skip `stage`, which must be current, regardless of its predicate.
    pub fn skip(&mut self, stage: StageId) -> Result<()> {
        self.apply(&format!("skip '{stage}'"), |record, _| record.skip_stage(stage))
    }

    /// Toggle the current stage between in progress and action required, or
    /// complete or skip it.
    pub fn set_status(&mut self, stage: StageId, status: StageStatus) -> Result<()> {
        self.apply(&format!("set '{stage}' to {status}"), |record, now| {
            record.set_stage_status(stage, status, now)
        })
    }

    /// Run `f` against a draft of the record, then persist and swap it in.
    pub(super) fn apply<T, F>(&mut self, action: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut TimelineRecord, DateTime<Utc>) -> PipelineResult<T>,
    {
        let now = self.clock.now();
        let mut draft = self.record.clone();

        let output = f(&mut draft, now)?;
        draft.updated_at = now;

        self.store
            .put(&draft.deal_id, &draft)
            .with_context(|| format!("Failed to save timeline after: {action}"))?;
        debug!(deal_id = %draft.deal_id, action, "timeline persisted");

        self.record = draft;
        Ok(output)
    }
}
