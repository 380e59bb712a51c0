use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::errors::{PipelineError, PipelineResult};
use crate::models::field::{FieldRecord, FieldValue};
use crate::models::stage::StageId;

use super::diff::{diff_all, field_differs, union_of_fields};
use super::source::Source;

/// Payload of the `gl-review-comparison` stage.
///
/// The merged record is always re-derivable from the two sources, the
/// selections and the custom values; `merged_record` is only stored once the
/// reconciliation is completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationState {
    /// The AI-generated review.
    #[serde(default)]
    pub source_record_a: FieldRecord,
    /// The team-submitted review, once it exists.
    #[serde(default)]
    pub source_record_b: Option<FieldRecord>,
    /// Operator choices. A missing entry means "not selected yet".
    #[serde(default)]
    pub selections: BTreeMap<String, Source>,
    #[serde(default)]
    pub custom_values: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub merged_record: Option<FieldRecord>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Side-by-side view of one field for operator display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldComparison {
    pub field: String,
    pub ai: Option<FieldValue>,
    pub team: Option<FieldValue>,
    pub differs: bool,
    /// `None` while the field differs and nothing has been selected.
    pub source: Option<Source>,
    pub custom: Option<FieldValue>,
}

/// The chosen side's value, or the empty value of the other side's shape
/// when the chosen side lacks the field.
fn chosen_or_empty(chosen: Option<&FieldValue>, other: Option<&FieldValue>) -> Option<FieldValue> {
    chosen
        .cloned()
        .or_else(|| other.map(|value| FieldValue::empty(value.shape())))
}

impl ReconciliationState {
    pub fn new(ai: FieldRecord, team: Option<FieldRecord>) -> Self {
        Self {
            source_record_a: ai,
            source_record_b: team,
            ..Default::default()
        }
    }

    /// Replace the AI review. Choices for fields that no longer exist in
    /// either record are dropped.
    pub fn set_ai_record(&mut self, record: FieldRecord) -> PipelineResult<()> {
        self.ensure_open("replace the AI review")?;
        self.source_record_a = record;
        self.prune_choices();
        Ok(())
    }

    /// Replace the team review.
    pub fn set_team_record(&mut self, record: FieldRecord) -> PipelineResult<()> {
        self.ensure_open("replace the team review")?;
        self.source_record_b = Some(record);
        self.prune_choices();
        Ok(())
    }

    pub fn has_team_record(&self) -> bool {
        self.source_record_b.is_some()
    }

    /// Fields where the two reviews disagree. Empty until the team review
    /// exists.
    pub fn differing_fields(&self) -> BTreeSet<String> {
        match &self.source_record_b {
            Some(team) => diff_all(&self.source_record_a, team),
            None => BTreeSet::new(),
        }
    }

    pub fn selection(&self, field: &str) -> Option<Source> {
        self.selections.get(field).copied()
    }

    /// The explicit selection, or `Ai` for a field that does not differ.
    pub fn effective_source(&self, field: &str) -> Option<Source> {
        self.selection(field).or_else(|| {
            let differs = field_differs(self.source_record_a.get(field), self.team_value(field));
            (!differs).then_some(Source::Ai)
        })
    }

    /// Pick the source of `field`'s final value.
    ///
    /// A non-custom source discards any stored custom value. Choosing
    /// `Custom` with nothing stored yet starts from the AI value.
    pub fn select_source(&mut self, field: &str, source: Source) -> PipelineResult<()> {
        self.ensure_mutable("select a source")?;
        self.ensure_known(field)?;

        match source {
            Source::Custom => {
                if !self.custom_values.contains_key(field) {
                    let seed = self.seed_custom_value(field);
                    self.custom_values.insert(field.to_string(), seed);
                }
            }
            Source::Ai | Source::Team => {
                self.custom_values.remove(field);
            }
        }
        self.selections.insert(field.to_string(), source);
        debug!(field, %source, "field source selected");
        Ok(())
    }

    /// Store an override for `field` and select `Custom` for it.
    pub fn set_custom_value(&mut self, field: &str, value: FieldValue) -> PipelineResult<()> {
        self.ensure_mutable("set a custom value")?;
        self.ensure_known(field)?;

        self.custom_values.insert(field.to_string(), value);
        self.selections.insert(field.to_string(), Source::Custom);
        debug!(field, "custom value stored");
        Ok(())
    }

    /// The record the current choices resolve to.
    ///
    /// Pure: computed from the sources and choices on every call.
    pub fn merged_record(&self) -> FieldRecord {
        let team = self.source_record_b.clone().unwrap_or_default();
        union_of_fields(&self.source_record_a, &team)
            .into_iter()
            .filter_map(|field| {
                let value = self.resolve(&field, &team)?;
                Some((field, value))
            })
            .collect()
    }

    fn resolve(&self, field: &str, team: &FieldRecord) -> Option<FieldValue> {
        let ai = self.source_record_a.get(field);
        let team_value = team.get(field);
        match self.selection(field) {
            Some(Source::Custom) => Some(
                self.custom_values
                    .get(field)
                    .cloned()
                    .unwrap_or_else(|| self.seed_custom_value(field)),
            ),
            Some(Source::Team) => chosen_or_empty(team_value, ai),
            Some(Source::Ai) => chosen_or_empty(ai, team_value),
            None => ai.or(team_value).cloned(),
        }
    }

    /// Every differing field has a selection.
    pub fn all_resolved(&self) -> bool {
        self.unresolved_fields().is_empty()
    }

    /// Differing fields still waiting for an operator decision, sorted.
    pub fn unresolved_fields(&self) -> Vec<String> {
        self.differing_fields()
            .into_iter()
            .filter(|field| !self.selections.contains_key(field))
            .collect()
    }

    /// Freeze the merged record and stamp `completed_at`.
    pub fn complete(&mut self, now: DateTime<Utc>) -> PipelineResult<()> {
        self.ensure_mutable("complete the reconciliation")?;

        let unresolved = self.unresolved_fields();
        if !unresolved.is_empty() {
            return Err(PipelineError::UnresolvedFields { fields: unresolved });
        }

        self.merged_record = Some(self.merged_record());
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// One row per field across both records, in field-name order.
    pub fn field_comparisons(&self) -> Vec<FieldComparison> {
        let team = self.source_record_b.clone().unwrap_or_default();
        union_of_fields(&self.source_record_a, &team)
            .into_iter()
            .map(|field| {
                let ai = self.source_record_a.get(&field).cloned();
                let team_value = team.get(&field).cloned();
                FieldComparison {
                    differs: field_differs(ai.as_ref(), team_value.as_ref()),
                    source: self.effective_source(&field),
                    custom: self.custom_values.get(&field).cloned(),
                    ai,
                    team: team_value,
                    field,
                }
            })
            .collect()
    }

    fn team_value(&self, field: &str) -> Option<&FieldValue> {
        self.source_record_b.as_ref().and_then(|team| team.get(field))
    }

    fn seed_custom_value(&self, field: &str) -> FieldValue {
        match (self.source_record_a.get(field), self.team_value(field)) {
            (Some(ai), _) => ai.clone(),
            (None, Some(team)) => FieldValue::empty(team.shape()),
            (None, None) => FieldValue::scalar(""),
        }
    }

    fn ensure_open(&self, action: &str) -> PipelineResult<()> {
        if self.is_completed() {
            return Err(PipelineError::invalid_transition(
                action,
                "the reconciliation is already completed",
            ));
        }
        Ok(())
    }

    fn ensure_mutable(&self, action: &str) -> PipelineResult<()> {
        self.ensure_open(action)?;
        if !self.has_team_record() {
            return Err(PipelineError::not_ready(
                StageId::GlReviewComparison,
                "the team review has not been submitted",
            ));
        }
        Ok(())
    }

    fn ensure_known(&self, field: &str) -> PipelineResult<()> {
        if self.source_record_a.contains(field) || self.team_value(field).is_some() {
            Ok(())
        } else {
            Err(PipelineError::UnknownField(field.to_string()))
        }
    }

    fn prune_choices(&mut self) {
        let team = self.source_record_b.clone().unwrap_or_default();
        let known = union_of_fields(&self.source_record_a, &team);
        self.selections.retain(|field, _| known.contains(field));
        self.custom_values.retain(|field, _| known.contains(field));
    }
}
