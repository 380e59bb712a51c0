//! Field-level reconciliation of the AI-generated and team-submitted GL
//! reviews.
//!
//! [`diff`] finds the fields where the two records disagree; the
//! [`ReconciliationState`] tracks, per differing field, which source the
//! operator picked and produces the merged record.

pub mod diff;
mod reconciler;
mod source;


pub use diff::{diff_all, field_differs, fields_differ};
pub use reconciler::{FieldComparison, ReconciliationState};
pub use source::Source;
