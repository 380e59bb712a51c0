//! The stage machine: owns a deal's [`TimelineRecord`](crate::models::timeline::TimelineRecord),
//! enforces stage order and completion predicates, and writes every change
//! through a [`TimelineStore`](crate::store::TimelineStore).
//!
//! ```
//! use dealflow::pipeline::StageMachine;
//! use dealflow::models::stage::{StageId, StageStatus};
//! use dealflow::store::MemoryTimelineStore;
//!
//! let store = MemoryTimelineStore::new();
//! let mut machine = StageMachine::open(&store, "acme-001").unwrap();
//! assert_eq!(machine.current_stage(), StageId::DemoCall);
//!
//! machine.skip(StageId::DemoCall).unwrap();
//! assert_eq!(machine.current_stage(), StageId::SalesIntake);
//! assert_eq!(machine.status(StageId::SalesIntake).unwrap(), StageStatus::InProgress);
//! ```

mod commands;
mod machine;
mod transitions;

#[cfg(test)]
mod tests;

pub use commands::{CommandOutcome, SalesIntakeForm};
pub use machine::{PipelinePolicy, StageMachine};
