//! Follow-up reminder sub-state-machine.
//!
//! Enrollment is never automatic: once the follow-up email is sent the track
//! is `scheduled`, and the operator confirms enrollment after the configured
//! number of business days. Access arriving at any point ends the track.

mod sequencer;
mod types;


pub use types::{
    EnrollmentSource, Platform, ReminderState, ReminderStatus, SequenceType, UnenrollReason,
};
