use chrono::Utc;

use crate::errors::PipelineError;
use crate::models::stage::StageStatus;

use super::create_test_envelope;

#[test]
fn test_try_transition_valid_pending_to_in_progress() {
    let status = StageStatus::Pending;
    let result = status.try_transition(StageStatus::InProgress);
    assert_eq!(result, Ok(StageStatus::InProgress));
}

#[test]
fn test_try_transition_invalid_completed_to_pending() {
    let status = StageStatus::Completed;
    let err = status.try_transition(StageStatus::Pending).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidTransition { .. }));
    let msg = err.to_string();
    assert!(msg.contains("invalid stage status transition"));
    assert!(msg.contains("completed -> pending"));
}

#[test]
fn test_envelope_try_transition_invalid_leaves_status() {
    let mut envelope = create_test_envelope(StageStatus::Completed);
    assert!(envelope.try_transition(StageStatus::InProgress).is_err());
    assert_eq!(envelope.status, StageStatus::Completed);
}

#[test]
fn test_try_complete_stamps_completed_at() {
    let mut envelope = create_test_envelope(StageStatus::InProgress);
    let now = Utc::now();
    envelope.try_complete(now).unwrap();
    assert_eq!(envelope.status, StageStatus::Completed);
    assert_eq!(envelope.completed_at, Some(now));
}

#[test]
fn test_try_complete_from_pending_fails() {
    let mut envelope = create_test_envelope(StageStatus::Pending);
    assert!(envelope.try_complete(Utc::now()).is_err());
    assert_eq!(envelope.completed_at, None);
}
