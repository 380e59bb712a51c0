use crate::models::stage::{StageEnvelope, StageId, StageStatus};

fn create_test_envelope(status: StageStatus) -> StageEnvelope {
    let mut envelope = StageEnvelope::pending(StageId::DemoCall);
    envelope.status = status;
    envelope
}

mod stage_id;
mod try_transition;
mod valid_transitions;
