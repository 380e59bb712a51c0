use crate::models::stage::StageStatus;

#[test]
fn test_valid_transitions_agree_with_can_transition_to() {
    let all = [
        StageStatus::Pending,
        StageStatus::InProgress,
        StageStatus::ActionRequired,
        StageStatus::Completed,
        StageStatus::Skipped,
    ];

    for from in all {
        let valid = from.valid_transitions();
        for to in all {
            if from == to {
                continue;
            }
            assert_eq!(
                valid.contains(&to),
                from.can_transition_to(&to),
                "{from} -> {to}"
            );
        }
    }
}

#[test]
fn test_terminal_states_have_no_transitions() {
    assert!(StageStatus::Completed.valid_transitions().is_empty());
    assert!(StageStatus::Skipped.valid_transitions().is_empty());
    assert!(StageStatus::Completed.is_terminal());
    assert!(!StageStatus::ActionRequired.is_terminal());
}
