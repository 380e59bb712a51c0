use std::str::FromStr;

use crate::models::stage::StageId;

#[test]
fn test_stage_order_follows_declaration() {
    assert!(StageId::DemoCall < StageId::SalesIntake);
    assert!(StageId::GlReview < StageId::GlReviewComparison);
    assert_eq!(StageId::first(), StageId::DemoCall);
    assert_eq!(StageId::last(), StageId::GlReviewComparison);
}

#[test]
fn test_next_walks_the_fixed_order() {
    let mut walked = vec![StageId::first()];
    while let Some(next) = walked.last().and_then(|s| s.next()) {
        walked.push(next);
    }
    assert_eq!(walked, StageId::ALL.to_vec());
    assert_eq!(StageId::GlReviewComparison.next(), None);
}

#[test]
fn test_position() {
    assert_eq!(StageId::DemoCall.position(), 0);
    assert_eq!(StageId::ReminderSequence.position(), 3);
    assert_eq!(StageId::GlReviewComparison.position(), 6);
}

#[test]
fn test_from_str_roundtrips_display() {
    for stage in StageId::ALL {
        assert_eq!(StageId::from_str(&stage.to_string()).unwrap(), stage);
    }
    assert_eq!(
        StageId::from_str("GL-Review").unwrap(),
        StageId::GlReview
    );
}

#[test]
fn test_from_str_unknown_lists_choices() {
    let err = StageId::from_str("pricing").unwrap_err().to_string();
    assert!(err.contains("Unknown stage: pricing"));
    assert!(err.contains("gl-review-comparison"));
}

#[test]
fn test_serde_uses_kebab_case() {
    let yaml = serde_yaml::to_string(&StageId::FollowUpEmail).unwrap();
    assert_eq!(yaml.trim(), "follow-up-email");
    let parsed: StageId = serde_yaml::from_str("gl-review-comparison").unwrap();
    assert_eq!(parsed, StageId::GlReviewComparison);
}
