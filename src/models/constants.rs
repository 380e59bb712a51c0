/// Business days between the follow-up email and the point where the
/// operator is prompted to enroll the contact in the reminder sequence.
pub const DEFAULT_ENROLLMENT_DELAY_BUSINESS_DAYS: u32 = 3;

/// Display thresholds for the status dashboard.
pub mod display {
    /// Enrollment prompts left unanswered for at least this many business
    /// days past the delay are highlighted.
    pub const OVERDUE_ENROLLMENT_BUSINESS_DAYS: u32 = 2;
}
