use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of the follow-up reminder track.
///
/// State machine transitions:
/// - `NotEnrolled` -> `Scheduled` (follow-up email sent) | `AccessReceived`
/// - `Scheduled` -> `Enrolled` (operator, once the delay has elapsed) | `AccessReceived`
/// - `Enrolled` -> `UnenrolledResponse` | `UnenrolledAccess` | `AccessReceived`
/// - `UnenrolledResponse` | `UnenrolledAccess` -> `AccessReceived`
/// - `AccessReceived` is a terminal state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    #[default]
    NotEnrolled,
    Scheduled,
    Enrolled,
    /// Contact replied; the sequence was stopped.
    UnenrolledResponse,
    /// Stopped because access is being granted outside the sequence.
    UnenrolledAccess,
    AccessReceived,
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderStatus::NotEnrolled => write!(f, "not_enrolled"),
            ReminderStatus::Scheduled => write!(f, "scheduled"),
            ReminderStatus::Enrolled => write!(f, "enrolled"),
            ReminderStatus::UnenrolledResponse => write!(f, "unenrolled_response"),
            ReminderStatus::UnenrolledAccess => write!(f, "unenrolled_access"),
            ReminderStatus::AccessReceived => write!(f, "access_received"),
        }
    }
}

/// Accounting platform the deal needs ledger access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    QuickBooks,
    Xero,
    /// No automated reminder sequence exists for this platform.
    Other,
}

impl Platform {
    /// The reminder sequence that requests access on this platform.
    pub fn sequence_type(self) -> Option<SequenceType> {
        match self {
            Platform::QuickBooks => Some(SequenceType::QuickBooksAccess),
            Platform::Xero => Some(SequenceType::XeroAccess),
            Platform::Other => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::QuickBooks => write!(f, "quickbooks"),
            Platform::Xero => write!(f, "xero"),
            Platform::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quickbooks" | "qbo" => Ok(Platform::QuickBooks),
            "xero" => Ok(Platform::Xero),
            "other" => Ok(Platform::Other),
            _ => anyhow::bail!("Invalid platform: {s}. Use: quickbooks, xero, other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceType {
    QuickBooksAccess,
    XeroAccess,
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceType::QuickBooksAccess => write!(f, "quickbooks-access"),
            SequenceType::XeroAccess => write!(f, "xero-access"),
        }
    }
}

/// Who enrolled the contact. Enrollment is always operator-confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentSource {
    #[default]
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnenrollReason {
    ContactResponded,
    AccessReceived,
}

impl UnenrollReason {
    pub(crate) fn status(self) -> ReminderStatus {
        match self {
            UnenrollReason::ContactResponded => ReminderStatus::UnenrolledResponse,
            UnenrollReason::AccessReceived => ReminderStatus::UnenrolledAccess,
        }
    }
}

impl std::fmt::Display for UnenrollReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnenrollReason::ContactResponded => write!(f, "contact_responded"),
            UnenrollReason::AccessReceived => write!(f, "access_received"),
        }
    }
}

impl std::str::FromStr for UnenrollReason {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "contact_responded" | "response" => Ok(UnenrollReason::ContactResponded),
            "access_received" | "access" => Ok(UnenrollReason::AccessReceived),
            _ => anyhow::bail!("Invalid unenroll reason: {s}. Use: response, access"),
        }
    }
}

/// Payload of the `reminder-sequence` stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderState {
    pub status: ReminderStatus,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub sequence_type: Option<SequenceType>,
    /// When the prerequisite follow-up email went out.
    #[serde(default)]
    pub email_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_enrollment_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub enrolled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub enrolled_by: Option<EnrollmentSource>,
    #[serde(default)]
    pub unenrolled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unenrollment_reason: Option<UnenrollReason>,
    #[serde(default)]
    pub access_received_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub access_platform: Option<Platform>,
    #[serde(default)]
    pub contact_responded_at: Option<DateTime<Utc>>,
}
