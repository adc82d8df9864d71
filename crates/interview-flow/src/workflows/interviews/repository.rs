use serde::{Deserialize, Serialize};

use super::domain::{Interview, InterviewId, PartyId};
use super::transitions::TransitionKind;

/// Storage abstraction so the lifecycle service can be exercised in
/// isolation. `update` is a conditional write: it commits only when the
/// stored version still matches `expected_version`, making the store the
/// sole arbiter of ordering for racing callers.
pub trait InterviewStore: Send + Sync {
    fn insert(&self, interview: Interview) -> Result<Interview, StoreError>;
    fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, StoreError>;
    fn update(&self, interview: Interview, expected_version: u64) -> Result<Interview, StoreError>;
    fn for_party(&self, party: &PartyId) -> Result<Vec<Interview>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("interview already exists")]
    Conflict,
    #[error("interview not found")]
    NotFound,
    #[error("stored version no longer matches the loaded snapshot")]
    VersionConflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outward signal addressed to the counterparty of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewNotification {
    pub recipient: PartyId,
    pub interview_id: InterviewId,
    pub transition: TransitionKind,
}

/// Trait describing the notification collaborator boundary. Delivery is
/// fire-and-forget from the core's perspective; a failed publish never rolls
/// back the committed transition.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: InterviewNotification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
