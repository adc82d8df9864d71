//! Interview lifecycle coordination between an employer and a provider.
//!
//! The transition table in [`transitions`] is the single source of truth for
//! which party may move an interview between states; the service wires it to
//! the store's conditional write and the notification boundary.

pub mod domain;
pub mod locations;
pub mod repository;
pub mod router;
pub mod service;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, ActorRole, Feedback, FeedbackDraft, Interview, InterviewId, InterviewRequest,
    InterviewStatus, InterviewView, OfficeLocationId, PartyId,
};
pub use locations::{DirectoryError, OfficeLocation, OfficeLocationDirectory};
pub use repository::{
    InterviewNotification, InterviewStore, NotificationError, NotificationPublisher, StoreError,
};
pub use router::interview_router;
pub use service::{InterviewLifecycleService, InterviewServiceError};
pub use transitions::{
    AuthorizationError, StateConflict, TransitionCommand, TransitionError, TransitionKind,
    ValidationError,
};
