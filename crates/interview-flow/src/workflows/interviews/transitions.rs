//! The authoritative transition rules for the interview lifecycle.
//!
//! Every caller (HTTP router, CLI demo, tests) goes through [`authorize`] and
//! [`apply`]; no transition legality is decided anywhere else.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ActorRole, Feedback, FeedbackDraft, Interview, InterviewStatus, PartyId};

/// Named lifecycle operations, including the two post-completion
/// sub-transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Create,
    Confirm,
    Cancel,
    Reschedule,
    Complete,
    SubmitFeedback,
    MarkHired,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 7] = [
        TransitionKind::Create,
        TransitionKind::Confirm,
        TransitionKind::Cancel,
        TransitionKind::Reschedule,
        TransitionKind::Complete,
        TransitionKind::SubmitFeedback,
        TransitionKind::MarkHired,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            TransitionKind::Create => "create",
            TransitionKind::Confirm => "confirm",
            TransitionKind::Cancel => "cancel",
            TransitionKind::Reschedule => "reschedule",
            TransitionKind::Complete => "complete",
            TransitionKind::SubmitFeedback => "submit_feedback",
            TransitionKind::MarkHired => "mark_hired",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Denials raised before any interview state is read or written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("{role} is not permitted to {transition} an interview")]
    RoleForbidden {
        role: ActorRole,
        transition: TransitionKind,
    },
    #[error("actor is not a party to this interview")]
    NotParticipant,
}

/// Permission matrix, independent of business state.
pub const fn permitted(role: ActorRole, transition: TransitionKind) -> bool {
    match transition {
        TransitionKind::Create
        | TransitionKind::SubmitFeedback
        | TransitionKind::MarkHired => matches!(role, ActorRole::Employer),
        TransitionKind::Confirm => matches!(role, ActorRole::Provider),
        TransitionKind::Cancel | TransitionKind::Reschedule | TransitionKind::Complete => true,
    }
}

pub fn authorize(role: ActorRole, transition: TransitionKind) -> Result<(), AuthorizationError> {
    if permitted(role, transition) {
        Ok(())
    } else {
        Err(AuthorizationError::RoleForbidden { role, transition })
    }
}

/// Malformed or out-of-range input; correctable by the caller, never retried
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("scheduled slot {scheduled} is not in the future")]
    PastSchedule { scheduled: NaiveDateTime },
    #[error("cancellation reason must not be empty")]
    MissingCancellationReason,
    #[error("reschedule reason must not be empty")]
    MissingRescheduleReason,
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("feedback comments must not be empty")]
    MissingComments,
}

/// Persisted state does not satisfy the transition's precondition. The caller
/// must reload the interview before deciding whether to resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateConflict {
    #[error("cannot {attempted} an interview that is {current}")]
    InvalidTransition {
        current: InterviewStatus,
        attempted: TransitionKind,
    },
    #[error("feedback already submitted for this interview")]
    FeedbackAlreadySubmitted,
    #[error("provider already marked as hired for this interview")]
    AlreadyMarkedHired,
    #[error("interview modified concurrently")]
    VersionConflict,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] StateConflict),
}

/// A requested transition together with its payload. Create is handled
/// separately by the service since there is no prior state to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionCommand {
    Confirm,
    Cancel {
        reason: String,
    },
    Reschedule {
        date: NaiveDate,
        time: NaiveTime,
        reason: String,
    },
    Complete,
    SubmitFeedback {
        draft: FeedbackDraft,
        submitted_by: PartyId,
    },
    MarkHired,
}

impl TransitionCommand {
    pub const fn kind(&self) -> TransitionKind {
        match self {
            TransitionCommand::Confirm => TransitionKind::Confirm,
            TransitionCommand::Cancel { .. } => TransitionKind::Cancel,
            TransitionCommand::Reschedule { .. } => TransitionKind::Reschedule,
            TransitionCommand::Complete => TransitionKind::Complete,
            TransitionCommand::SubmitFeedback { .. } => TransitionKind::SubmitFeedback,
            TransitionCommand::MarkHired => TransitionKind::MarkHired,
        }
    }
}

/// Rejects appointment slots that are not strictly in the future relative to
/// the wall clock read when the request is processed.
pub fn validate_schedule(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), ValidationError> {
    let scheduled = date.and_time(time);
    if scheduled <= now {
        return Err(ValidationError::PastSchedule { scheduled });
    }
    Ok(())
}

fn require_status(
    interview: &Interview,
    attempted: TransitionKind,
    allowed: &[InterviewStatus],
) -> Result<(), StateConflict> {
    if allowed.contains(&interview.status) {
        Ok(())
    } else {
        Err(StateConflict::InvalidTransition {
            current: interview.status,
            attempted,
        })
    }
}

fn require_reason(reason: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(missing);
    }
    Ok(trimmed.to_string())
}

/// Applies a transition to a snapshot, returning the mutated copy with its
/// version bumped, or the first failure encountered. Status preconditions are
/// checked before payload validation so a conflicting request reports the
/// state problem rather than an incidental payload problem.
pub fn apply(
    interview: &Interview,
    command: &TransitionCommand,
    now: DateTime<Local>,
) -> Result<Interview, TransitionError> {
    let stamp = now.with_timezone(&Utc);
    let mut next = interview.clone();

    match command {
        TransitionCommand::Confirm => {
            require_status(interview, TransitionKind::Confirm, &[InterviewStatus::Pending])?;
            next.status = InterviewStatus::Confirmed;
            next.confirmed_at = Some(stamp);
        }
        TransitionCommand::Cancel { reason } => {
            require_status(
                interview,
                TransitionKind::Cancel,
                &[InterviewStatus::Pending, InterviewStatus::Confirmed],
            )?;
            let reason = require_reason(reason, ValidationError::MissingCancellationReason)?;
            next.status = InterviewStatus::Cancelled;
            next.cancellation_reason = Some(reason);
        }
        TransitionCommand::Reschedule { date, time, reason } => {
            require_status(
                interview,
                TransitionKind::Reschedule,
                &[InterviewStatus::Pending, InterviewStatus::Confirmed],
            )?;
            validate_schedule(*date, *time, now.naive_local())?;
            let reason = require_reason(reason, ValidationError::MissingRescheduleReason)?;
            // Overwrites the prior slot and reason, and keeps the current
            // status: a confirmed interview stays confirmed.
            next.scheduled_date = *date;
            next.scheduled_time = *time;
            next.reschedule_reason = Some(reason);
        }
        TransitionCommand::Complete => {
            require_status(
                interview,
                TransitionKind::Complete,
                &[InterviewStatus::Confirmed],
            )?;
            next.status = InterviewStatus::Completed;
            next.completed_at = Some(stamp);
        }
        TransitionCommand::SubmitFeedback {
            draft,
            submitted_by,
        } => {
            require_status(
                interview,
                TransitionKind::SubmitFeedback,
                &[InterviewStatus::Completed],
            )?;
            if interview.feedback.is_some() {
                return Err(StateConflict::FeedbackAlreadySubmitted.into());
            }
            if !(1..=5).contains(&draft.rating) {
                return Err(ValidationError::RatingOutOfRange(draft.rating).into());
            }
            if draft.comments.trim().is_empty() {
                return Err(ValidationError::MissingComments.into());
            }
            next.feedback = Some(Feedback {
                rating: draft.rating,
                comments: draft.comments.trim().to_string(),
                strengths: draft.strengths.clone(),
                improvements: draft.improvements.clone(),
                would_hire_again: draft.would_hire_again,
                submitted_at: stamp,
                submitted_by: submitted_by.clone(),
            });
        }
        TransitionCommand::MarkHired => {
            require_status(
                interview,
                TransitionKind::MarkHired,
                &[InterviewStatus::Completed],
            )?;
            if interview.is_hired {
                return Err(StateConflict::AlreadyMarkedHired.into());
            }
            next.is_hired = true;
        }
    }

    next.version = interview.version + 1;
    next.updated_at = stamp;
    Ok(next)
}
