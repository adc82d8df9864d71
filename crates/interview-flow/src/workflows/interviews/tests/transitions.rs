use chrono::Local;

use super::common::*;
use crate::workflows::interviews::domain::{InterviewStatus, PartyId};
use crate::workflows::interviews::transitions::{
    apply, validate_schedule, StateConflict, TransitionCommand, TransitionError, TransitionKind,
    ValidationError,
};

fn employer_party() -> PartyId {
    PartyId(EMPLOYER.to_string())
}

#[test]
fn confirm_moves_pending_to_confirmed() {
    let interview = interview_in(InterviewStatus::Pending);
    let next = apply(&interview, &TransitionCommand::Confirm, Local::now())
        .expect("pending interviews can be confirmed");

    assert_eq!(next.status, InterviewStatus::Confirmed);
    assert!(next.confirmed_at.is_some());
    assert_eq!(next.version, interview.version + 1);
}

#[test]
fn confirm_rejects_every_other_status() {
    for status in [
        InterviewStatus::Confirmed,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
    ] {
        let interview = interview_in(status);
        let err = apply(&interview, &TransitionCommand::Confirm, Local::now())
            .expect_err("only pending interviews can be confirmed");
        assert_eq!(
            err,
            TransitionError::Conflict(StateConflict::InvalidTransition {
                current: status,
                attempted: TransitionKind::Confirm,
            })
        );
    }
}

#[test]
fn cancel_requires_a_reason() {
    let interview = interview_in(InterviewStatus::Pending);
    let err = apply(
        &interview,
        &TransitionCommand::Cancel {
            reason: "   ".to_string(),
        },
        Local::now(),
    )
    .expect_err("blank cancellation reason is rejected");
    assert_eq!(
        err,
        TransitionError::Validation(ValidationError::MissingCancellationReason)
    );
}

#[test]
fn cancel_records_reason_from_pending_and_confirmed() {
    for status in [InterviewStatus::Pending, InterviewStatus::Confirmed] {
        let interview = interview_in(status);
        let next = apply(
            &interview,
            &TransitionCommand::Cancel {
                reason: "schedule conflict".to_string(),
            },
            Local::now(),
        )
        .expect("cancel succeeds");
        assert_eq!(next.status, InterviewStatus::Cancelled);
        assert_eq!(
            next.cancellation_reason.as_deref(),
            Some("schedule conflict")
        );
    }
}

#[test]
fn cancel_conflicts_from_terminal_states() {
    for status in [InterviewStatus::Completed, InterviewStatus::Cancelled] {
        let interview = interview_in(status);
        let err = apply(
            &interview,
            &TransitionCommand::Cancel {
                reason: "too late".to_string(),
            },
            Local::now(),
        )
        .expect_err("cancel is not legal here");
        assert!(matches!(
            err,
            TransitionError::Conflict(StateConflict::InvalidTransition { .. })
        ));
    }
}

#[test]
fn reschedule_keeps_current_status() {
    let interview = interview_in(InterviewStatus::Confirmed);
    let next = apply(
        &interview,
        &TransitionCommand::Reschedule {
            date: tomorrow(),
            time: ten_am(),
            reason: "office move".to_string(),
        },
        Local::now(),
    )
    .expect("reschedule succeeds");

    assert_eq!(next.status, InterviewStatus::Confirmed);
    assert_eq!(next.reschedule_reason.as_deref(), Some("office move"));
}

#[test]
fn reschedule_overwrites_prior_reason() {
    let interview = interview_in(InterviewStatus::Pending);
    let first = apply(
        &interview,
        &TransitionCommand::Reschedule {
            date: tomorrow(),
            time: ten_am(),
            reason: "first".to_string(),
        },
        Local::now(),
    )
    .expect("first reschedule");
    let second = apply(
        &first,
        &TransitionCommand::Reschedule {
            date: tomorrow(),
            time: ten_am(),
            reason: "second".to_string(),
        },
        Local::now(),
    )
    .expect("second reschedule");

    assert_eq!(second.reschedule_reason.as_deref(), Some("second"));
}

#[test]
fn reschedule_rejects_past_slots() {
    let interview = interview_in(InterviewStatus::Pending);
    let err = apply(
        &interview,
        &TransitionCommand::Reschedule {
            date: yesterday(),
            time: ten_am(),
            reason: "conflict".to_string(),
        },
        Local::now(),
    )
    .expect_err("past slots are rejected");
    assert!(matches!(
        err,
        TransitionError::Validation(ValidationError::PastSchedule { .. })
    ));
}

#[test]
fn schedule_validation_is_strict() {
    let now = Local::now().naive_local();
    // The exact current instant is not "strictly future".
    assert!(validate_schedule(now.date(), now.time(), now).is_err());
}

#[test]
fn complete_requires_confirmed() {
    let confirmed = interview_in(InterviewStatus::Confirmed);
    let next = apply(&confirmed, &TransitionCommand::Complete, Local::now())
        .expect("confirmed interviews can complete");
    assert_eq!(next.status, InterviewStatus::Completed);
    assert!(next.completed_at.is_some());

    let pending = interview_in(InterviewStatus::Pending);
    let err = apply(&pending, &TransitionCommand::Complete, Local::now())
        .expect_err("pending interviews cannot complete");
    assert_eq!(
        err,
        TransitionError::Conflict(StateConflict::InvalidTransition {
            current: InterviewStatus::Pending,
            attempted: TransitionKind::Complete,
        })
    );
}

#[test]
fn feedback_rating_must_be_in_range() {
    let interview = interview_in(InterviewStatus::Completed);
    for rating in [0, 6] {
        let mut draft = feedback_draft();
        draft.rating = rating;
        let err = apply(
            &interview,
            &TransitionCommand::SubmitFeedback {
                draft,
                submitted_by: employer_party(),
            },
            Local::now(),
        )
        .expect_err("out-of-range rating is rejected");
        assert_eq!(
            err,
            TransitionError::Validation(ValidationError::RatingOutOfRange(rating))
        );
    }
}

#[test]
fn feedback_requires_comments() {
    let interview = interview_in(InterviewStatus::Completed);
    let mut draft = feedback_draft();
    draft.comments = "  ".to_string();
    let err = apply(
        &interview,
        &TransitionCommand::SubmitFeedback {
            draft,
            submitted_by: employer_party(),
        },
        Local::now(),
    )
    .expect_err("empty comments are rejected");
    assert_eq!(
        err,
        TransitionError::Validation(ValidationError::MissingComments)
    );
}

#[test]
fn feedback_is_exactly_once() {
    let interview = interview_in(InterviewStatus::Completed);
    let with_feedback = apply(
        &interview,
        &TransitionCommand::SubmitFeedback {
            draft: feedback_draft(),
            submitted_by: employer_party(),
        },
        Local::now(),
    )
    .expect("first submission succeeds");

    let stored = with_feedback.feedback.as_ref().expect("feedback present");
    assert_eq!(stored.rating, 5);
    assert_eq!(stored.submitted_by, employer_party());
    assert_eq!(with_feedback.status, InterviewStatus::Completed);

    let err = apply(
        &with_feedback,
        &TransitionCommand::SubmitFeedback {
            draft: feedback_draft(),
            submitted_by: employer_party(),
        },
        Local::now(),
    )
    .expect_err("second submission conflicts");
    assert_eq!(
        err,
        TransitionError::Conflict(StateConflict::FeedbackAlreadySubmitted)
    );
}

#[test]
fn mark_hired_is_exactly_once() {
    let interview = interview_in(InterviewStatus::Completed);
    let hired = apply(&interview, &TransitionCommand::MarkHired, Local::now())
        .expect("first mark succeeds");
    assert!(hired.is_hired);

    let err = apply(&hired, &TransitionCommand::MarkHired, Local::now())
        .expect_err("second mark conflicts");
    assert_eq!(
        err,
        TransitionError::Conflict(StateConflict::AlreadyMarkedHired)
    );
}

#[test]
fn status_conflict_is_reported_before_payload_validation() {
    // A cancelled interview with a blank reason reports the state problem,
    // not the payload problem.
    let interview = interview_in(InterviewStatus::Cancelled);
    let err = apply(
        &interview,
        &TransitionCommand::Cancel {
            reason: String::new(),
        },
        Local::now(),
    )
    .expect_err("cancelled is terminal");
    assert!(matches!(
        err,
        TransitionError::Conflict(StateConflict::InvalidTransition { .. })
    ));
}

#[test]
fn command_kinds_match_their_transitions() {
    assert_eq!(TransitionCommand::Confirm.kind(), TransitionKind::Confirm);
    assert_eq!(
        TransitionCommand::MarkHired.kind(),
        TransitionKind::MarkHired
    );
    assert_eq!(
        TransitionCommand::Cancel {
            reason: "x".to_string()
        }
        .kind(),
        TransitionKind::Cancel
    );
}
