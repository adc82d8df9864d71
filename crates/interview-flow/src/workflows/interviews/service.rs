use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveTime, Utc};
use tracing::{info, warn};

use super::domain::{
    Actor, FeedbackDraft, Interview, InterviewId, InterviewRequest, InterviewStatus,
    OfficeLocationId, PartyId,
};
use super::locations::{DirectoryError, OfficeLocation, OfficeLocationDirectory};
use super::repository::{
    InterviewNotification, InterviewStore, NotificationPublisher, StoreError,
};
use super::transitions::{
    self, AuthorizationError, StateConflict, TransitionCommand, TransitionError, TransitionKind,
    ValidationError,
};

/// Service orchestrating the lifecycle pipeline: load, authorize, validate,
/// conditional write, notify the counterparty.
pub struct InterviewLifecycleService<S, D, N> {
    store: Arc<S>,
    offices: Arc<D>,
    notifier: Arc<N>,
}

static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_interview_id() -> InterviewId {
    let id = INTERVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InterviewId(format!("ivw-{id:06}"))
}

impl<S, D, N> InterviewLifecycleService<S, D, N>
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(store: Arc<S>, offices: Arc<D>, notifier: Arc<N>) -> Self {
        Self {
            store,
            offices,
            notifier,
        }
    }

    /// Book a new interview on behalf of the acting employer. The record
    /// starts pending and the provider is notified of the request.
    pub fn create(
        &self,
        actor: &Actor,
        request: InterviewRequest,
    ) -> Result<Interview, InterviewServiceError> {
        transitions::authorize(actor.role, TransitionKind::Create)?;

        let now = Local::now();
        transitions::validate_schedule(
            request.scheduled_date,
            request.scheduled_time,
            now.naive_local(),
        )?;

        if self.offices.get(&request.office_location_id)?.is_none() {
            return Err(InterviewServiceError::UnknownOffice(
                request.office_location_id,
            ));
        }

        let stamp = now.with_timezone(&Utc);
        let interview = Interview {
            id: next_interview_id(),
            employer_id: actor.id.clone(),
            provider_id: request.provider_id,
            office_location_id: request.office_location_id,
            scheduled_date: request.scheduled_date,
            scheduled_time: request.scheduled_time,
            duration_minutes: request.duration_minutes,
            notes: request.notes,
            status: InterviewStatus::Pending,
            cancellation_reason: None,
            reschedule_reason: None,
            feedback: None,
            is_hired: false,
            version: 1,
            created_at: stamp,
            updated_at: stamp,
            confirmed_at: None,
            completed_at: None,
        };

        let stored = self.store.insert(interview)?;
        info!(interview = %stored.id, employer = %stored.employer_id, "interview requested");
        self.dispatch(&stored, stored.provider_id.clone(), TransitionKind::Create);
        Ok(stored)
    }

    pub fn confirm(
        &self,
        id: &InterviewId,
        actor: &Actor,
    ) -> Result<Interview, InterviewServiceError> {
        self.transition(id, actor, TransitionCommand::Confirm)
    }

    pub fn cancel(
        &self,
        id: &InterviewId,
        actor: &Actor,
        reason: String,
    ) -> Result<Interview, InterviewServiceError> {
        self.transition(id, actor, TransitionCommand::Cancel { reason })
    }

    pub fn reschedule(
        &self,
        id: &InterviewId,
        actor: &Actor,
        date: NaiveDate,
        time: NaiveTime,
        reason: String,
    ) -> Result<Interview, InterviewServiceError> {
        self.transition(id, actor, TransitionCommand::Reschedule { date, time, reason })
    }

    pub fn complete(
        &self,
        id: &InterviewId,
        actor: &Actor,
    ) -> Result<Interview, InterviewServiceError> {
        self.transition(id, actor, TransitionCommand::Complete)
    }

    pub fn submit_feedback(
        &self,
        id: &InterviewId,
        actor: &Actor,
        draft: FeedbackDraft,
    ) -> Result<Interview, InterviewServiceError> {
        self.transition(
            id,
            actor,
            TransitionCommand::SubmitFeedback {
                draft,
                submitted_by: actor.id.clone(),
            },
        )
    }

    pub fn mark_hired(
        &self,
        id: &InterviewId,
        actor: &Actor,
    ) -> Result<Interview, InterviewServiceError> {
        self.transition(id, actor, TransitionCommand::MarkHired)
    }

    pub fn get(&self, id: &InterviewId) -> Result<Interview, InterviewServiceError> {
        self.store
            .fetch(id)?
            .ok_or_else(|| InterviewServiceError::NotFound(id.clone()))
    }

    /// Interviews in which the given party is either side, newest first.
    pub fn for_party(&self, party: &PartyId) -> Result<Vec<Interview>, InterviewServiceError> {
        let mut interviews = self.store.for_party(party)?;
        interviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(interviews)
    }

    pub fn office_locations(&self) -> Result<Vec<OfficeLocation>, InterviewServiceError> {
        Ok(self.offices.active()?)
    }

    fn transition(
        &self,
        id: &InterviewId,
        actor: &Actor,
        command: TransitionCommand,
    ) -> Result<Interview, InterviewServiceError> {
        let kind = command.kind();

        // Role denial short-circuits before any state read.
        transitions::authorize(actor.role, kind)?;

        let current = self
            .store
            .fetch(id)?
            .ok_or_else(|| InterviewServiceError::NotFound(id.clone()))?;

        if !current.involves(actor) {
            return Err(AuthorizationError::NotParticipant.into());
        }

        let next = transitions::apply(&current, &command, Local::now())?;

        let stored = match self.store.update(next, current.version) {
            Ok(stored) => stored,
            Err(StoreError::VersionConflict) => {
                return Err(StateConflict::VersionConflict.into());
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            interview = %stored.id,
            transition = kind.label(),
            status = stored.status.label(),
            version = stored.version,
            "interview transition committed"
        );
        self.dispatch(&stored, stored.counterparty(&actor.id), kind);
        Ok(stored)
    }

    /// Fire-and-forget dispatch; failures are logged and never surfaced to
    /// the caller once the write has committed.
    fn dispatch(&self, interview: &Interview, recipient: PartyId, transition: TransitionKind) {
        let notification = InterviewNotification {
            recipient,
            interview_id: interview.id.clone(),
            transition,
        };
        if let Err(err) = self.notifier.publish(notification) {
            warn!(interview = %interview.id, error = %err, "notification dispatch failed");
        }
    }
}

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    Conflict(#[from] StateConflict),
    #[error("interview {0} not found")]
    NotFound(InterviewId),
    #[error("office location {0} not found")]
    UnknownOffice(OfficeLocationId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl From<TransitionError> for InterviewServiceError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::Validation(err) => Self::Validation(err),
            TransitionError::Conflict(err) => Self::Conflict(err),
        }
    }
}
