use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDate, NaiveTime, Utc};

use crate::workflows::interviews::domain::{
    Actor, FeedbackDraft, Interview, InterviewId, InterviewRequest, InterviewStatus,
    OfficeLocationId, PartyId,
};
use crate::workflows::interviews::locations::{
    DirectoryError, OfficeLocation, OfficeLocationDirectory,
};
use crate::workflows::interviews::repository::{
    InterviewNotification, InterviewStore, NotificationError, NotificationPublisher, StoreError,
};
use crate::workflows::interviews::service::InterviewLifecycleService;

pub(super) const EMPLOYER: &str = "emp-100";
pub(super) const PROVIDER: &str = "pro-200";
pub(super) const OFFICE: &str = "office-7";

pub(super) fn employer() -> Actor {
    Actor::employer(EMPLOYER)
}

pub(super) fn provider() -> Actor {
    Actor::provider(PROVIDER)
}

pub(super) fn tomorrow() -> NaiveDate {
    Local::now().date_naive() + Duration::days(1)
}

pub(super) fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

pub(super) fn ten_am() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).expect("valid time")
}

pub(super) fn booking() -> InterviewRequest {
    InterviewRequest {
        provider_id: PartyId(PROVIDER.to_string()),
        office_location_id: OfficeLocationId(OFFICE.to_string()),
        scheduled_date: tomorrow(),
        scheduled_time: ten_am(),
        duration_minutes: 30,
        notes: String::new(),
    }
}

pub(super) fn feedback_draft() -> FeedbackDraft {
    FeedbackDraft {
        rating: 5,
        comments: "great".to_string(),
        strengths: Some("communication".to_string()),
        improvements: None,
        would_hire_again: true,
    }
}

/// Snapshot fixture for exercising the pure transition table without a
/// service in front of it.
pub(super) fn interview_in(status: InterviewStatus) -> Interview {
    let stamp = Utc::now();
    Interview {
        id: InterviewId("ivw-fixture".to_string()),
        employer_id: PartyId(EMPLOYER.to_string()),
        provider_id: PartyId(PROVIDER.to_string()),
        office_location_id: OfficeLocationId(OFFICE.to_string()),
        scheduled_date: tomorrow(),
        scheduled_time: ten_am(),
        duration_minutes: 30,
        notes: String::new(),
        status,
        cancellation_reason: None,
        reschedule_reason: None,
        feedback: None,
        is_hired: false,
        version: 1,
        created_at: stamp,
        updated_at: stamp,
        confirmed_at: None,
        completed_at: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<HashMap<InterviewId, Interview>>>,
}

impl InterviewStore for MemoryStore {
    fn insert(&self, interview: Interview) -> Result<Interview, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&interview.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(interview.id.clone(), interview.clone());
        Ok(interview)
    }

    fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, interview: Interview, expected_version: u64) -> Result<Interview, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let current = guard.get(&interview.id).ok_or(StoreError::NotFound)?;
        if current.version != expected_version {
            return Err(StoreError::VersionConflict);
        }
        guard.insert(interview.id.clone(), interview.clone());
        Ok(interview)
    }

    fn for_party(&self, party: &PartyId) -> Result<Vec<Interview>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .filter(|interview| {
                interview.employer_id == *party || interview.provider_id == *party
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<InterviewNotification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<InterviewNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifier {
    fn publish(&self, notification: InterviewNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Publisher that always fails, for asserting that dispatch failures never
/// roll back a committed transition.
pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notification: InterviewNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

#[derive(Clone)]
pub(super) struct StaticOffices {
    offices: Vec<OfficeLocation>,
}

impl Default for StaticOffices {
    fn default() -> Self {
        Self {
            offices: vec![OfficeLocation {
                id: OfficeLocationId(OFFICE.to_string()),
                name: "Downtown Office".to_string(),
                address: "12 Main Street".to_string(),
                hours: "Mon-Fri 09:00-17:00".to_string(),
            }],
        }
    }
}

impl OfficeLocationDirectory for StaticOffices {
    fn get(&self, id: &OfficeLocationId) -> Result<Option<OfficeLocation>, DirectoryError> {
        Ok(self.offices.iter().find(|office| office.id == *id).cloned())
    }

    fn active(&self) -> Result<Vec<OfficeLocation>, DirectoryError> {
        Ok(self.offices.clone())
    }
}

pub(super) type TestService = InterviewLifecycleService<MemoryStore, StaticOffices, MemoryNotifier>;

pub(super) fn build_service() -> (TestService, Arc<MemoryStore>, Arc<MemoryNotifier>) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let offices = Arc::new(StaticOffices::default());
    let service = InterviewLifecycleService::new(store.clone(), offices, notifier.clone());
    (service, store, notifier)
}

/// Drives a fresh interview to the requested status through the service so
/// every trajectory in tests is a legal one.
pub(super) fn interview_at(service: &TestService, status: InterviewStatus) -> Interview {
    let interview = service
        .create(&employer(), booking())
        .expect("create succeeds");
    if status == InterviewStatus::Pending {
        return interview;
    }

    let confirmed = service
        .confirm(&interview.id, &provider())
        .expect("confirm succeeds");
    if status == InterviewStatus::Confirmed {
        return confirmed;
    }

    if status == InterviewStatus::Cancelled {
        return service
            .cancel(&interview.id, &employer(), "schedule conflict".to_string())
            .expect("cancel succeeds");
    }

    service
        .complete(&interview.id, &provider())
        .expect("complete succeeds")
}
