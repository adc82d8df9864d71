use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use interview_flow::workflows::interviews::{
    DirectoryError, Interview, InterviewId, InterviewNotification, InterviewStore,
    NotificationError, NotificationPublisher, OfficeLocation, OfficeLocationDirectory,
    OfficeLocationId, PartyId, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInterviewStore {
    records: Arc<Mutex<HashMap<InterviewId, Interview>>>,
}

impl InterviewStore for InMemoryInterviewStore {
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

/// Dispatch stub standing in for the real notification collaborator; events
/// are retained so the demo can print what would have been delivered.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<InterviewNotification>>>,
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<InterviewNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: InterviewNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Seeded office directory; the real deployment would back this with the
/// reference-data service.
#[derive(Clone)]
pub(crate) struct StaticOfficeDirectory {
    offices: Vec<OfficeLocation>,
}

impl Default for StaticOfficeDirectory {
    fn default() -> Self {
        Self {
            offices: vec![
                OfficeLocation {
                    id: OfficeLocationId("office-1".to_string()),
                    name: "Downtown Office".to_string(),
                    address: "12 Main Street".to_string(),
                    hours: "Mon-Fri 09:00-17:00".to_string(),
                },
                OfficeLocation {
                    id: OfficeLocationId("office-2".to_string()),
                    name: "Riverside Branch".to_string(),
                    address: "48 Quay Road".to_string(),
                    hours: "Mon-Sat 08:00-18:00".to_string(),
                },
            ],
        }
    }
}

impl OfficeLocationDirectory for StaticOfficeDirectory {
    fn get(&self, id: &OfficeLocationId) -> Result<Option<OfficeLocation>, DirectoryError> {
        Ok(self.offices.iter().find(|office| office.id == *id).cloned())
    }

    fn active(&self) -> Result<Vec<OfficeLocation>, DirectoryError> {
        Ok(self.offices.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local, NaiveTime, Utc};
    use interview_flow::workflows::interviews::InterviewStatus;

    fn interview(id: &str) -> Interview {
        let stamp = Utc::now();
        Interview {
            id: InterviewId(id.to_string()),
            employer_id: PartyId("emp-1".to_string()),
            provider_id: PartyId("pro-1".to_string()),
            office_location_id: OfficeLocationId("office-1".to_string()),
            scheduled_date: Local::now().date_naive() + Duration::days(1),
            scheduled_time: NaiveTime::from_hms_opt(10, 0, 0).expect("valid time"),
            duration_minutes: 30,
            notes: String::new(),
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
        }
    }

    #[test]
    fn conditional_write_rejects_stale_versions() {
        let store = InMemoryInterviewStore::default();
        let record = interview("ivw-infra-1");
        store.insert(record.clone()).expect("insert");

        let mut updated = record.clone();
        updated.version = 2;
        store.update(updated, 1).expect("matching version commits");

        let mut stale = record.clone();
        stale.version = 2;
        assert!(matches!(
            store.update(stale, 1),
            Err(StoreError::VersionConflict)
        ));
    }

    #[test]
    fn duplicate_insert_conflicts() {
        let store = InMemoryInterviewStore::default();
        let record = interview("ivw-infra-2");
        store.insert(record.clone()).expect("insert");
        assert!(matches!(store.insert(record), Err(StoreError::Conflict)));
    }

    #[test]
    fn seeded_directory_resolves_known_offices() {
        let directory = StaticOfficeDirectory::default();
        assert!(directory
            .get(&OfficeLocationId("office-1".to_string()))
            .expect("lookup")
            .is_some());
        assert!(directory
            .get(&OfficeLocationId("office-404".to_string()))
            .expect("lookup")
            .is_none());
        assert_eq!(directory.active().expect("listing").len(), 2);
    }

    #[test]
    fn parse_date_accepts_iso_format() {
        assert!(parse_date("2026-09-01").is_ok());
        assert!(parse_date("01/09/2026").is_err());
    }
}
