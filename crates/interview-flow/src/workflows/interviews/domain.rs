use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for interview records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub String);

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for either party of an interview.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(pub String);

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for an office location held by the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfficeLocationId(pub String);

impl fmt::Display for OfficeLocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of the caller as established by the upstream identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Employer,
    Provider,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            ActorRole::Employer => "employer",
            ActorRole::Provider => "provider",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authenticated caller identity injected into every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: PartyId,
    pub role: ActorRole,
}

impl Actor {
    pub fn employer(id: impl Into<String>) -> Self {
        Self {
            id: PartyId(id.into()),
            role: ActorRole::Employer,
        }
    }

    pub fn provider(id: impl Into<String>) -> Self {
        Self {
            id: PartyId(id.into()),
            role: ActorRole::Provider,
        }
    }
}

/// Closed status enum; the transition table in `transitions` is the only
/// source of legal movements between these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewStatus::Pending => "pending",
            InterviewStatus::Confirmed => "confirmed",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled is the one terminal status; completed interviews still
    /// accept the feedback and hire sub-transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, InterviewStatus::Cancelled)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Employer feedback payload as submitted; stamped fields are added by the
/// lifecycle service once the submission commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub rating: u8,
    pub comments: String,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub improvements: Option<String>,
    pub would_hire_again: bool,
}

/// Feedback value embedded in a completed interview, at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub rating: u8,
    pub comments: String,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub would_hire_again: bool,
    pub submitted_at: DateTime<Utc>,
    pub submitted_by: PartyId,
}

/// Employer-supplied payload for booking a new interview. The employer
/// identity comes from the acting caller, never from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    pub provider_id: PartyId,
    pub office_location_id: OfficeLocationId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
}

/// The aggregate root: one scheduled meeting between an employer and a
/// provider, mutated only through the lifecycle service pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub employer_id: PartyId,
    pub provider_id: PartyId,
    pub office_location_id: OfficeLocationId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: u32,
    pub notes: String,
    pub status: InterviewStatus,
    pub cancellation_reason: Option<String>,
    pub reschedule_reason: Option<String>,
    pub feedback: Option<Feedback>,
    pub is_hired: bool,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Interview {
    /// The appointment slot as a single naive wall-clock instant.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.scheduled_date.and_time(self.scheduled_time)
    }

    /// The party opposite the given one, used to address notifications.
    pub fn counterparty(&self, party: &PartyId) -> PartyId {
        if *party == self.employer_id {
            self.provider_id.clone()
        } else {
            self.employer_id.clone()
        }
    }

    /// Whether the actor is one of the two fixed parties, in the role they
    /// claim to hold.
    pub fn involves(&self, actor: &Actor) -> bool {
        match actor.role {
            ActorRole::Employer => actor.id == self.employer_id,
            ActorRole::Provider => actor.id == self.provider_id,
        }
    }

    pub fn view(&self) -> InterviewView {
        InterviewView {
            id: self.id.clone(),
            employer_id: self.employer_id.clone(),
            provider_id: self.provider_id.clone(),
            office_location_id: self.office_location_id.clone(),
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            duration_minutes: self.duration_minutes,
            notes: self.notes.clone(),
            status: self.status.label(),
            cancellation_reason: self.cancellation_reason.clone(),
            reschedule_reason: self.reschedule_reason.clone(),
            feedback: self.feedback.clone(),
            is_hired: self.is_hired,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sanitized representation of an interview for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewView {
    pub id: InterviewId,
    pub employer_id: PartyId,
    pub provider_id: PartyId,
    pub office_location_id: OfficeLocationId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: u32,
    pub notes: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reschedule_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub is_hired: bool,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
