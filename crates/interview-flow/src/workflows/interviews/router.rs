use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use super::domain::{Actor, FeedbackDraft, InterviewId, InterviewRequest, PartyId};
use super::locations::OfficeLocationDirectory;
use super::repository::{InterviewStore, NotificationPublisher};
use super::service::{InterviewLifecycleService, InterviewServiceError};

/// Router builder exposing the lifecycle operations over HTTP. The actor is
/// carried in each request body; the upstream gateway is trusted to have
/// authenticated it.
pub fn interview_router<S, D, N>(service: Arc<InterviewLifecycleService<S, D, N>>) -> Router
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/interviews",
            post(create_handler::<S, D, N>).get(list_handler::<S, D, N>),
        )
        .route("/api/v1/interviews/:id", get(get_handler::<S, D, N>))
        .route(
            "/api/v1/interviews/:id/confirm",
            post(confirm_handler::<S, D, N>),
        )
        .route(
            "/api/v1/interviews/:id/cancel",
            post(cancel_handler::<S, D, N>),
        )
        .route(
            "/api/v1/interviews/:id/reschedule",
            post(reschedule_handler::<S, D, N>),
        )
        .route(
            "/api/v1/interviews/:id/complete",
            post(complete_handler::<S, D, N>),
        )
        .route(
            "/api/v1/interviews/:id/feedback",
            post(feedback_handler::<S, D, N>),
        )
        .route(
            "/api/v1/interviews/:id/hired",
            post(hired_handler::<S, D, N>),
        )
        .route(
            "/api/v1/office-locations",
            get(offices_handler::<S, D, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct CreateInterviewBody {
    pub actor: Actor,
    pub provider_id: String,
    pub office_location_id: String,
    pub scheduled_date: NaiveDate,
    #[serde(deserialize_with = "flexible_time")]
    pub scheduled_time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct ActorBody {
    pub actor: Actor,
}

#[derive(Debug, Deserialize)]
pub struct CancelBody {
    pub actor: Actor,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleBody {
    pub actor: Actor,
    pub scheduled_date: NaiveDate,
    #[serde(deserialize_with = "flexible_time")]
    pub scheduled_time: NaiveTime,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackBody {
    pub actor: Actor,
    #[serde(flatten)]
    pub draft: FeedbackDraft,
}

#[derive(Debug, Deserialize)]
pub struct PartyQuery {
    pub party: String,
}

/// Accepts both `HH:MM` and `HH:MM:SS` appointment times.
fn flexible_time<'de, De>(deserializer: De) -> Result<NaiveTime, De::Error>
where
    De: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|err| serde::de::Error::custom(format!("invalid time '{raw}': {err}")))
}

fn error_response(err: InterviewServiceError) -> Response {
    let status = match &err {
        InterviewServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InterviewServiceError::Authorization(_) => StatusCode::FORBIDDEN,
        InterviewServiceError::Conflict(_) => StatusCode::CONFLICT,
        InterviewServiceError::NotFound(_) | InterviewServiceError::UnknownOffice(_) => {
            StatusCode::NOT_FOUND
        }
        InterviewServiceError::Store(_) | InterviewServiceError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn interview_response(
    status: StatusCode,
    result: Result<super::domain::Interview, InterviewServiceError>,
) -> Response {
    match result {
        Ok(interview) => (status, axum::Json(interview.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    axum::Json(body): axum::Json<CreateInterviewBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    let request = InterviewRequest {
        provider_id: PartyId(body.provider_id),
        office_location_id: super::domain::OfficeLocationId(body.office_location_id),
        scheduled_date: body.scheduled_date,
        scheduled_time: body.scheduled_time,
        duration_minutes: body.duration_minutes,
        notes: body.notes,
    };
    interview_response(StatusCode::CREATED, service.create(&body.actor, request))
}

pub(crate) async fn get_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(StatusCode::OK, service.get(&InterviewId(id)))
}

pub(crate) async fn list_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Query(query): Query<PartyQuery>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    match service.for_party(&PartyId(query.party)) {
        Ok(interviews) => {
            let views: Vec<_> = interviews.iter().map(|i| i.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn confirm_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<ActorBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(
        StatusCode::OK,
        service.confirm(&InterviewId(id), &body.actor),
    )
}

pub(crate) async fn cancel_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<CancelBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(
        StatusCode::OK,
        service.cancel(&InterviewId(id), &body.actor, body.reason),
    )
}

pub(crate) async fn reschedule_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<RescheduleBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(
        StatusCode::OK,
        service.reschedule(
            &InterviewId(id),
            &body.actor,
            body.scheduled_date,
            body.scheduled_time,
            body.reason,
        ),
    )
}

pub(crate) async fn complete_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<ActorBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(
        StatusCode::OK,
        service.complete(&InterviewId(id), &body.actor),
    )
}

pub(crate) async fn feedback_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<FeedbackBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(
        StatusCode::CREATED,
        service.submit_feedback(&InterviewId(id), &body.actor, body.draft),
    )
}

pub(crate) async fn hired_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(body): axum::Json<ActorBody>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    interview_response(
        StatusCode::OK,
        service.mark_hired(&InterviewId(id), &body.actor),
    )
}

pub(crate) async fn offices_handler<S, D, N>(
    State(service): State<Arc<InterviewLifecycleService<S, D, N>>>,
) -> Response
where
    S: InterviewStore + 'static,
    D: OfficeLocationDirectory + 'static,
    N: NotificationPublisher + 'static,
{
    match service.office_locations() {
        Ok(offices) => (StatusCode::OK, axum::Json(offices)).into_response(),
        Err(err) => error_response(err),
    }
}
