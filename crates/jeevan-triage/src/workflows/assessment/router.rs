use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerValue, AssessmentError, SessionId};
use super::repository::{
    AssessmentRepository, AssessmentStatusView, QuestionView, ReferralPublisher, RepositoryError,
};
use super::service::{AssessmentService, AssessmentServiceError};

const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub complaint_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Router builder exposing the catalog and the assessment flow over HTTP.
pub fn assessment_router<R, P>(service: Arc<AssessmentService<R, P>>) -> Router
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    Router::new()
        .route("/api/v1/complaints", get(complaints_handler::<R, P>))
        .route(
            "/api/v1/complaints/:complaint_id/questions",
            get(questions_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments",
            post(start_handler::<R, P>).get(history_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id",
            get(status_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id/answers",
            post(answer_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id/notes",
            post(note_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id/abandon",
            post(abandon_handler::<R, P>),
        )
        .route(
            "/api/v1/assessments/:session_id/recommendation",
            get(recommendation_handler::<R, P>),
        )
        .with_state(service)
}

pub(crate) async fn complaints_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.list_complaints())).into_response()
}

pub(crate) async fn questions_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(complaint_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    let result = service
        .catalog()
        .resolve(&complaint_id)
        .map_err(AssessmentServiceError::from)
        .and_then(|id| service.questions(id));

    match result {
        Ok(questions) => {
            let views: Vec<QuestionView> = questions
                .iter()
                .enumerate()
                .map(|(index, question)| QuestionView::from_question(index, question))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    axum::Json(request): axum::Json<StartRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    let result = service
        .catalog()
        .resolve(&request.complaint_id)
        .map_err(AssessmentServiceError::from)
        .and_then(|id| service.start(id));

    match result {
        Ok(record) => {
            let view = service.status_view(&record);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match service.history(limit) {
        Ok(records) => {
            let views: Vec<AssessmentStatusView> = records
                .iter()
                .map(|record| service.status_view(record))
                .collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(service.status_view(&record))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<AnswerRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.record_answer(&id, AnswerValue(request.answer)) {
        Ok(record) => (StatusCode::OK, axum::Json(service.status_view(&record))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn note_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<NoteRequest>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    let id = SessionId(session_id);
    match service.add_note(&id, &request.text) {
        Ok(record) => {
            let payload = json!({
                "session_id": record.session_id,
                "notes": record.notes.len(),
                "message": "Thank you for sharing. Let me help you with that symptom.",
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn abandon_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    match service.abandon(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(service.status_view(&record))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommendation_handler<R, P>(
    State(service): State<Arc<AssessmentService<R, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    match service.recommendation(&SessionId(session_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Single HTTP status mapping for assessment failures, shared with `AppError`.
pub fn status_for(err: &AssessmentServiceError) -> StatusCode {
    match err {
        AssessmentServiceError::Assessment(AssessmentError::NotFound { .. })
        | AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Assessment(AssessmentError::InvalidState { .. })
        | AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Assessment(
            AssessmentError::InvalidAnswer { .. } | AssessmentError::EmptyNote,
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (status_for(&err), axum::Json(payload)).into_response()
}
