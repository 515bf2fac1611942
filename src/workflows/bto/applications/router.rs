use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationId;
use super::service::{ApplicationError, ApplicationService};
use super::repository::ApplicationRepository;
use crate::workflows::bto::domain::{ApplicantProfile, FlatType, MaritalStatus, Nric};
use crate::workflows::bto::projects::repository::ProjectStore;
use crate::workflows::bto::repository::RepositoryError;
use crate::workflows::bto::staffing::StaffingRepository;

/// Intake payload for a new housing application.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSubmission {
    pub nric: Nric,
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub project: String,
    pub flat_type: FlatType,
}

impl ApplicationSubmission {
    fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            nric: self.nric.clone(),
            age: self.age,
            marital_status: self.marital_status,
        }
    }
}

/// Router builder exposing HTTP endpoints for intake, status, and
/// withdrawal requests.
pub fn application_router<P, A, S>(service: Arc<ApplicationService<P, A, S>>) -> Router
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    S: StaffingRepository + 'static,
{
    Router::new()
        .route("/api/v1/bto/applications", post(submit_handler::<P, A, S>))
        .route(
            "/api/v1/bto/applications/:application_id",
            get(status_handler::<P, A, S>),
        )
        .route(
            "/api/v1/bto/applications/:application_id/withdrawal",
            post(withdrawal_handler::<P, A, S>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<P, A, S>(
    State(service): State<Arc<ApplicationService<P, A, S>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    S: StaffingRepository + 'static,
{
    let today = Local::now().date_naive();
    let result = service.apply(
        &submission.profile(),
        &submission.project,
        submission.flat_type,
        today,
    );

    match result {
        Ok(application) => {
            (StatusCode::CREATED, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<P, A, S>(
    State(service): State<Arc<ApplicationService<P, A, S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    S: StaffingRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn withdrawal_handler<P, A, S>(
    State(service): State<Arc<ApplicationService<P, A, S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    S: StaffingRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.request_withdrawal(&id) {
        Ok(application) => {
            (StatusCode::OK, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ApplicationError) -> Response {
    let status = match &error {
        ApplicationError::UnknownProject(_) | ApplicationError::UnknownApplication(_) => {
            StatusCode::NOT_FOUND
        }
        ApplicationError::DuplicateActiveApplication(_) => StatusCode::CONFLICT,
        ApplicationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ApplicationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
