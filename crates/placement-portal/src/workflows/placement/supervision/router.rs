use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{CapacityView, SupervisionDecision, SupervisionRequest};
use super::repository::SupervisionRepository;
use super::service::SupervisionAdmissionController;
use crate::workflows::placement::ids::{RequestId, StudentId, SupervisorId};
use crate::workflows::placement::notifications::NotificationSink;
use crate::workflows::placement::profiles::{ProfileLookup, StudentRoster};
use crate::workflows::placement::PlacementError;

type Controller<R, P, N> = Arc<SupervisionAdmissionController<R, P, N>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SupervisionRequestBody {
    pub(crate) student_id: StudentId,
    pub(crate) supervisor_id: SupervisorId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SupervisionResponseBody {
    pub(crate) supervisor_id: SupervisorId,
    pub(crate) decision: SupervisionDecision,
    #[serde(default)]
    pub(crate) comments: Option<String>,
}

/// Router builder exposing supervision request endpoints.
pub fn supervision_router<R, P, N>(controller: Controller<R, P, N>) -> Router
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/supervision/requests",
            post(request_handler::<R, P, N>),
        )
        .route(
            "/api/v1/supervision/requests/:request_id",
            get(fetch_handler::<R, P, N>),
        )
        .route(
            "/api/v1/supervision/requests/:request_id/response",
            post(respond_handler::<R, P, N>),
        )
        .route(
            "/api/v1/supervision/students/:student_id/requests",
            get(student_requests_handler::<R, P, N>),
        )
        .route(
            "/api/v1/supervision/supervisors/:supervisor_id/requests",
            get(supervisor_requests_handler::<R, P, N>),
        )
        .route(
            "/api/v1/supervision/supervisors/:supervisor_id/capacity",
            get(capacity_handler::<R, P, N>),
        )
        .with_state(controller)
}

pub(crate) async fn request_handler<R, P, N>(
    State(controller): State<Controller<R, P, N>>,
    Json(body): Json<SupervisionRequestBody>,
) -> Result<(StatusCode, Json<SupervisionRequest>), PlacementError>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    let request = controller.request_supervision(&body.student_id, &body.supervisor_id)?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub(crate) async fn respond_handler<R, P, N>(
    State(controller): State<Controller<R, P, N>>,
    Path(request_id): Path<String>,
    Json(body): Json<SupervisionResponseBody>,
) -> Result<Json<SupervisionRequest>, PlacementError>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    let request = controller.respond(
        &RequestId(request_id),
        &body.supervisor_id,
        body.decision,
        body.comments,
    )?;
    Ok(Json(request))
}

pub(crate) async fn fetch_handler<R, P, N>(
    State(controller): State<Controller<R, P, N>>,
    Path(request_id): Path<String>,
) -> Result<Json<SupervisionRequest>, PlacementError>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(controller.request(&RequestId(request_id))?))
}

pub(crate) async fn student_requests_handler<R, P, N>(
    State(controller): State<Controller<R, P, N>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<SupervisionRequest>>, PlacementError>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(
        controller.requests_for_student(&StudentId(student_id))?,
    ))
}

pub(crate) async fn supervisor_requests_handler<R, P, N>(
    State(controller): State<Controller<R, P, N>>,
    Path(supervisor_id): Path<String>,
) -> Result<Json<Vec<SupervisionRequest>>, PlacementError>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(
        controller.requests_for_supervisor(&SupervisorId(supervisor_id))?,
    ))
}

pub(crate) async fn capacity_handler<R, P, N>(
    State(controller): State<Controller<R, P, N>>,
    Path(supervisor_id): Path<String>,
) -> Result<Json<CapacityView>, PlacementError>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(controller.capacity(&SupervisorId(supervisor_id))?))
}
