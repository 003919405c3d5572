use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{
    ApplicationRecord, CompanyDecision, HiringOffer, InterviewDetails, InterviewOutcome,
    SupervisorDecision,
};
use super::repository::ApplicationRepository;
use super::service::ApplicationStatusEngine;
use crate::workflows::placement::ids::{ApplicationId, CompanyId, JobId, StudentId, SupervisorId};
use crate::workflows::placement::notifications::NotificationSink;
use crate::workflows::placement::profiles::ProfileLookup;
use crate::workflows::placement::supervision::SupervisorAssignments;
use crate::workflows::placement::PlacementError;

type Engine<R, S, P, N> = Arc<ApplicationStatusEngine<R, S, P, N>>;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitBody {
    pub(crate) student_id: StudentId,
    pub(crate) job_id: JobId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SupervisorReviewBody {
    #[serde(flatten)]
    pub(crate) decision: SupervisorDecision,
    #[serde(default)]
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompanyReviewBody {
    pub(crate) decision: CompanyDecision,
    #[serde(default)]
    pub(crate) comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutcomeBody {
    pub(crate) outcome: InterviewOutcome,
}

/// Router builder exposing the application lifecycle endpoints.
pub fn application_router<R, S, P, N>(engine: Engine<R, S, P, N>) -> Router
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<R, S, P, N>))
        .route(
            "/api/v1/applications/:application_id",
            get(fetch_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/supervisor-review",
            post(supervisor_review_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/resubmit",
            post(resubmit_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/company-review",
            post(company_review_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/interview",
            post(schedule_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/interview/outcome",
            post(outcome_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/applications/:application_id/hire",
            post(hire_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/students/:student_id/applications",
            get(student_applications_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/supervisors/:supervisor_id/applications",
            get(supervisor_applications_handler::<R, S, P, N>),
        )
        .route(
            "/api/v1/companies/:company_id/applications",
            get(company_applications_handler::<R, S, P, N>),
        )
        .with_state(engine)
}

pub(crate) async fn submit_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<ApplicationRecord>), PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    let record = engine.submit(&body.student_id, &body.job_id)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn fetch_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.get(&ApplicationId(application_id))?))
}

pub(crate) async fn supervisor_review_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
    Json(body): Json<SupervisorReviewBody>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    let record = engine.review_by_supervisor(
        &ApplicationId(application_id),
        body.decision,
        body.comments,
    )?;
    Ok(Json(record))
}

pub(crate) async fn resubmit_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.resubmit(&ApplicationId(application_id))?))
}

pub(crate) async fn company_review_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
    Json(body): Json<CompanyReviewBody>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    let record = engine.review_by_company(
        &ApplicationId(application_id),
        body.decision,
        body.comments,
    )?;
    Ok(Json(record))
}

pub(crate) async fn schedule_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
    Json(details): Json<InterviewDetails>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(
        engine.schedule_interview(&ApplicationId(application_id), details)?,
    ))
}

pub(crate) async fn outcome_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
    Json(body): Json<OutcomeBody>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.record_interview_outcome(
        &ApplicationId(application_id),
        body.outcome,
    )?))
}

pub(crate) async fn hire_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(application_id): Path<String>,
    Json(offer): Json<HiringOffer>,
) -> Result<Json<ApplicationRecord>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.hire(&ApplicationId(application_id), offer)?))
}

pub(crate) async fn student_applications_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<ApplicationRecord>>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.for_student(&StudentId(student_id))?))
}

pub(crate) async fn supervisor_applications_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(supervisor_id): Path<String>,
) -> Result<Json<Vec<ApplicationRecord>>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.for_supervisor(&SupervisorId(supervisor_id))?))
}

pub(crate) async fn company_applications_handler<R, S, P, N>(
    State(engine): State<Engine<R, S, P, N>>,
    Path(company_id): Path<String>,
) -> Result<Json<Vec<ApplicationRecord>>, PlacementError>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(engine.for_company(&CompanyId(company_id))?))
}
