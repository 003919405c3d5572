use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::documents::{
    AppraisalInput, JoiningReportInput, MisconductReportInput, PostHireDocument,
};
use super::gate::{EligibilityView, HiredContext};
use super::repository::PostHireRepository;
use super::service::PostHireDocumentService;
use crate::workflows::placement::applications::ApplicationRepository;
use crate::workflows::placement::ids::{CompanyId, StudentId};
use crate::workflows::placement::notifications::NotificationSink;
use crate::workflows::placement::PlacementError;

type Service<A, D, N> = Arc<PostHireDocumentService<A, D, N>>;

/// Router builder exposing eligibility queries and post-hire document filing.
pub fn post_hire_router<A, D, N>(service: Service<A, D, N>) -> Router
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/students/:student_id/eligibility/joining-report",
            get(joining_report_eligibility_handler::<A, D, N>),
        )
        .route(
            "/api/v1/students/:student_id/eligibility/appraisal/:company_id",
            get(appraisal_eligibility_handler::<A, D, N>),
        )
        .route(
            "/api/v1/students/:student_id/hired-context",
            get(hired_context_handler::<A, D, N>),
        )
        .route(
            "/api/v1/students/:student_id/post-hire-documents",
            get(student_documents_handler::<A, D, N>),
        )
        .route(
            "/api/v1/post-hire/joining-reports",
            post(joining_report_handler::<A, D, N>),
        )
        .route(
            "/api/v1/post-hire/appraisals",
            post(appraisal_handler::<A, D, N>),
        )
        .route(
            "/api/v1/post-hire/misconduct-reports",
            post(misconduct_handler::<A, D, N>),
        )
        .with_state(service)
}

pub(crate) async fn joining_report_eligibility_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Path(student_id): Path<String>,
) -> Result<Json<EligibilityView>, PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    let student_id = StudentId(student_id);
    let eligible = service.gate().is_eligible_for_joining_report(&student_id)?;
    Ok(Json(EligibilityView {
        student_id,
        company_id: None,
        eligible,
    }))
}

pub(crate) async fn appraisal_eligibility_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Path((student_id, company_id)): Path<(String, String)>,
) -> Result<Json<EligibilityView>, PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    let student_id = StudentId(student_id);
    let company_id = CompanyId(company_id);
    let eligible = service
        .gate()
        .is_eligible_for_appraisal(&student_id, &company_id)?;
    Ok(Json(EligibilityView {
        student_id,
        company_id: Some(company_id),
        eligible,
    }))
}

pub(crate) async fn hired_context_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Path(student_id): Path<String>,
) -> Result<Json<HiredContext>, PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(
        service.gate().resolve_hired_context(&StudentId(student_id))?,
    ))
}

pub(crate) async fn student_documents_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<PostHireDocument>>, PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    Ok(Json(service.documents_for_student(&StudentId(student_id))?))
}

pub(crate) async fn joining_report_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Json(input): Json<JoiningReportInput>,
) -> Result<(StatusCode, Json<PostHireDocument>), PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    let document = service.file_joining_report(input)?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub(crate) async fn appraisal_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Json(input): Json<AppraisalInput>,
) -> Result<(StatusCode, Json<PostHireDocument>), PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    let document = service.file_appraisal(input)?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub(crate) async fn misconduct_handler<A, D, N>(
    State(service): State<Service<A, D, N>>,
    Json(input): Json<MisconductReportInput>,
) -> Result<(StatusCode, Json<PostHireDocument>), PlacementError>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    let document = service.file_misconduct_report(input)?;
    Ok((StatusCode::CREATED, Json(document)))
}
