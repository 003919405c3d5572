use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::placement::eligibility::post_hire_router;

#[tokio::test]
async fn eligibility_routes_reflect_hire_state() {
    let harness = Harness::new();
    let router = post_hire_router(Arc::new(harness.post_hire()));

    let response = router
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/students/{ALI}/eligibility/joining-report"
        )))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["eligible"], json!(false));
    assert!(payload.get("company_id").is_none());

    harness.hired(ALI, ACME_DEV);

    let response = router
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/students/{ALI}/eligibility/appraisal/{ACME}"
        )))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload["eligible"], json!(true));
    assert_eq!(payload["company_id"], json!(ACME));

    let response = router
        .oneshot(get_request(&format!("/api/v1/students/{ALI}/hired-context")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["supervisor_id"], json!(KHAN));
    assert_eq!(payload["end_date"], json!("2026-08-31"));
}

#[tokio::test]
async fn hired_context_without_placement_is_not_found() {
    let harness = Harness::new();
    let router = post_hire_router(Arc::new(harness.post_hire()));

    let response = router
        .oneshot(get_request(&format!("/api/v1/students/{BEA}/hired-context")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn document_routes_file_and_list() {
    let harness = Harness::new();
    harness.hired(ALI, ACME_DEV);
    let router = post_hire_router(Arc::new(harness.post_hire()));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/post-hire/joining-reports",
            json!({ "student_id": ALI, "reported_on": "2026-06-01", "summary": "Started today" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["body"]["kind"], json!("joining_report"));
    assert_eq!(payload["context"]["company_id"], json!(ACME));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/post-hire/joining-reports",
            json!({ "student_id": ALI, "reported_on": "2026-06-02", "summary": "Again" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/post-hire/appraisals",
            json!({ "company_id": ACME, "student_id": ALI, "rating": 5 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(get_request(&format!(
            "/api/v1/students/{ALI}/post-hire-documents"
        )))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn misconduct_route_rejects_foreign_company() {
    let harness = Harness::new();
    harness.hired(ALI, ACME_DEV);
    let router = post_hire_router(Arc::new(harness.post_hire()));

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/post-hire/misconduct-reports",
            json!({
                "company_id": GLOBEX,
                "student_id": ALI,
                "incident_date": "2026-07-02",
                "description": "Left early"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
