use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use super::applications::{
    ApplicationRecord, ApplicationStatusEngine, CompanyDecision, HiringOffer, InterviewDetails,
    InterviewOutcome, SupervisorDecision,
};
use super::eligibility::PostHireDocumentService;
use super::ids::{CompanyId, JobId, RequestId, StudentId, SupervisorId};
use super::memory::{
    InMemoryApplicationStore, InMemoryDirectory, InMemoryDocumentStore, InMemorySupervisionStore,
    RecordingNotifications,
};
use super::profiles::{CompanyProfile, JobPosting, StudentProfile, SupervisorProfile};
use super::supervision::{SupervisionAdmissionController, SupervisionRequest, SupervisionStatus};
use crate::config::PlacementConfig;

pub(crate) const ALI: &str = "stu-ali";
pub(crate) const BEA: &str = "stu-bea";
pub(crate) const CAM: &str = "stu-cam";
pub(crate) const KHAN: &str = "sup-khan";
pub(crate) const LEE: &str = "sup-lee";
pub(crate) const ACME: &str = "co-acme";
pub(crate) const GLOBEX: &str = "co-globex";
pub(crate) const ACME_DEV: &str = "job-acme-dev";
pub(crate) const ACME_QA: &str = "job-acme-qa";
pub(crate) const GLOBEX_OPS: &str = "job-globex-ops";

pub(crate) type Controller = SupervisionAdmissionController<
    InMemorySupervisionStore,
    InMemoryDirectory,
    RecordingNotifications,
>;
pub(crate) type Engine = ApplicationStatusEngine<
    InMemoryApplicationStore,
    InMemorySupervisionStore,
    InMemoryDirectory,
    RecordingNotifications,
>;
pub(crate) type PostHire =
    PostHireDocumentService<InMemoryApplicationStore, InMemoryDocumentStore, RecordingNotifications>;

pub(crate) fn student(id: &str, supervisor: Option<&str>) -> StudentProfile {
    StudentProfile {
        id: StudentId::new(id),
        name: format!("Student {id}"),
        email: format!("{id}@uni.example"),
        department: "Computer Science".to_string(),
        semester: 7,
        gpa: 3.4,
        selected_supervisor_id: supervisor.map(SupervisorId::new),
    }
}

pub(crate) fn supervisor(id: &str, max_students: Option<u32>) -> SupervisorProfile {
    SupervisorProfile {
        id: SupervisorId::new(id),
        name: format!("Dr. {id}"),
        email: format!("{id}@uni.example"),
        department: "Computer Science".to_string(),
        max_students,
    }
}

/// An accepted supervision request, as left behind by an earlier `respond`.
pub(crate) fn accepted_request(
    student_id: &str,
    supervisor_id: &str,
    max_students: Option<u32>,
) -> SupervisionRequest {
    let now = Utc::now();
    let mut request = SupervisionRequest::new(
        RequestId::new(format!("sup-req-seed-{student_id}")),
        &student(student_id, Some(supervisor_id)),
        &supervisor(supervisor_id, max_students),
        now,
    );
    request
        .resolve(SupervisionStatus::Accepted, None, now)
        .expect("pending request resolves");
    request
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn offer() -> HiringOffer {
    HiringOffer {
        hiring_date: date(2026, 5, 20),
        start_date: date(2026, 6, 1),
        end_date: date(2026, 8, 31),
    }
}

pub(crate) fn interview() -> InterviewDetails {
    InterviewDetails {
        scheduled_at: Utc
            .with_ymd_and_hms(2026, 5, 4, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        location: "Acme HQ, room 3".to_string(),
        notes: None,
    }
}

pub(crate) fn config() -> PlacementConfig {
    PlacementConfig {
        default_max_students: 5,
        commit_retries: 3,
    }
}

/// In-memory stores and a seeded directory.
///
/// Seed: `ALI` is already supervised by `KHAN` (an accepted request plus the roster entry);
/// `BEA` and `CAM` are unsupervised. `KHAN` takes two students, so one slot remains; `LEE` falls
/// back to the configured default.
pub(crate) struct Harness {
    pub(crate) directory: Arc<InMemoryDirectory>,
    pub(crate) requests: Arc<InMemorySupervisionStore>,
    pub(crate) applications: Arc<InMemoryApplicationStore>,
    pub(crate) documents: Arc<InMemoryDocumentStore>,
    pub(crate) notifications: Arc<RecordingNotifications>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let directory = InMemoryDirectory::new();
        directory.add_student(student(ALI, Some(KHAN)));
        directory.add_student(student(BEA, None));
        directory.add_student(student(CAM, None));
        directory.add_supervisor(supervisor(KHAN, Some(2)));
        directory.add_supervisor(supervisor(LEE, None));
        for (id, name) in [(ACME, "Acme Corp"), (GLOBEX, "Globex")] {
            directory.add_company(CompanyProfile {
                id: CompanyId::new(id),
                name: name.to_string(),
                email: format!("hr@{id}.example"),
            });
        }
        for (id, company, title) in [
            (ACME_DEV, ACME, "Backend Intern"),
            (ACME_QA, ACME, "QA Intern"),
            (GLOBEX_OPS, GLOBEX, "Operations Intern"),
        ] {
            directory.add_job(JobPosting {
                id: JobId::new(id),
                company_id: CompanyId::new(company),
                title: title.to_string(),
            });
        }

        let requests = InMemorySupervisionStore::new();
        requests
            .seed([accepted_request(ALI, KHAN, Some(2))])
            .expect("seed accepted request");

        Self {
            directory: Arc::new(directory),
            requests: Arc::new(requests),
            applications: Arc::new(InMemoryApplicationStore::new()),
            documents: Arc::new(InMemoryDocumentStore::new()),
            notifications: Arc::new(RecordingNotifications::new()),
        }
    }

    pub(crate) fn controller(&self) -> Controller {
        SupervisionAdmissionController::new(
            self.requests.clone(),
            self.directory.clone(),
            self.notifications.clone(),
            config(),
        )
    }

    pub(crate) fn engine(&self) -> Engine {
        ApplicationStatusEngine::new(
            self.applications.clone(),
            self.requests.clone(),
            self.directory.clone(),
            self.notifications.clone(),
            config(),
        )
    }

    pub(crate) fn post_hire(&self) -> PostHire {
        PostHireDocumentService::new(
            self.applications.clone(),
            self.documents.clone(),
            self.notifications.clone(),
        )
    }

    /// Submit `student` to `job` and walk it through both approvals.
    pub(crate) fn approved(&self, student: &str, job: &str) -> ApplicationRecord {
        let engine = self.engine();
        let record = engine
            .submit(&StudentId::new(student), &JobId::new(job))
            .expect("submit");
        engine
            .review_by_supervisor(&record.id, SupervisorDecision::Approve, None)
            .expect("supervisor approves");
        engine
            .review_by_company(&record.id, CompanyDecision::Approve, None)
            .expect("company approves")
    }

    /// Submit `student` to `job` and walk it all the way to `hired`.
    pub(crate) fn hired(&self, student: &str, job: &str) -> ApplicationRecord {
        let engine = self.engine();
        let record = self.approved(student, job);
        engine
            .schedule_interview(&record.id, interview())
            .expect("schedule");
        engine
            .record_interview_outcome(&record.id, InterviewOutcome::Passed)
            .expect("passed");
        engine.hire(&record.id, offer()).expect("hire")
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(crate) fn json_request(
    method: &str,
    uri: &str,
    payload: Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("serialize payload"),
        ))
        .expect("request")
}

pub(crate) fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request")
}
