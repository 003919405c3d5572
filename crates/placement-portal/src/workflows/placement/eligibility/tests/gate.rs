use super::common::*;
use crate::workflows::placement::applications::{
    ApplicationRecord, ApplicationRepository, CompanyDecision, InterviewOutcome,
    SupervisorDecision,
};
use crate::workflows::placement::eligibility::EligibilityGate;
use crate::workflows::placement::ids::{ApplicationId, CompanyId, JobId, StudentId};
use crate::workflows::placement::memory::{InMemoryApplicationStore, InMemoryDocumentStore};
use crate::workflows::placement::profiles::{CompanyProfile, JobPosting, ProfileLookup};
use crate::workflows::placement::{PlacementError, SupervisorId};

fn gate(harness: &Harness) -> EligibilityGate<InMemoryApplicationStore, InMemoryDocumentStore> {
    EligibilityGate::new(harness.applications.clone(), harness.documents.clone())
}

#[test]
fn nothing_is_unlocked_before_hire() {
    let harness = Harness::new();
    harness.approved(ALI, ACME_DEV);
    let gate = gate(&harness);
    let student = StudentId::new(ALI);

    assert!(!gate.is_eligible_for_joining_report(&student).expect("query"));
    assert!(!gate
        .is_eligible_for_appraisal(&student, &CompanyId::new(ACME))
        .expect("query"));
    assert!(matches!(
        gate.resolve_hired_context(&student),
        Err(PlacementError::NoCurrentPlacement(_))
    ));
}

#[test]
fn hire_unlocks_joining_report_and_appraisal() {
    let harness = Harness::new();
    let hired = harness.hired(ALI, ACME_DEV);
    let gate = gate(&harness);
    let student = StudentId::new(ALI);

    assert!(gate.is_eligible_for_joining_report(&student).expect("query"));
    assert!(gate
        .is_eligible_for_appraisal(&student, &CompanyId::new(ACME))
        .expect("query"));
    assert!(!gate
        .is_eligible_for_appraisal(&student, &CompanyId::new(GLOBEX))
        .expect("query"));

    let context = gate.resolve_hired_context(&student).expect("context");
    assert_eq!(context.application_id, hired.id);
    assert_eq!(context.company_id.as_str(), ACME);
    assert_eq!(context.supervisor_id.as_str(), KHAN);
    assert_eq!(context.job_id.as_str(), ACME_DEV);
    assert_eq!(context.start_date, offer().start_date);
    assert_eq!(context.end_date, offer().end_date);
}

#[test]
fn filed_joining_report_closes_the_gate() {
    let harness = Harness::new();
    harness.hired(ALI, ACME_DEV);
    file_joining_report(&harness, ALI);

    assert!(!gate(&harness)
        .is_eligible_for_joining_report(&StudentId::new(ALI))
        .expect("query"));
}

#[test]
fn two_current_placements_are_ambiguous() {
    let harness = Harness::new();
    harness.hired(ALI, ACME_DEV);

    harness.directory.add_company(CompanyProfile {
        id: CompanyId::new("co-initech"),
        name: "Initech".to_string(),
        email: "hr@initech.example".to_string(),
    });
    harness.directory.add_job(JobPosting {
        id: JobId::new("job-initech"),
        company_id: CompanyId::new("co-initech"),
        title: "TPS Intern".to_string(),
    });
    harness
        .applications
        .insert(legacy_hire(&harness, "job-initech"))
        .expect("legacy insert");

    let gate = gate(&harness);
    let student = StudentId::new(ALI);
    assert!(!gate.is_eligible_for_joining_report(&student).expect("query"));
    assert!(matches!(
        gate.resolve_hired_context(&student),
        Err(PlacementError::AmbiguousPlacement(_))
    ));
}

/// A hired record built outside the engine, as an import of older data would produce it.
fn legacy_hire(harness: &Harness, job: &str) -> ApplicationRecord {
    let directory = &harness.directory;
    let student = directory.student(&StudentId::new(ALI)).expect("student");
    let supervisor = directory
        .supervisor(&SupervisorId::new(KHAN))
        .expect("supervisor");
    let job = directory.job(&JobId::new(job)).expect("job");
    let company = directory.company(&job.company_id).expect("company");
    let now = chrono::Utc::now();

    let mut record = ApplicationRecord::new(
        ApplicationId::new("app-legacy"),
        &student,
        &supervisor,
        &company,
        &job,
        now,
    );
    record
        .review_by_supervisor(&SupervisorDecision::Approve, None, now)
        .expect("approve");
    record
        .review_by_company(CompanyDecision::Approve, None, now)
        .expect("approve");
    record.schedule_interview(interview(), now).expect("schedule");
    record
        .record_interview_outcome(InterviewOutcome::Passed, now)
        .expect("passed");
    record.hire(offer(), now).expect("hire");
    record
}
