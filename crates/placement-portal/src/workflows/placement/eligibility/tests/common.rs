pub(super) use crate::workflows::placement::fixtures::*;
use crate::workflows::placement::eligibility::{JoiningReportInput, PostHireDocument};
use crate::workflows::placement::ids::StudentId;

pub(super) fn joining_report(student: &str) -> JoiningReportInput {
    JoiningReportInput {
        student_id: StudentId::new(student),
        reported_on: date(2026, 6, 1),
        summary: "Joined the platform team; onboarding complete".to_string(),
    }
}

pub(super) fn file_joining_report(harness: &Harness, student: &str) -> PostHireDocument {
    harness
        .post_hire()
        .file_joining_report(joining_report(student))
        .expect("joining report filed")
}
