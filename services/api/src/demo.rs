use crate::infra::{parse_date, seed_directory, Placement};
use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use placement_portal::config::PlacementConfig;
use placement_portal::error::AppError;
use placement_portal::workflows::placement::applications::{
    ApplicationRecord, CompanyDecision, HiringOffer, InterviewDetails, InterviewOutcome,
    SupervisorDecision,
};
use placement_portal::workflows::placement::eligibility::JoiningReportInput;
use placement_portal::workflows::placement::memory::RecordingNotifications;
use placement_portal::workflows::placement::supervision::SupervisionDecision;
use placement_portal::workflows::placement::{JobId, StudentId, SupervisorId};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Placement start date (YYYY-MM-DD). Defaults to 30 days from today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Placement length in weeks.
    #[arg(long, default_value_t = 12)]
    pub(crate) weeks: u32,
    /// Stop after the hire and skip the joining report.
    #[arg(long)]
    pub(crate) skip_post_hire: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start_date,
        weeks,
        skip_post_hire,
    } = args;
    let start_date =
        start_date.unwrap_or_else(|| Local::now().date_naive() + Duration::days(30));
    let end_date = start_date + Duration::weeks(i64::from(weeks.max(1)));

    let notifications = Arc::new(RecordingNotifications::new());
    let placement = Placement::in_memory(
        Arc::new(seed_directory()),
        notifications.clone(),
        PlacementConfig::default(),
    );
    let student = StudentId::new("stu-amina");
    let rahman = SupervisorId::new("sup-rahman");
    let okafor = SupervisorId::new("sup-okafor");

    println!("Placement portal demo");
    println!("=====================");

    println!("\n1. Supervision");
    let request = placement.supervision.request_supervision(&student, &rahman)?;
    println!(
        "  {} asked {} for supervision -> {}",
        request.student.name,
        request.supervisor.name,
        request.status.label()
    );
    match placement.supervision.request_supervision(&student, &okafor) {
        Ok(_) => println!("  Unexpected: a second request was accepted"),
        Err(err) => println!("  Second request to Dr. Okafor refused: {err}"),
    }
    let accepted = placement.supervision.respond(
        &request.id,
        &rahman,
        SupervisionDecision::Accepted,
        Some("Happy to supervise".to_string()),
    )?;
    let capacity = placement.supervision.capacity(&rahman)?;
    println!(
        "  {} answered -> {} ({} of {} slots used)",
        accepted.supervisor.name,
        accepted.status.label(),
        capacity.accepted,
        capacity.max_students
    );

    println!("\n2. Application");
    let engine = &placement.applications;
    let record = engine.submit(&student, &JobId::new("job-orbit-backend"))?;
    print_status("submitted", &record);
    let record = engine.review_by_supervisor(&record.id, SupervisorDecision::Approve, None)?;
    print_status("supervisor approved", &record);
    let record = engine.review_by_company(
        &record.id,
        CompanyDecision::Approve,
        Some("Strong systems background".to_string()),
    )?;
    print_status("company approved", &record);

    let interview_at = Utc
        .with_ymd_and_hms(2026, 1, 15, 15, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    let record = engine.schedule_interview(
        &record.id,
        InterviewDetails {
            scheduled_at: interview_at,
            location: "Orbit Systems, 4th floor".to_string(),
            notes: None,
        },
    )?;
    print_status("interview scheduled", &record);
    let record = engine.record_interview_outcome(&record.id, InterviewOutcome::Passed)?;
    print_status("interview passed", &record);
    let record = engine.hire(
        &record.id,
        HiringOffer {
            hiring_date: Local::now().date_naive(),
            start_date,
            end_date,
        },
    )?;
    print_status("hired", &record);

    if !skip_post_hire {
        println!("\n3. Post-hire");
        let gate = placement.post_hire.gate();
        println!(
            "  Joining report allowed: {}",
            gate.is_eligible_for_joining_report(&student)?
        );
        let report = placement.post_hire.file_joining_report(JoiningReportInput {
            student_id: student.clone(),
            reported_on: start_date,
            summary: "Joined the backend team".to_string(),
        })?;
        println!(
            "  Joining report {} filed for {} ({} to {})",
            report.id, report.context.job_title, report.context.start_date, report.context.end_date
        );
        println!(
            "  Joining report allowed afterwards: {}",
            gate.is_eligible_for_joining_report(&student)?
        );
    }

    println!("\nNotifications");
    for notification in notifications.events() {
        println!(
            "  [{:<22}] {:<11} {}",
            notification.kind.label(),
            notification.user_id,
            notification.message
        );
    }

    Ok(())
}

fn print_status(step: &str, record: &ApplicationRecord) {
    println!(
        "  {step:<20} overall={:<20} supervisor={:<10} company={:<9} application={}",
        record.overall_status().label(),
        record.supervisor_status().label(),
        record.company_status().label(),
        record.application_status().label()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_end_to_end() {
        let args = DemoArgs {
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1),
            weeks: 10,
            skip_post_hire: false,
        };

        run_demo(args).expect("demo completes");
    }
}
