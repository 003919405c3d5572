use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::placement::ids::{ApplicationId, CompanyId, JobId, StudentId, SupervisorId};
use crate::workflows::placement::profiles::{
    CompanyProfile, JobPosting, PartySnapshot, StudentProfile, StudentSnapshot, SupervisorProfile,
};
use crate::workflows::placement::PlacementError;

/// Supervisor vetting track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorStatus {
    Pending,
    Approved,
    Rejected,
    ChangesRequested,
}

impl SupervisorStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SupervisorStatus::Pending => "pending",
            SupervisorStatus::Approved => "approved",
            SupervisorStatus::Rejected => "rejected",
            SupervisorStatus::ChangesRequested => "changes_requested",
        }
    }
}

/// Company vetting track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    Pending,
    Approved,
    Rejected,
}

impl CompanyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CompanyStatus::Pending => "pending",
            CompanyStatus::Approved => "approved",
            CompanyStatus::Rejected => "rejected",
        }
    }
}

/// Interview and hiring progress once both tracks have approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    InterviewScheduled,
    InterviewDone,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::InterviewDone => "interview_done",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Projection of the two vetting tracks and the interview progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    PendingSupervisor,
    SupervisorChangesRequested,
    PendingCompany,
    Approved,
    Rejected,
    RejectedFinal,
}

impl OverallStatus {
    /// Supervisor rejection wins over everything; a company rejection (or a failed interview
    /// after both approvals) is final. Hiring is reported through `ApplicationStatus` and
    /// leaves the overall status at `Approved`.
    pub const fn derive(
        supervisor: SupervisorStatus,
        company: CompanyStatus,
        application: ApplicationStatus,
    ) -> Self {
        match (supervisor, company, application) {
            (SupervisorStatus::Rejected, _, _) => OverallStatus::Rejected,
            (SupervisorStatus::Approved, CompanyStatus::Rejected, _) => {
                OverallStatus::RejectedFinal
            }
            (SupervisorStatus::ChangesRequested, _, _) => {
                OverallStatus::SupervisorChangesRequested
            }
            (SupervisorStatus::Pending, _, _) => OverallStatus::PendingSupervisor,
            (SupervisorStatus::Approved, CompanyStatus::Pending, _) => {
                OverallStatus::PendingCompany
            }
            (SupervisorStatus::Approved, CompanyStatus::Approved, ApplicationStatus::Rejected) => {
                OverallStatus::RejectedFinal
            }
            (SupervisorStatus::Approved, CompanyStatus::Approved, _) => OverallStatus::Approved,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            OverallStatus::PendingSupervisor => "pending_supervisor",
            OverallStatus::SupervisorChangesRequested => "supervisor_changes_requested",
            OverallStatus::PendingCompany => "pending_company",
            OverallStatus::Approved => "approved",
            OverallStatus::Rejected => "rejected",
            OverallStatus::RejectedFinal => "rejected_final",
        }
    }
}

/// Supervisor review verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SupervisorDecision {
    Approve,
    Reject,
    RequestChanges {
        reason: String,
        #[serde(default)]
        fields_to_edit: Vec<String>,
    },
}

/// Company review verdict; companies cannot send an application back for edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewOutcome {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDetails {
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiringOffer {
    pub hiring_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fixes a supervisor asked for before the application can be reconsidered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionFeedback {
    pub reason: String,
    pub fields_to_edit: Vec<String>,
    pub requested_at: DateTime<Utc>,
}

/// A student's application to one job, with write-time snapshots of every party.
///
/// The status fields are private so that `overall_status` can only move together with its
/// inputs; every transition method finishes by recomputing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub student_id: StudentId,
    pub job_id: JobId,
    pub company_id: CompanyId,
    pub supervisor_id: SupervisorId,
    pub student: StudentSnapshot,
    pub job_title: String,
    pub company: PartySnapshot,
    pub supervisor: PartySnapshot,
    supervisor_status: SupervisorStatus,
    company_status: CompanyStatus,
    application_status: ApplicationStatus,
    overall_status: OverallStatus,
    pub supervisor_comments: Option<String>,
    pub company_comments: Option<String>,
    pub rejection_note: Option<String>,
    pub rejection_feedback: Option<RejectionFeedback>,
    pub resubmission_count: u32,
    pub interview_details: Option<InterviewDetails>,
    is_currently_hired: bool,
    pub hiring_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl ApplicationRecord {
    pub fn new(
        id: ApplicationId,
        student: &StudentProfile,
        supervisor: &SupervisorProfile,
        company: &CompanyProfile,
        job: &JobPosting,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let supervisor_status = SupervisorStatus::Pending;
        let company_status = CompanyStatus::Pending;
        let application_status = ApplicationStatus::Pending;

        Self {
            id,
            student_id: student.id.clone(),
            job_id: job.id.clone(),
            company_id: company.id.clone(),
            supervisor_id: supervisor.id.clone(),
            student: StudentSnapshot::from(student),
            job_title: job.title.clone(),
            company: PartySnapshot::from(company),
            supervisor: PartySnapshot::from(supervisor),
            supervisor_status,
            company_status,
            application_status,
            overall_status: OverallStatus::derive(
                supervisor_status,
                company_status,
                application_status,
            ),
            supervisor_comments: None,
            company_comments: None,
            rejection_note: None,
            rejection_feedback: None,
            resubmission_count: 0,
            interview_details: None,
            is_currently_hired: false,
            hiring_date: None,
            start_date: None,
            end_date: None,
            submitted_at,
            updated_at: submitted_at,
            version: 1,
        }
    }

    pub fn supervisor_status(&self) -> SupervisorStatus {
        self.supervisor_status
    }

    pub fn company_status(&self) -> CompanyStatus {
        self.company_status
    }

    pub fn application_status(&self) -> ApplicationStatus {
        self.application_status
    }

    pub fn overall_status(&self) -> OverallStatus {
        self.overall_status
    }

    pub fn is_currently_hired(&self) -> bool {
        self.is_currently_hired
    }

    pub fn review_by_supervisor(
        &mut self,
        decision: &SupervisorDecision,
        comments: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), PlacementError> {
        if self.supervisor_status != SupervisorStatus::Pending {
            return Err(PlacementError::AlreadyReviewed {
                application_id: self.id.clone(),
                track: "supervisor",
            });
        }

        match decision {
            SupervisorDecision::Approve => {
                self.supervisor_status = SupervisorStatus::Approved;
            }
            SupervisorDecision::Reject => {
                self.supervisor_status = SupervisorStatus::Rejected;
                self.rejection_note = comments.clone();
            }
            SupervisorDecision::RequestChanges {
                reason,
                fields_to_edit,
            } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(PlacementError::validation(
                        "requesting changes requires a reason",
                    ));
                }
                self.supervisor_status = SupervisorStatus::ChangesRequested;
                self.rejection_feedback = Some(RejectionFeedback {
                    reason: reason.to_string(),
                    fields_to_edit: fields_to_edit
                        .iter()
                        .map(|field| field.trim().to_string())
                        .filter(|field| !field.is_empty())
                        .collect(),
                    requested_at: at,
                });
            }
        }

        self.supervisor_comments = comments;
        self.touch(at);
        Ok(())
    }

    /// Hand the application back to the supervisor after requested edits.
    ///
    /// There is no cap on the number of cycles; `resubmission_count` records how many occurred.
    pub fn resubmit(&mut self, at: DateTime<Utc>) -> Result<(), PlacementError> {
        if self.supervisor_status != SupervisorStatus::ChangesRequested {
            return Err(PlacementError::invalid_transition(
                "resubmit application",
                format!("supervisor status is {}", self.supervisor_status.label()),
            ));
        }

        self.supervisor_status = SupervisorStatus::Pending;
        self.resubmission_count = self.resubmission_count.saturating_add(1);
        self.touch(at);
        Ok(())
    }

    pub fn review_by_company(
        &mut self,
        decision: CompanyDecision,
        comments: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), PlacementError> {
        if self.supervisor_status != SupervisorStatus::Approved {
            return Err(PlacementError::invalid_transition(
                "review application as company",
                format!("supervisor status is {}", self.supervisor_status.label()),
            ));
        }
        if self.company_status != CompanyStatus::Pending {
            return Err(PlacementError::AlreadyReviewed {
                application_id: self.id.clone(),
                track: "company",
            });
        }

        match decision {
            CompanyDecision::Approve => self.company_status = CompanyStatus::Approved,
            CompanyDecision::Reject => {
                self.company_status = CompanyStatus::Rejected;
                self.rejection_note = comments.clone();
            }
        }

        self.company_comments = comments;
        self.touch(at);
        Ok(())
    }

    /// Schedule or reschedule the interview. Returns `false` when the stored details already
    /// match, in which case nothing changes.
    pub fn schedule_interview(
        &mut self,
        details: InterviewDetails,
        at: DateTime<Utc>,
    ) -> Result<bool, PlacementError> {
        if self.supervisor_status != SupervisorStatus::Approved
            || self.company_status != CompanyStatus::Approved
        {
            return Err(PlacementError::invalid_transition(
                "schedule interview",
                format!(
                    "supervisor status is {} and company status is {}",
                    self.supervisor_status.label(),
                    self.company_status.label()
                ),
            ));
        }
        if !matches!(
            self.application_status,
            ApplicationStatus::Pending | ApplicationStatus::InterviewScheduled
        ) {
            return Err(PlacementError::invalid_transition(
                "schedule interview",
                format!("application is {}", self.application_status.label()),
            ));
        }
        if details.location.trim().is_empty() {
            return Err(PlacementError::validation(
                "interview details require a location or meeting link",
            ));
        }

        if self.application_status == ApplicationStatus::InterviewScheduled
            && self.interview_details.as_ref() == Some(&details)
        {
            return Ok(false);
        }

        self.application_status = ApplicationStatus::InterviewScheduled;
        self.interview_details = Some(details);
        self.touch(at);
        Ok(true)
    }

    pub fn record_interview_outcome(
        &mut self,
        outcome: InterviewOutcome,
        at: DateTime<Utc>,
    ) -> Result<(), PlacementError> {
        if self.application_status != ApplicationStatus::InterviewScheduled {
            return Err(PlacementError::invalid_transition(
                "record interview outcome",
                format!("application is {}", self.application_status.label()),
            ));
        }

        match outcome {
            InterviewOutcome::Passed => {
                self.application_status = ApplicationStatus::InterviewDone;
            }
            InterviewOutcome::Failed => {
                self.application_status = ApplicationStatus::Rejected;
                if self.rejection_note.is_none() {
                    self.rejection_note = Some("interview not passed".to_string());
                }
            }
        }

        self.touch(at);
        Ok(())
    }

    pub fn hire(&mut self, offer: HiringOffer, at: DateTime<Utc>) -> Result<(), PlacementError> {
        if self.application_status != ApplicationStatus::InterviewDone {
            return Err(PlacementError::invalid_transition(
                "hire student",
                format!("application is {}", self.application_status.label()),
            ));
        }
        if offer.end_date <= offer.start_date {
            return Err(PlacementError::validation(format!(
                "placement end date {} must fall after start date {}",
                offer.end_date, offer.start_date
            )));
        }

        self.application_status = ApplicationStatus::Hired;
        self.is_currently_hired = true;
        self.hiring_date = Some(offer.hiring_date);
        self.start_date = Some(offer.start_date);
        self.end_date = Some(offer.end_date);
        self.touch(at);
        Ok(())
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.overall_status = OverallStatus::derive(
            self.supervisor_status,
            self.company_status,
            self.application_status,
        );
        self.updated_at = at;
        self.version = self.version.saturating_add(1);
    }
}
