use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::repository::JoiningReportLedger;
use crate::workflows::placement::applications::{
    ApplicationRecord, ApplicationRepository, ApplicationStatus,
};
use crate::workflows::placement::ids::{ApplicationId, CompanyId, JobId, StudentId, SupervisorId};
use crate::workflows::placement::PlacementError;

/// Placement facts copied onto post-hire documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiredContext {
    pub application_id: ApplicationId,
    pub company_id: CompanyId,
    pub supervisor_id: SupervisorId,
    pub job_id: JobId,
    pub job_title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl HiredContext {
    fn from_record(record: &ApplicationRecord) -> Result<Self, PlacementError> {
        let (Some(start_date), Some(end_date)) = (record.start_date, record.end_date) else {
            return Err(PlacementError::invalid_transition(
                "resolve hired context",
                format!("application {} carries no placement dates", record.id),
            ));
        };
        Ok(Self {
            application_id: record.id.clone(),
            company_id: record.company_id.clone(),
            supervisor_id: record.supervisor_id.clone(),
            job_id: record.job_id.clone(),
            job_title: record.job_title.clone(),
            start_date,
            end_date,
        })
    }
}

/// Answer returned by the eligibility endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityView {
    pub student_id: StudentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    pub eligible: bool,
}

/// Read-only queries over the application store deciding which post-hire documents may exist.
///
/// Every answer is computed from the live application records; nothing here is cached.
pub struct EligibilityGate<A, L> {
    applications: Arc<A>,
    ledger: Arc<L>,
}

impl<A, L> EligibilityGate<A, L>
where
    A: ApplicationRepository + 'static,
    L: JoiningReportLedger + 'static,
{
    pub fn new(applications: Arc<A>, ledger: Arc<L>) -> Self {
        Self {
            applications,
            ledger,
        }
    }

    /// True when the student holds exactly one current placement and has not filed a joining
    /// report yet.
    pub fn is_eligible_for_joining_report(
        &self,
        student_id: &StudentId,
    ) -> Result<bool, PlacementError> {
        let hired = self.applications.currently_hired(student_id)?;
        if hired.len() != 1 {
            debug!(%student_id, placements = hired.len(), "joining report gate closed");
            return Ok(false);
        }
        Ok(!self.ledger.has_joining_report(student_id)?)
    }

    /// True when some application of the student to `company_id` reached `hired`.
    pub fn is_eligible_for_appraisal(
        &self,
        student_id: &StudentId,
        company_id: &CompanyId,
    ) -> Result<bool, PlacementError> {
        Ok(self.hired_with(student_id, company_id)?.is_some())
    }

    /// Context of the student's single current placement.
    pub fn resolve_hired_context(
        &self,
        student_id: &StudentId,
    ) -> Result<HiredContext, PlacementError> {
        let hired = self.applications.currently_hired(student_id)?;
        match hired.as_slice() {
            [] => Err(PlacementError::NoCurrentPlacement(student_id.clone())),
            [record] => HiredContext::from_record(record),
            _ => Err(PlacementError::AmbiguousPlacement(student_id.clone())),
        }
    }

    /// Context of the hired application linking the student to `company_id`.
    pub fn hired_context_with(
        &self,
        student_id: &StudentId,
        company_id: &CompanyId,
    ) -> Result<HiredContext, PlacementError> {
        let record = self.hired_with(student_id, company_id)?.ok_or_else(|| {
            PlacementError::NotPlacedWith {
                student_id: student_id.clone(),
                company_id: company_id.clone(),
            }
        })?;
        HiredContext::from_record(&record)
    }

    pub(crate) fn ledger(&self) -> &L {
        &self.ledger
    }

    fn hired_with(
        &self,
        student_id: &StudentId,
        company_id: &CompanyId,
    ) -> Result<Option<ApplicationRecord>, PlacementError> {
        Ok(self
            .applications
            .for_student(student_id)?
            .into_iter()
            .find(|record| {
                &record.company_id == company_id
                    && record.application_status() == ApplicationStatus::Hired
            }))
    }
}
