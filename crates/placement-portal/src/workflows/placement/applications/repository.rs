use super::domain::ApplicationRecord;
use crate::workflows::placement::ids::{ApplicationId, CompanyId, StudentId, SupervisorId};
use crate::workflows::placement::store::RepositoryError;

/// Storage seam for applications.
pub trait ApplicationRepository: Send + Sync {
    /// Store a new application.
    ///
    /// Fails with `Constraint::DuplicateApplication` when the student already applied to the job.
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;

    /// Replace the stored record when its version still equals `expected_version`.
    fn update_if_version(
        &self,
        record: ApplicationRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError>;

    /// Commit a hire: version check plus `Constraint::StudentAlreadyHired` when another of the
    /// student's applications is currently hired, evaluated atomically.
    fn commit_hire(
        &self,
        record: ApplicationRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError>;

    fn for_student(&self, student_id: &StudentId) -> Result<Vec<ApplicationRecord>, RepositoryError>;

    fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;

    fn for_company(&self, company_id: &CompanyId) -> Result<Vec<ApplicationRecord>, RepositoryError>;

    /// Applications of the student flagged `is_currently_hired`.
    fn currently_hired(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}
