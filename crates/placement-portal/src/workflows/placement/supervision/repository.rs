use chrono::{DateTime, Utc};

use super::domain::{SupervisionRequest, SupervisionStatus};
use crate::workflows::placement::ids::{RequestId, StudentId, SupervisorId};
use crate::workflows::placement::store::RepositoryError;

/// Storage seam for supervision requests.
///
/// Every mutating method is a single conditional commit: implementations evaluate the stated
/// preconditions and apply the write without letting another writer interleave.
pub trait SupervisionRepository: Send + Sync {
    /// Store a new pending request.
    ///
    /// Fails with `Constraint::StudentHasPendingRequest` or
    /// `Constraint::StudentHasAcceptedRequest` when the student is not free to ask.
    fn insert_pending(
        &self,
        request: SupervisionRequest,
    ) -> Result<SupervisionRequest, RepositoryError>;

    fn fetch(&self, id: &RequestId) -> Result<Option<SupervisionRequest>, RepositoryError>;

    fn for_student(&self, student_id: &StudentId)
        -> Result<Vec<SupervisionRequest>, RepositoryError>;

    fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError>;

    fn count_accepted(&self, supervisor_id: &SupervisorId) -> Result<u32, RepositoryError>;

    /// Replace the stored request when its version still equals `expected_version`.
    fn update_if_version(
        &self,
        request: SupervisionRequest,
        expected_version: u64,
    ) -> Result<(), RepositoryError>;

    /// Commit an acceptance.
    ///
    /// In one atomic step: the stored version must equal `expected_version`, the student must
    /// hold no other accepted request, and the supervisor's accepted count must be below
    /// `max_students`.
    fn commit_acceptance(
        &self,
        request: SupervisionRequest,
        expected_version: u64,
        max_students: u32,
    ) -> Result<(), RepositoryError>;

    /// Reject every pending request of `student_id` other than `accepted`, returning the
    /// records that were changed.
    fn supersede_pending(
        &self,
        student_id: &StudentId,
        accepted: &RequestId,
        responded_at: DateTime<Utc>,
        comment: &str,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError>;
}

/// Read side other workflows consult to learn who supervises a student.
pub trait SupervisorAssignments: Send + Sync {
    /// The supervisor named by the student's accepted request, if one exists.
    fn accepted_supervisor(
        &self,
        student_id: &StudentId,
    ) -> Result<Option<SupervisorId>, RepositoryError>;
}

impl<T: SupervisionRepository> SupervisorAssignments for T {
    fn accepted_supervisor(
        &self,
        student_id: &StudentId,
    ) -> Result<Option<SupervisorId>, RepositoryError> {
        Ok(self
            .for_student(student_id)?
            .into_iter()
            .find(|request| request.status == SupervisionStatus::Accepted)
            .map(|request| request.supervisor_id))
    }
}
