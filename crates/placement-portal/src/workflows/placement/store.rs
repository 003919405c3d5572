//! Error vocabulary shared by every repository seam.
//!
//! Repositories model a document store that supports single-document conditional updates
//! ("write only if the stored version still matches") plus the handful of cross-document
//! uniqueness constraints the portal relies on. Implementations must check a constraint and
//! apply the write under the same atomic step.

use serde::Serialize;

/// Cross-record constraint enforced at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    #[error("student already has a pending supervision request")]
    StudentHasPendingRequest,
    #[error("student already has an accepted supervision request")]
    StudentHasAcceptedRequest,
    #[error("supervisor has no remaining capacity")]
    SupervisorAtCapacity,
    #[error("student already applied to this job")]
    DuplicateApplication,
    #[error("student already holds a current placement")]
    StudentAlreadyHired,
    #[error("joining report already filed for student")]
    JoiningReportExists,
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("stale write: expected version {expected}, found {found}")]
    StaleVersion { expected: u64, found: u64 },
    #[error("constraint violated: {0}")]
    Constraint(Constraint),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<Constraint> for RepositoryError {
    fn from(value: Constraint) -> Self {
        Self::Constraint(value)
    }
}
