use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::ids::{ApplicationId, CompanyId, RequestId, StudentId, SupervisorId};
use super::profiles::ProfileError;
use super::store::{Constraint, RepositoryError};

/// Coarse classification returned to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No matching record, or the record is not in the pre-state the operation expects.
    NotFound,
    Conflict,
    InvalidTransition,
    Validation,
    Unavailable,
}

impl ErrorKind {
    pub const fn label(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Unavailable => "unavailable",
        }
    }

    pub const fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict | ErrorKind::InvalidTransition => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Error raised by the placement services.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("no pending supervision request {request_id} for supervisor {supervisor_id}")]
    RequestNotFound {
        request_id: RequestId,
        supervisor_id: SupervisorId,
    },
    #[error("supervision request {0} not found")]
    UnknownRequest(RequestId),
    #[error("application {application_id} already reviewed on the {track} track")]
    AlreadyReviewed {
        application_id: ApplicationId,
        track: &'static str,
    },
    #[error("student {0} has no current placement")]
    NoCurrentPlacement(StudentId),
    #[error("student {student_id} was never hired by company {company_id}")]
    NotPlacedWith {
        student_id: StudentId,
        company_id: CompanyId,
    },
    #[error("student {0} already has a pending supervision request")]
    AlreadyPending(StudentId),
    #[error("student {0} already has an accepted supervisor")]
    AlreadyAssigned(StudentId),
    #[error("supervisor {supervisor_id} is at capacity ({max_students} students)")]
    CapacityExceeded {
        supervisor_id: SupervisorId,
        max_students: u32,
    },
    #[error("student {0} already applied to this job")]
    DuplicateApplication(StudentId),
    #[error("student {0} already holds a current placement")]
    AlreadyHired(StudentId),
    #[error("student {0} already filed a joining report")]
    DuplicateJoiningReport(StudentId),
    #[error("student {0} holds more than one current placement")]
    AmbiguousPlacement(StudentId),
    #[error("concurrent update on {entity} not resolved after {attempts} attempts")]
    CommitConflict { entity: String, attempts: u8 },
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: String,
    },
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PlacementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlacementError::ApplicationNotFound(_)
            | PlacementError::RequestNotFound { .. }
            | PlacementError::UnknownRequest(_)
            | PlacementError::AlreadyReviewed { .. }
            | PlacementError::NoCurrentPlacement(_)
            | PlacementError::NotPlacedWith { .. } => ErrorKind::NotFound,
            PlacementError::AlreadyPending(_)
            | PlacementError::AlreadyAssigned(_)
            | PlacementError::CapacityExceeded { .. }
            | PlacementError::DuplicateApplication(_)
            | PlacementError::AlreadyHired(_)
            | PlacementError::DuplicateJoiningReport(_)
            | PlacementError::AmbiguousPlacement(_)
            | PlacementError::CommitConflict { .. } => ErrorKind::Conflict,
            PlacementError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            PlacementError::Validation(_) => ErrorKind::Validation,
            PlacementError::Profile(ProfileError::NotFound { .. }) => ErrorKind::NotFound,
            PlacementError::Profile(ProfileError::Unavailable(_)) => ErrorKind::Unavailable,
            PlacementError::Repository(err) => match err {
                RepositoryError::NotFound => ErrorKind::NotFound,
                RepositoryError::Conflict
                | RepositoryError::StaleVersion { .. }
                | RepositoryError::Constraint(_) => ErrorKind::Conflict,
                RepositoryError::Unavailable(_) => ErrorKind::Unavailable,
            },
        }
    }

    pub(crate) fn invalid_transition(operation: &'static str, state: impl Into<String>) -> Self {
        Self::InvalidTransition {
            operation,
            state: state.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Translate a commit-time constraint into the caller-facing conflict for `student`.
    pub(crate) fn from_constraint(
        constraint: Constraint,
        student_id: &StudentId,
        supervisor: Option<(&SupervisorId, u32)>,
    ) -> Self {
        match constraint {
            Constraint::StudentHasPendingRequest => Self::AlreadyPending(student_id.clone()),
            Constraint::StudentHasAcceptedRequest => Self::AlreadyAssigned(student_id.clone()),
            Constraint::SupervisorAtCapacity => match supervisor {
                Some((supervisor_id, max_students)) => Self::CapacityExceeded {
                    supervisor_id: supervisor_id.clone(),
                    max_students,
                },
                None => Self::Repository(RepositoryError::Constraint(constraint)),
            },
            Constraint::DuplicateApplication => Self::DuplicateApplication(student_id.clone()),
            Constraint::StudentAlreadyHired => Self::AlreadyHired(student_id.clone()),
            Constraint::JoiningReportExists => Self::DuplicateJoiningReport(student_id.clone()),
        }
    }
}

impl IntoResponse for PlacementError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let payload = json!({
            "error": self.to_string(),
            "kind": kind.label(),
        });
        (kind.status_code(), Json(payload)).into_response()
    }
}
