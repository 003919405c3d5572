//! Supervision admission, application lifecycle, and post-hire eligibility.
//!
//! Each submodule pairs a repository trait (the document store seam) with a service that
//! owns the state machine and an axum router for the surrounding HTTP layer. Collaborators
//! such as the notification sink and profile directory are injected as `Arc<T>`.

pub mod applications;
pub mod eligibility;
mod error;
#[cfg(test)]
pub(crate) mod fixtures;
mod ids;
pub mod memory;
pub mod notifications;
pub mod profiles;
pub mod store;
pub mod supervision;

pub use error::{ErrorKind, PlacementError};
pub use ids::{ApplicationId, CompanyId, DocumentId, JobId, RequestId, StudentId, SupervisorId};
pub use notifications::{Notification, NotificationError, NotificationKind, NotificationSink};
pub use profiles::{ProfileError, ProfileLookup, StudentRoster};
pub use store::{Constraint, RepositoryError};
