//! Supervision admission: pairing each student with exactly one faculty supervisor.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CapacityView, SupervisionDecision, SupervisionRequest, SupervisionStatus, SUPERSEDED_COMMENT,
};
pub use repository::{SupervisionRepository, SupervisorAssignments};
pub use router::supervision_router;
pub use service::SupervisionAdmissionController;
