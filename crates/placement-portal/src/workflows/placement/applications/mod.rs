//! Application lifecycle: supervisor and company vetting, interview, and hire.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationRecord, ApplicationStatus, CompanyDecision, CompanyStatus, HiringOffer,
    InterviewDetails, InterviewOutcome, OverallStatus, RejectionFeedback, SupervisorDecision,
    SupervisorStatus,
};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::ApplicationStatusEngine;
