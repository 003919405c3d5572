//! Post-hire eligibility gate and the document flows it unlocks.

pub mod documents;
pub mod gate;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use documents::{
    AppraisalInput, DocumentBody, DocumentKind, JoiningReportInput, MisconductReportInput,
    PostHireDocument,
};
pub use gate::{EligibilityGate, EligibilityView, HiredContext};
pub use repository::{JoiningReportLedger, PostHireRepository};
pub use router::post_hire_router;
pub use service::PostHireDocumentService;
