use super::documents::PostHireDocument;
use crate::workflows::placement::ids::StudentId;
use crate::workflows::placement::store::RepositoryError;

/// The one question the gate asks of whoever owns joining reports.
pub trait JoiningReportLedger: Send + Sync {
    fn has_joining_report(&self, student_id: &StudentId) -> Result<bool, RepositoryError>;
}

/// Storage for post-hire documents.
pub trait PostHireRepository: JoiningReportLedger {
    /// Store a document. Joining reports fail with `Constraint::JoiningReportExists` when the
    /// student already has one.
    fn insert(&self, document: PostHireDocument) -> Result<PostHireDocument, RepositoryError>;

    fn for_student(&self, student_id: &StudentId) -> Result<Vec<PostHireDocument>, RepositoryError>;
}
