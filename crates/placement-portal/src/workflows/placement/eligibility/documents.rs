use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::gate::HiredContext;
use crate::workflows::placement::ids::{CompanyId, DocumentId, StudentId};
use crate::workflows::placement::PlacementError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    JoiningReport,
    Appraisal,
    MisconductReport,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::JoiningReport => "joining_report",
            DocumentKind::Appraisal => "appraisal",
            DocumentKind::MisconductReport => "misconduct_report",
        }
    }
}

/// Document-specific content. Rendering is handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBody {
    JoiningReport {
        reported_on: NaiveDate,
        summary: String,
    },
    Appraisal {
        rating: u8,
        comments: String,
    },
    MisconductReport {
        incident_date: NaiveDate,
        description: String,
    },
}

impl DocumentBody {
    pub const fn kind(&self) -> DocumentKind {
        match self {
            DocumentBody::JoiningReport { .. } => DocumentKind::JoiningReport,
            DocumentBody::Appraisal { .. } => DocumentKind::Appraisal,
            DocumentBody::MisconductReport { .. } => DocumentKind::MisconductReport,
        }
    }
}

/// A post-hire document stamped with the placement it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostHireDocument {
    pub id: DocumentId,
    pub student_id: StudentId,
    pub context: HiredContext,
    pub filed_by: String,
    pub filed_at: DateTime<Utc>,
    pub body: DocumentBody,
}

impl PostHireDocument {
    pub fn kind(&self) -> DocumentKind {
        self.body.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoiningReportInput {
    pub student_id: StudentId,
    pub reported_on: NaiveDate,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppraisalInput {
    pub company_id: CompanyId,
    pub student_id: StudentId,
    pub rating: u8,
    #[serde(default)]
    pub comments: String,
}

impl AppraisalInput {
    pub(crate) fn validate(&self) -> Result<(), PlacementError> {
        if !(1..=5).contains(&self.rating) {
            return Err(PlacementError::validation(format!(
                "appraisal rating must be between 1 and 5 (found {})",
                self.rating
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MisconductReportInput {
    pub company_id: CompanyId,
    pub student_id: StudentId,
    pub incident_date: NaiveDate,
    pub description: String,
}

impl MisconductReportInput {
    pub(crate) fn validate(&self) -> Result<(), PlacementError> {
        if self.description.trim().is_empty() {
            return Err(PlacementError::validation(
                "misconduct report requires a description",
            ));
        }
        Ok(())
    }
}
