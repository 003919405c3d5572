//! Read-only profile directory plus the one write the admission controller performs on it.
//!
//! Snapshots taken from these profiles are copied onto requests and applications when they are
//! created and never refreshed afterwards; later profile edits do not rewrite history.

use serde::{Deserialize, Serialize};

use super::ids::{CompanyId, JobId, StudentId, SupervisorId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub department: String,
    pub semester: u8,
    pub gpa: f32,
    pub selected_supervisor_id: Option<SupervisorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorProfile {
    pub id: SupervisorId,
    pub name: String,
    pub email: String,
    pub department: String,
    /// Explicit capacity; `None` falls back to the configured default.
    pub max_students: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub company_id: CompanyId,
    pub title: String,
}

/// Student attributes frozen onto a record at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSnapshot {
    pub name: String,
    pub email: String,
    pub department: String,
    pub semester: u8,
    pub gpa: f32,
}

impl From<&StudentProfile> for StudentSnapshot {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            department: profile.department.clone(),
            semester: profile.semester,
            gpa: profile.gpa,
        }
    }
}

/// Name and contact of a supervisor or company, frozen at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub name: String,
    pub email: String,
}

impl From<&SupervisorProfile> for PartySnapshot {
    fn from(profile: &SupervisorProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }
}

impl From<&CompanyProfile> for PartySnapshot {
    fn from(profile: &CompanyProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }
}

/// Directory of basic student, supervisor, company and job attributes.
pub trait ProfileLookup: Send + Sync {
    fn student(&self, id: &StudentId) -> Result<StudentProfile, ProfileError>;
    fn supervisor(&self, id: &SupervisorId) -> Result<SupervisorProfile, ProfileError>;
    fn company(&self, id: &CompanyId) -> Result<CompanyProfile, ProfileError>;
    fn job(&self, id: &JobId) -> Result<JobPosting, ProfileError>;
}

/// Back-reference maintenance for a student's accepted supervisor.
pub trait StudentRoster: Send + Sync {
    fn assign_supervisor(
        &self,
        student_id: &StudentId,
        supervisor_id: &SupervisorId,
    ) -> Result<(), ProfileError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("profile directory unavailable: {0}")]
    Unavailable(String),
}

impl ProfileError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
