use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::placement::ids::{RequestId, StudentId, SupervisorId};
use crate::workflows::placement::profiles::{
    PartySnapshot, StudentProfile, StudentSnapshot, SupervisorProfile,
};
use crate::workflows::placement::PlacementError;

/// Comment stamped on sibling requests rejected by another supervisor's acceptance.
pub const SUPERSEDED_COMMENT: &str = "superseded by acceptance elsewhere";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SupervisionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SupervisionStatus::Pending => "pending",
            SupervisionStatus::Accepted => "accepted",
            SupervisionStatus::Rejected => "rejected",
        }
    }
}

/// Supervisor's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisionDecision {
    Accepted,
    Rejected,
}

impl SupervisionDecision {
    pub const fn status(self) -> SupervisionStatus {
        match self {
            SupervisionDecision::Accepted => SupervisionStatus::Accepted,
            SupervisionDecision::Rejected => SupervisionStatus::Rejected,
        }
    }
}

/// A student's request to be supervised, with write-time snapshots of both parties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionRequest {
    pub id: RequestId,
    pub student_id: StudentId,
    pub supervisor_id: SupervisorId,
    pub student: StudentSnapshot,
    pub supervisor: PartySnapshot,
    pub status: SupervisionStatus,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub version: u64,
}

impl SupervisionRequest {
    pub fn new(
        id: RequestId,
        student: &StudentProfile,
        supervisor: &SupervisorProfile,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_id: student.id.clone(),
            supervisor_id: supervisor.id.clone(),
            student: StudentSnapshot::from(student),
            supervisor: PartySnapshot::from(supervisor),
            status: SupervisionStatus::Pending,
            requested_at,
            responded_at: None,
            comments: None,
            version: 1,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SupervisionStatus::Pending
    }

    /// Move a pending request to its final status. Bumps the version.
    pub fn resolve(
        &mut self,
        status: SupervisionStatus,
        comments: Option<String>,
        responded_at: DateTime<Utc>,
    ) -> Result<(), PlacementError> {
        if !self.is_pending() {
            return Err(PlacementError::invalid_transition(
                "respond to supervision request",
                format!("request is {}", self.status.label()),
            ));
        }
        if status == SupervisionStatus::Pending {
            return Err(PlacementError::validation(
                "a response must accept or reject the request",
            ));
        }

        self.status = status;
        self.responded_at = Some(responded_at);
        self.comments = comments;
        self.version = self.version.saturating_add(1);
        Ok(())
    }
}

/// Accepted-slot accounting for a supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityView {
    pub supervisor_id: SupervisorId,
    pub max_students: u32,
    pub accepted: u32,
    pub remaining: u32,
}

impl CapacityView {
    pub fn new(supervisor_id: SupervisorId, max_students: u32, accepted: u32) -> Self {
        Self {
            supervisor_id,
            max_students,
            accepted,
            remaining: max_students.saturating_sub(accepted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SupervisionRequest {
        let student = StudentProfile {
            id: StudentId::new("stu-1"),
            name: "Ayesha Khan".to_string(),
            email: "ayesha@uni.test".to_string(),
            department: "Computer Science".to_string(),
            semester: 7,
            gpa: 3.4,
            selected_supervisor_id: None,
        };
        let supervisor = SupervisorProfile {
            id: SupervisorId::new("sup-1"),
            name: "Dr. Malik".to_string(),
            email: "malik@uni.test".to_string(),
            department: "Computer Science".to_string(),
            max_students: Some(2),
        };
        SupervisionRequest::new(RequestId::new("req-1"), &student, &supervisor, Utc::now())
    }

    #[test]
    fn resolve_stamps_response_and_bumps_version() {
        let mut request = request();
        request
            .resolve(
                SupervisionStatus::Accepted,
                Some("welcome".to_string()),
                Utc::now(),
            )
            .expect("pending request resolves");

        assert_eq!(request.status, SupervisionStatus::Accepted);
        assert!(request.responded_at.is_some());
        assert_eq!(request.version, 2);
    }

    #[test]
    fn resolve_refuses_finalised_requests() {
        let mut request = request();
        request
            .resolve(SupervisionStatus::Rejected, None, Utc::now())
            .expect("first response");

        let err = request
            .resolve(SupervisionStatus::Accepted, None, Utc::now())
            .expect_err("second response refused");
        assert!(err.to_string().contains("rejected"));
        assert_eq!(request.version, 2);
    }

    #[test]
    fn capacity_view_saturates_remaining() {
        let view = CapacityView::new(SupervisorId::new("sup-1"), 2, 3);
        assert_eq!(view.remaining, 0);
    }
}
