use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    CapacityView, SupervisionDecision, SupervisionRequest, SupervisionStatus, SUPERSEDED_COMMENT,
};
use super::repository::{SupervisionRepository, SupervisorAssignments};
use crate::config::PlacementConfig;
use crate::workflows::placement::ids::{next_identifier, RequestId, StudentId, SupervisorId};
use crate::workflows::placement::notifications::{
    Notification, NotificationKind, NotificationSink, Notifier,
};
use crate::workflows::placement::profiles::{ProfileLookup, StudentRoster, SupervisorProfile};
use crate::workflows::placement::store::RepositoryError;
use crate::workflows::placement::PlacementError;

/// Admission controller for supervision requests.
///
/// Enforces one pending and one accepted request per student and the per-supervisor capacity.
/// The capacity check that matters is the one inside `commit_acceptance`; the check made when a
/// request is filed only spares supervisors who are already full.
pub struct SupervisionAdmissionController<R, P, N> {
    repository: Arc<R>,
    profiles: Arc<P>,
    notifier: Notifier<N>,
    config: PlacementConfig,
}

impl<R, P, N> SupervisionAdmissionController<R, P, N>
where
    R: SupervisionRepository + 'static,
    P: ProfileLookup + StudentRoster + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(
        repository: Arc<R>,
        profiles: Arc<P>,
        notifications: Arc<N>,
        config: PlacementConfig,
    ) -> Self {
        Self {
            repository,
            profiles,
            notifier: Notifier::new(notifications),
            config,
        }
    }

    /// File a pending request from `student_id` to `supervisor_id`.
    pub fn request_supervision(
        &self,
        student_id: &StudentId,
        supervisor_id: &SupervisorId,
    ) -> Result<SupervisionRequest, PlacementError> {
        let student = self.profiles.student(student_id)?;
        let supervisor = self.profiles.supervisor(supervisor_id)?;

        let existing = self.repository.for_student(student_id)?;
        if existing.iter().any(SupervisionRequest::is_pending) {
            return Err(PlacementError::AlreadyPending(student_id.clone()));
        }
        if existing
            .iter()
            .any(|request| request.status == SupervisionStatus::Accepted)
        {
            return Err(PlacementError::AlreadyAssigned(student_id.clone()));
        }

        let max_students = self.max_students(&supervisor);
        if self.repository.count_accepted(supervisor_id)? >= max_students {
            return Err(PlacementError::CapacityExceeded {
                supervisor_id: supervisor_id.clone(),
                max_students,
            });
        }

        let request = SupervisionRequest::new(
            RequestId(next_identifier("sup-req")),
            &student,
            &supervisor,
            Utc::now(),
        );
        let stored = self
            .repository
            .insert_pending(request)
            .map_err(|err| match err {
                RepositoryError::Constraint(constraint) => PlacementError::from_constraint(
                    constraint,
                    student_id,
                    Some((supervisor_id, max_students)),
                ),
                other => other.into(),
            })?;

        info!(
            request_id = %stored.id,
            %student_id,
            %supervisor_id,
            "supervision requested"
        );
        self.notifier.dispatch(Notification::new(
            supervisor_id,
            NotificationKind::SupervisionRequested,
            &stored.id,
            format!(
                "{} ({}, semester {}) requested your supervision",
                stored.student.name, stored.student.department, stored.student.semester
            ),
        ));

        Ok(stored)
    }

    /// Accept or reject a pending request addressed to `supervisor_id`.
    ///
    /// Acceptance is committed conditionally and retried on version conflicts. Once it lands, the
    /// student's roster entry is updated and competing pending requests are rejected; both
    /// follow-ups are best effort since a later acceptance re-validates the student.
    pub fn respond(
        &self,
        request_id: &RequestId,
        supervisor_id: &SupervisorId,
        decision: SupervisionDecision,
        comments: Option<String>,
    ) -> Result<SupervisionRequest, PlacementError> {
        let comments = comments
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let attempts = self.config.commit_retries.max(1);

        for attempt in 1..=attempts {
            let current = self.pending_request(request_id, supervisor_id)?;
            let expected_version = current.version;
            let mut updated = current;
            updated.resolve(decision.status(), comments.clone(), Utc::now())?;

            let (result, capacity) = match decision {
                SupervisionDecision::Accepted => {
                    let supervisor = self.profiles.supervisor(supervisor_id)?;
                    let max_students = self.max_students(&supervisor);
                    let result = self.repository.commit_acceptance(
                        updated.clone(),
                        expected_version,
                        max_students,
                    );
                    (result, Some(max_students))
                }
                SupervisionDecision::Rejected => (
                    self.repository
                        .update_if_version(updated.clone(), expected_version),
                    None,
                ),
            };

            match result {
                Ok(()) => {
                    if decision == SupervisionDecision::Accepted {
                        self.settle_acceptance(&updated);
                    }
                    info!(
                        %request_id,
                        student_id = %updated.student_id,
                        %supervisor_id,
                        status = updated.status.label(),
                        "supervision request answered"
                    );
                    self.notify_student(&updated);
                    return Ok(updated);
                }
                Err(RepositoryError::StaleVersion { expected, found }) => {
                    debug!(%request_id, attempt, expected, found, "request changed underneath; retrying");
                }
                Err(RepositoryError::Constraint(constraint)) => {
                    return Err(PlacementError::from_constraint(
                        constraint,
                        &updated.student_id,
                        capacity.map(|max| (supervisor_id, max)),
                    ));
                }
                Err(RepositoryError::NotFound) => {
                    return Err(PlacementError::RequestNotFound {
                        request_id: request_id.clone(),
                        supervisor_id: supervisor_id.clone(),
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }

        warn!(%request_id, attempts, "supervision response abandoned after repeated conflicts");
        Err(PlacementError::CommitConflict {
            entity: request_id.to_string(),
            attempts,
        })
    }

    pub fn request(&self, request_id: &RequestId) -> Result<SupervisionRequest, PlacementError> {
        self.repository
            .fetch(request_id)?
            .ok_or_else(|| PlacementError::UnknownRequest(request_id.clone()))
    }

    pub fn requests_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<SupervisionRequest>, PlacementError> {
        Ok(chronological(self.repository.for_student(student_id)?))
    }

    pub fn requests_for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<SupervisionRequest>, PlacementError> {
        Ok(chronological(self.repository.for_supervisor(supervisor_id)?))
    }

    pub fn capacity(&self, supervisor_id: &SupervisorId) -> Result<CapacityView, PlacementError> {
        let supervisor = self.profiles.supervisor(supervisor_id)?;
        let accepted = self.repository.count_accepted(supervisor_id)?;
        Ok(CapacityView::new(
            supervisor_id.clone(),
            self.max_students(&supervisor),
            accepted,
        ))
    }

    /// The supervisor named by the student's accepted request, if any.
    ///
    /// Read from the requests rather than the roster so a lagging roster update cannot hide an
    /// acceptance.
    pub fn selected_supervisor(
        &self,
        student_id: &StudentId,
    ) -> Result<Option<SupervisorId>, PlacementError> {
        Ok(self.repository.accepted_supervisor(student_id)?)
    }

    fn pending_request(
        &self,
        request_id: &RequestId,
        supervisor_id: &SupervisorId,
    ) -> Result<SupervisionRequest, PlacementError> {
        self.repository
            .fetch(request_id)?
            .filter(|request| request.is_pending() && &request.supervisor_id == supervisor_id)
            .ok_or_else(|| PlacementError::RequestNotFound {
                request_id: request_id.clone(),
                supervisor_id: supervisor_id.clone(),
            })
    }

    fn settle_acceptance(&self, accepted: &SupervisionRequest) {
        if let Err(err) = self
            .profiles
            .assign_supervisor(&accepted.student_id, &accepted.supervisor_id)
        {
            warn!(
                student_id = %accepted.student_id,
                supervisor_id = %accepted.supervisor_id,
                error = %err,
                "failed to record selected supervisor on student profile"
            );
        }

        let responded_at = accepted.responded_at.unwrap_or_else(Utc::now);
        match self.repository.supersede_pending(
            &accepted.student_id,
            &accepted.id,
            responded_at,
            SUPERSEDED_COMMENT,
        ) {
            Ok(superseded) if !superseded.is_empty() => info!(
                student_id = %accepted.student_id,
                superseded = superseded.len(),
                "competing supervision requests rejected"
            ),
            Ok(_) => {}
            Err(err) => warn!(
                student_id = %accepted.student_id,
                error = %err,
                "failed to reject competing supervision requests"
            ),
        }
    }

    fn notify_student(&self, request: &SupervisionRequest) {
        let (kind, verb) = match request.status {
            SupervisionStatus::Accepted => (NotificationKind::SupervisionAccepted, "accepted"),
            _ => (NotificationKind::SupervisionRejected, "declined"),
        };
        let mut message = format!("{} {verb} your supervision request", request.supervisor.name);
        if let Some(comments) = &request.comments {
            message.push_str(": ");
            message.push_str(comments);
        }

        self.notifier.dispatch(Notification::new(
            &request.student_id,
            kind,
            &request.id,
            message,
        ));
    }

    fn max_students(&self, supervisor: &SupervisorProfile) -> u32 {
        supervisor
            .max_students
            .unwrap_or(self.config.default_max_students)
    }
}

fn chronological(mut requests: Vec<SupervisionRequest>) -> Vec<SupervisionRequest> {
    requests.sort_by(|a, b| {
        a.requested_at
            .cmp(&b.requested_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    requests
}
