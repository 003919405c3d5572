use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

pub(super) use crate::workflows::placement::fixtures::*;
use crate::workflows::placement::ids::{RequestId, StudentId, SupervisorId};
use crate::workflows::placement::memory::{
    InMemoryDirectory, InMemorySupervisionStore, RecordingNotifications,
};
use crate::workflows::placement::store::RepositoryError;
use crate::workflows::placement::supervision::{
    SupervisionAdmissionController, SupervisionRepository, SupervisionRequest,
};

pub(super) fn request(harness: &Harness, student: &str, supervisor: &str) -> SupervisionRequest {
    harness
        .controller()
        .request_supervision(&StudentId::new(student), &SupervisorId::new(supervisor))
        .expect("request filed")
}

/// Request store whose conditional commits lose the version race a set number of times.
pub(super) struct ContendedRequests {
    inner: Arc<InMemorySupervisionStore>,
    conflicts_left: AtomicU32,
    commits: AtomicU32,
}

impl ContendedRequests {
    pub(super) fn new(inner: Arc<InMemorySupervisionStore>, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts_left: AtomicU32::new(conflicts),
            commits: AtomicU32::new(0),
        }
    }

    pub(super) fn commits(&self) -> u32 {
        self.commits.load(Ordering::SeqCst)
    }

    fn contend(&self, expected_version: u64) -> Result<(), RepositoryError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        let lost = self
            .conflicts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if lost {
            Err(RepositoryError::StaleVersion {
                expected: expected_version,
                found: expected_version + 1,
            })
        } else {
            Ok(())
        }
    }
}

impl SupervisionRepository for ContendedRequests {
    fn insert_pending(
        &self,
        request: SupervisionRequest,
    ) -> Result<SupervisionRequest, RepositoryError> {
        self.inner.insert_pending(request)
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<SupervisionRequest>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError> {
        self.inner.for_student(student_id)
    }

    fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError> {
        self.inner.for_supervisor(supervisor_id)
    }

    fn count_accepted(&self, supervisor_id: &SupervisorId) -> Result<u32, RepositoryError> {
        self.inner.count_accepted(supervisor_id)
    }

    fn update_if_version(
        &self,
        request: SupervisionRequest,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        self.contend(expected_version)?;
        self.inner.update_if_version(request, expected_version)
    }

    fn commit_acceptance(
        &self,
        request: SupervisionRequest,
        expected_version: u64,
        max_students: u32,
    ) -> Result<(), RepositoryError> {
        self.contend(expected_version)?;
        self.inner
            .commit_acceptance(request, expected_version, max_students)
    }

    fn supersede_pending(
        &self,
        student_id: &StudentId,
        accepted: &RequestId,
        responded_at: DateTime<Utc>,
        comment: &str,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError> {
        self.inner
            .supersede_pending(student_id, accepted, responded_at, comment)
    }
}

pub(super) fn contended_controller(
    harness: &Harness,
    store: Arc<ContendedRequests>,
) -> SupervisionAdmissionController<ContendedRequests, InMemoryDirectory, RecordingNotifications>
{
    SupervisionAdmissionController::new(
        store,
        harness.directory.clone(),
        harness.notifications.clone(),
        config(),
    )
}
