use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub(super) use crate::workflows::placement::fixtures::*;
use crate::workflows::placement::applications::{
    ApplicationRecord, ApplicationRepository, ApplicationStatusEngine,
};
use crate::workflows::placement::ids::{
    ApplicationId, CompanyId, JobId, StudentId, SupervisorId,
};
use crate::workflows::placement::memory::{
    InMemoryApplicationStore, InMemoryDirectory, InMemorySupervisionStore, RecordingNotifications,
};
use crate::workflows::placement::notifications::{
    Notification, NotificationError, NotificationSink,
};
use crate::workflows::placement::profiles::{
    CompanyProfile, JobPosting, ProfileError, ProfileLookup, StudentProfile, StudentRoster,
    SupervisorProfile,
};
use crate::workflows::placement::store::RepositoryError;
use crate::workflows::placement::supervision::SupervisionAdmissionController;

/// Sink whose transport is always down.
#[derive(Default)]
pub(super) struct OfflineNotifications;

impl NotificationSink for OfflineNotifications {
    fn notify(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("mail relay offline".to_string()))
    }
}

pub(super) fn offline_engine(
    harness: &Harness,
) -> ApplicationStatusEngine<
    InMemoryApplicationStore,
    InMemorySupervisionStore,
    InMemoryDirectory,
    OfflineNotifications,
> {
    ApplicationStatusEngine::new(
        harness.applications.clone(),
        harness.requests.clone(),
        harness.directory.clone(),
        Arc::new(OfflineNotifications),
        config(),
    )
}

/// Directory that serves reads but cannot record a selected supervisor.
pub(super) struct OfflineRoster(pub(super) Arc<InMemoryDirectory>);

impl ProfileLookup for OfflineRoster {
    fn student(&self, id: &StudentId) -> Result<StudentProfile, ProfileError> {
        self.0.student(id)
    }

    fn supervisor(&self, id: &SupervisorId) -> Result<SupervisorProfile, ProfileError> {
        self.0.supervisor(id)
    }

    fn company(&self, id: &CompanyId) -> Result<CompanyProfile, ProfileError> {
        self.0.company(id)
    }

    fn job(&self, id: &JobId) -> Result<JobPosting, ProfileError> {
        self.0.job(id)
    }
}

impl StudentRoster for OfflineRoster {
    fn assign_supervisor(
        &self,
        _student_id: &StudentId,
        _supervisor_id: &SupervisorId,
    ) -> Result<(), ProfileError> {
        Err(ProfileError::Unavailable("roster service down".to_string()))
    }
}

pub(super) fn controller_with_offline_roster(
    harness: &Harness,
) -> SupervisionAdmissionController<InMemorySupervisionStore, OfflineRoster, RecordingNotifications>
{
    SupervisionAdmissionController::new(
        harness.requests.clone(),
        Arc::new(OfflineRoster(harness.directory.clone())),
        harness.notifications.clone(),
        config(),
    )
}

/// Application store whose conditional commits lose the version race a set number of times.
pub(super) struct ContendedApplications {
    inner: Arc<InMemoryApplicationStore>,
    conflicts_left: AtomicU32,
    commits: AtomicU32,
}

impl ContendedApplications {
    pub(super) fn new(inner: Arc<InMemoryApplicationStore>, conflicts: u32) -> Self {
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

impl ApplicationRepository for ContendedApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn update_if_version(
        &self,
        record: ApplicationRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        self.contend(expected_version)?;
        self.inner.update_if_version(record, expected_version)
    }

    fn commit_hire(
        &self,
        record: ApplicationRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        self.contend(expected_version)?;
        self.inner.commit_hire(record, expected_version)
    }

    fn for_student(&self, student_id: &StudentId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.for_student(student_id)
    }

    fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.for_supervisor(supervisor_id)
    }

    fn for_company(&self, company_id: &CompanyId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.for_company(company_id)
    }

    fn currently_hired(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.currently_hired(student_id)
    }
}

pub(super) fn contended_engine(
    harness: &Harness,
    store: Arc<ContendedApplications>,
) -> ApplicationStatusEngine<
    ContendedApplications,
    InMemorySupervisionStore,
    InMemoryDirectory,
    RecordingNotifications,
> {
    ApplicationStatusEngine::new(
        store,
        harness.requests.clone(),
        harness.directory.clone(),
        harness.notifications.clone(),
        config(),
    )
}
