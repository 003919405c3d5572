//! In-process implementations of the storage and collaborator seams.
//!
//! Each store keeps its records behind one mutex so the conditional commits (version check plus
//! constraint check plus write) happen as a single step. Used by the API binary and by tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::warn;

use super::applications::{ApplicationRecord, ApplicationRepository};
use super::eligibility::{DocumentKind, JoiningReportLedger, PostHireDocument, PostHireRepository};
use super::ids::{ApplicationId, CompanyId, JobId, RequestId, StudentId, SupervisorId};
use super::notifications::{Notification, NotificationError, NotificationSink};
use super::profiles::{
    CompanyProfile, JobPosting, ProfileError, ProfileLookup, StudentProfile, StudentRoster,
    SupervisorProfile,
};
use super::store::{Constraint, RepositoryError};
use super::supervision::{SupervisionRepository, SupervisionRequest, SupervisionStatus};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

fn check_version(stored: u64, expected: u64) -> Result<(), RepositoryError> {
    if stored == expected {
        Ok(())
    } else {
        Err(RepositoryError::StaleVersion {
            expected,
            found: stored,
        })
    }
}

#[derive(Default, Clone)]
pub struct InMemorySupervisionStore {
    records: Arc<Mutex<HashMap<RequestId, SupervisionRequest>>>,
}

impl InMemorySupervisionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records as they are, skipping admission checks. Meant for imports of existing data.
    pub fn seed(
        &self,
        records: impl IntoIterator<Item = SupervisionRequest>,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        for record in records {
            guard.insert(record.id.clone(), record);
        }
        Ok(())
    }
}

impl SupervisionRepository for InMemorySupervisionStore {
    fn insert_pending(
        &self,
        request: SupervisionRequest,
    ) -> Result<SupervisionRequest, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        for existing in guard
            .values()
            .filter(|existing| existing.student_id == request.student_id)
        {
            match existing.status {
                SupervisionStatus::Pending => {
                    return Err(Constraint::StudentHasPendingRequest.into())
                }
                SupervisionStatus::Accepted => {
                    return Err(Constraint::StudentHasAcceptedRequest.into())
                }
                SupervisionStatus::Rejected => {}
            }
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<SupervisionRequest>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|request| &request.student_id == student_id)
            .cloned()
            .collect())
    }

    fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|request| &request.supervisor_id == supervisor_id)
            .cloned()
            .collect())
    }

    fn count_accepted(&self, supervisor_id: &SupervisorId) -> Result<u32, RepositoryError> {
        let guard = lock(&self.records)?;
        let accepted = guard
            .values()
            .filter(|request| {
                &request.supervisor_id == supervisor_id
                    && request.status == SupervisionStatus::Accepted
            })
            .count();
        Ok(u32::try_from(accepted).unwrap_or(u32::MAX))
    }

    fn update_if_version(
        &self,
        request: SupervisionRequest,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.get(&request.id).ok_or(RepositoryError::NotFound)?;
        check_version(stored.version, expected_version)?;
        guard.insert(request.id.clone(), request);
        Ok(())
    }

    fn commit_acceptance(
        &self,
        request: SupervisionRequest,
        expected_version: u64,
        max_students: u32,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.get(&request.id).ok_or(RepositoryError::NotFound)?;
        check_version(stored.version, expected_version)?;

        let others = || {
            guard
                .values()
                .filter(|other| {
                    other.id != request.id && other.status == SupervisionStatus::Accepted
                })
        };
        if others().any(|other| other.student_id == request.student_id) {
            return Err(Constraint::StudentHasAcceptedRequest.into());
        }
        let accepted = others()
            .filter(|other| other.supervisor_id == request.supervisor_id)
            .count();
        if accepted >= max_students as usize {
            return Err(Constraint::SupervisorAtCapacity.into());
        }

        guard.insert(request.id.clone(), request);
        Ok(())
    }

    fn supersede_pending(
        &self,
        student_id: &StudentId,
        accepted: &RequestId,
        responded_at: DateTime<Utc>,
        comment: &str,
    ) -> Result<Vec<SupervisionRequest>, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let mut superseded = Vec::new();
        for request in guard.values_mut().filter(|request| {
            &request.student_id == student_id && &request.id != accepted && request.is_pending()
        }) {
            if request
                .resolve(
                    SupervisionStatus::Rejected,
                    Some(comment.to_string()),
                    responded_at,
                )
                .is_ok()
            {
                superseded.push(request.clone());
            }
        }
        Ok(superseded)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryApplicationStore {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl InMemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn select<F>(&self, predicate: F) -> Result<Vec<ApplicationRecord>, RepositoryError>
    where
        F: Fn(&ApplicationRecord) -> bool,
    {
        Ok(lock(&self.records)?
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }
}

impl ApplicationRepository for InMemoryApplicationStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        if guard
            .values()
            .any(|other| other.student_id == record.student_id && other.job_id == record.job_id)
        {
            return Err(Constraint::DuplicateApplication.into());
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn update_if_version(
        &self,
        record: ApplicationRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.get(&record.id).ok_or(RepositoryError::NotFound)?;
        check_version(stored.version, expected_version)?;
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn commit_hire(
        &self,
        record: ApplicationRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let stored = guard.get(&record.id).ok_or(RepositoryError::NotFound)?;
        check_version(stored.version, expected_version)?;
        if guard.values().any(|other| {
            other.id != record.id
                && other.student_id == record.student_id
                && other.is_currently_hired()
        }) {
            return Err(Constraint::StudentAlreadyHired.into());
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn for_student(&self, student_id: &StudentId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.select(|record| &record.student_id == student_id)
    }

    fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.select(|record| &record.supervisor_id == supervisor_id)
    }

    fn for_company(&self, company_id: &CompanyId) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.select(|record| &record.company_id == company_id)
    }

    fn currently_hired(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.select(|record| &record.student_id == student_id && record.is_currently_hired())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<Mutex<Vec<PostHireDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JoiningReportLedger for InMemoryDocumentStore {
    fn has_joining_report(&self, student_id: &StudentId) -> Result<bool, RepositoryError> {
        Ok(lock(&self.documents)?.iter().any(|document| {
            &document.student_id == student_id && document.kind() == DocumentKind::JoiningReport
        }))
    }
}

impl PostHireRepository for InMemoryDocumentStore {
    fn insert(&self, document: PostHireDocument) -> Result<PostHireDocument, RepositoryError> {
        let mut guard = lock(&self.documents)?;
        if guard.iter().any(|existing| existing.id == document.id) {
            return Err(RepositoryError::Conflict);
        }
        if document.kind() == DocumentKind::JoiningReport
            && guard.iter().any(|existing| {
                existing.student_id == document.student_id
                    && existing.kind() == DocumentKind::JoiningReport
            })
        {
            return Err(Constraint::JoiningReportExists.into());
        }
        guard.push(document.clone());
        Ok(document)
    }

    fn for_student(&self, student_id: &StudentId) -> Result<Vec<PostHireDocument>, RepositoryError> {
        Ok(lock(&self.documents)?
            .iter()
            .filter(|document| &document.student_id == student_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct Profiles {
    students: HashMap<StudentId, StudentProfile>,
    supervisors: HashMap<SupervisorId, SupervisorProfile>,
    companies: HashMap<CompanyId, CompanyProfile>,
    jobs: HashMap<JobId, JobPosting>,
}

/// Profile directory seeded up front; the roster write updates the stored student profile.
#[derive(Default, Clone)]
pub struct InMemoryDirectory {
    profiles: Arc<Mutex<Profiles>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&self, profile: StudentProfile) {
        let id = profile.id.clone();
        self.write("student", &id, |profiles| {
            profiles.students.insert(id.clone(), profile);
        });
    }

    pub fn add_supervisor(&self, profile: SupervisorProfile) {
        let id = profile.id.clone();
        self.write("supervisor", &id, |profiles| {
            profiles.supervisors.insert(id.clone(), profile);
        });
    }

    pub fn add_company(&self, profile: CompanyProfile) {
        let id = profile.id.clone();
        self.write("company", &id, |profiles| {
            profiles.companies.insert(id.clone(), profile);
        });
    }

    pub fn add_job(&self, posting: JobPosting) {
        let id = posting.id.clone();
        self.write("job", &id, |profiles| {
            profiles.jobs.insert(id.clone(), posting);
        });
    }

    fn write<F>(&self, entity: &'static str, id: &dyn fmt::Display, apply: F)
    where
        F: FnOnce(&mut Profiles),
    {
        match self.profiles.lock() {
            Ok(mut guard) => apply(&mut guard),
            Err(_) => warn!(entity, %id, "directory lock poisoned; profile not stored"),
        }
    }

    fn read<T, F>(
        &self,
        entity: &'static str,
        id: &dyn fmt::Display,
        find: F,
    ) -> Result<T, ProfileError>
    where
        F: FnOnce(&Profiles) -> Option<T>,
    {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| ProfileError::Unavailable("directory lock poisoned".to_string()))?;
        find(&guard).ok_or_else(|| ProfileError::not_found(entity, id))
    }
}

impl ProfileLookup for InMemoryDirectory {
    fn student(&self, id: &StudentId) -> Result<StudentProfile, ProfileError> {
        self.read("student", id, |profiles| profiles.students.get(id).cloned())
    }

    fn supervisor(&self, id: &SupervisorId) -> Result<SupervisorProfile, ProfileError> {
        self.read("supervisor", id, |profiles| profiles.supervisors.get(id).cloned())
    }

    fn company(&self, id: &CompanyId) -> Result<CompanyProfile, ProfileError> {
        self.read("company", id, |profiles| profiles.companies.get(id).cloned())
    }

    fn job(&self, id: &JobId) -> Result<JobPosting, ProfileError> {
        self.read("job", id, |profiles| profiles.jobs.get(id).cloned())
    }
}

impl StudentRoster for InMemoryDirectory {
    fn assign_supervisor(
        &self,
        student_id: &StudentId,
        supervisor_id: &SupervisorId,
    ) -> Result<(), ProfileError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|_| ProfileError::Unavailable("directory lock poisoned".to_string()))?;
        let student = guard
            .students
            .get_mut(student_id)
            .ok_or_else(|| ProfileError::not_found("student", student_id))?;
        student.selected_supervisor_id = Some(supervisor_id.clone());
        Ok(())
    }
}

/// Sink that keeps every notification it receives, in order.
#[derive(Default, Clone)]
pub struct RecordingNotifications {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn for_user(&self, user_id: &str) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter(|notification| notification.user_id == user_id)
            .collect()
    }
}

impl NotificationSink for RecordingNotifications {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .map_err(|_| NotificationError::Transport("recorder lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}
