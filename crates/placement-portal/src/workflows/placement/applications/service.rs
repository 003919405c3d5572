use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    ApplicationRecord, CompanyDecision, HiringOffer, InterviewDetails, InterviewOutcome,
    SupervisorDecision,
};
use super::repository::ApplicationRepository;
use crate::config::PlacementConfig;
use crate::workflows::placement::ids::{
    next_identifier, ApplicationId, CompanyId, JobId, StudentId, SupervisorId,
};
use crate::workflows::placement::notifications::{
    Notification, NotificationKind, NotificationSink, Notifier,
};
use crate::workflows::placement::profiles::ProfileLookup;
use crate::workflows::placement::store::RepositoryError;
use crate::workflows::placement::supervision::SupervisorAssignments;
use crate::workflows::placement::PlacementError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Update,
    Hire,
}

/// Service owning the application state machine.
///
/// Each operation loads the record, applies one transition to a copy, and writes it back with
/// a version-conditional commit, retrying from a fresh read when another writer got there first.
pub struct ApplicationStatusEngine<R, S, P, N> {
    repository: Arc<R>,
    supervision: Arc<S>,
    profiles: Arc<P>,
    notifier: Notifier<N>,
    config: PlacementConfig,
}

impl<R, S, P, N> ApplicationStatusEngine<R, S, P, N>
where
    R: ApplicationRepository + 'static,
    S: SupervisorAssignments + 'static,
    P: ProfileLookup + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(
        repository: Arc<R>,
        supervision: Arc<S>,
        profiles: Arc<P>,
        notifications: Arc<N>,
        config: PlacementConfig,
    ) -> Self {
        Self {
            repository,
            supervision,
            profiles,
            notifier: Notifier::new(notifications),
            config,
        }
    }

    /// Submit an application on behalf of a supervised student.
    ///
    /// The supervisor comes from the student's accepted supervision request; the roster entry
    /// on the profile is only consulted for students with no request on file.
    pub fn submit(
        &self,
        student_id: &StudentId,
        job_id: &JobId,
    ) -> Result<ApplicationRecord, PlacementError> {
        let student = self.profiles.student(student_id)?;
        let supervisor_id = match self.supervision.accepted_supervisor(student_id)? {
            Some(supervisor_id) => supervisor_id,
            None => student.selected_supervisor_id.clone().ok_or_else(|| {
                PlacementError::validation(format!(
                    "student {student_id} needs an accepted supervisor before applying"
                ))
            })?,
        };
        let job = self.profiles.job(job_id)?;
        let company = self.profiles.company(&job.company_id)?;
        let supervisor = self.profiles.supervisor(&supervisor_id)?;

        let record = ApplicationRecord::new(
            ApplicationId(next_identifier("app")),
            &student,
            &supervisor,
            &company,
            &job,
            Utc::now(),
        );
        let stored = self.repository.insert(record).map_err(|err| match err {
            RepositoryError::Constraint(constraint) => {
                PlacementError::from_constraint(constraint, student_id, None)
            }
            other => other.into(),
        })?;

        info!(
            application_id = %stored.id,
            %student_id,
            %job_id,
            company_id = %stored.company_id,
            "application submitted"
        );
        self.notify_student(
            &stored,
            NotificationKind::ApplicationSubmitted,
            format!(
                "Your application for {} at {} is awaiting review by {}",
                stored.job_title, stored.company.name, stored.supervisor.name
            ),
        );

        Ok(stored)
    }

    pub fn review_by_supervisor(
        &self,
        application_id: &ApplicationId,
        decision: SupervisorDecision,
        comments: Option<String>,
    ) -> Result<ApplicationRecord, PlacementError> {
        let comments = normalize(comments);
        let (record, _) = self.transition(application_id, Commit::Update, |record| {
            record.review_by_supervisor(&decision, comments.clone(), Utc::now())?;
            Ok(true)
        })?;

        let (kind, message) = match &decision {
            SupervisorDecision::Approve => (
                NotificationKind::SupervisorApproved,
                format!(
                    "{} approved your application for {}; it is now with {}",
                    record.supervisor.name, record.job_title, record.company.name
                ),
            ),
            SupervisorDecision::Reject => (
                NotificationKind::SupervisorRejected,
                format!(
                    "{} rejected your application for {}",
                    record.supervisor.name, record.job_title
                ),
            ),
            SupervisorDecision::RequestChanges { .. } => {
                let reason = record
                    .rejection_feedback
                    .as_ref()
                    .map(|feedback| feedback.reason.as_str())
                    .unwrap_or_default();
                (
                    NotificationKind::ChangesRequested,
                    format!(
                        "{} requested changes to your application for {}: {reason}",
                        record.supervisor.name, record.job_title
                    ),
                )
            }
        };
        self.notify_student(&record, kind, message);

        Ok(record)
    }

    pub fn resubmit(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ApplicationRecord, PlacementError> {
        let (record, _) = self.transition(application_id, Commit::Update, |record| {
            record.resubmit(Utc::now())?;
            Ok(true)
        })?;

        self.notify_student(
            &record,
            NotificationKind::ApplicationResubmitted,
            format!(
                "Your revised application for {} is back with {} (revision {})",
                record.job_title, record.supervisor.name, record.resubmission_count
            ),
        );

        Ok(record)
    }

    pub fn review_by_company(
        &self,
        application_id: &ApplicationId,
        decision: CompanyDecision,
        comments: Option<String>,
    ) -> Result<ApplicationRecord, PlacementError> {
        let comments = normalize(comments);
        let (record, _) = self.transition(application_id, Commit::Update, |record| {
            record.review_by_company(decision, comments.clone(), Utc::now())?;
            Ok(true)
        })?;

        let (kind, verb) = match decision {
            CompanyDecision::Approve => (NotificationKind::CompanyApproved, "approved"),
            CompanyDecision::Reject => (NotificationKind::CompanyRejected, "rejected"),
        };
        self.notify_student(
            &record,
            kind,
            format!(
                "{} {verb} your application for {}",
                record.company.name, record.job_title
            ),
        );

        Ok(record)
    }

    /// Schedule the interview. Repeating the call with identical details is a no-op and sends
    /// no further notification.
    pub fn schedule_interview(
        &self,
        application_id: &ApplicationId,
        details: InterviewDetails,
    ) -> Result<ApplicationRecord, PlacementError> {
        let (record, changed) = self.transition(application_id, Commit::Update, |record| {
            record.schedule_interview(details.clone(), Utc::now())
        })?;

        if changed {
            self.notify_student(
                &record,
                NotificationKind::InterviewScheduled,
                format!(
                    "{} scheduled your interview for {} on {} at {}",
                    record.company.name,
                    record.job_title,
                    details.scheduled_at.format("%Y-%m-%d %H:%M UTC"),
                    details.location
                ),
            );
        } else {
            debug!(%application_id, "interview already scheduled with identical details");
        }

        Ok(record)
    }

    pub fn record_interview_outcome(
        &self,
        application_id: &ApplicationId,
        outcome: InterviewOutcome,
    ) -> Result<ApplicationRecord, PlacementError> {
        let (record, _) = self.transition(application_id, Commit::Update, |record| {
            record.record_interview_outcome(outcome, Utc::now())?;
            Ok(true)
        })?;

        let (kind, message) = match outcome {
            InterviewOutcome::Passed => (
                NotificationKind::InterviewPassed,
                format!(
                    "You passed the interview for {} at {}",
                    record.job_title, record.company.name
                ),
            ),
            InterviewOutcome::Failed => (
                NotificationKind::InterviewFailed,
                format!(
                    "{} will not proceed with your application for {}",
                    record.company.name, record.job_title
                ),
            ),
        };
        self.notify_student(&record, kind, message);

        Ok(record)
    }

    /// Hire the student. Notifies the student and their supervisor.
    pub fn hire(
        &self,
        application_id: &ApplicationId,
        offer: HiringOffer,
    ) -> Result<ApplicationRecord, PlacementError> {
        let (record, _) = self.transition(application_id, Commit::Hire, |record| {
            record.hire(offer, Utc::now())?;
            Ok(true)
        })?;

        self.notify_student(
            &record,
            NotificationKind::Hired,
            format!(
                "{} hired you as {} from {} to {}",
                record.company.name, record.job_title, offer.start_date, offer.end_date
            ),
        );
        self.notifier.dispatch(Notification::new(
            &record.supervisor_id,
            NotificationKind::StudentHired,
            &record.id,
            format!(
                "{} was hired by {} as {}",
                record.student.name, record.company.name, record.job_title
            ),
        ));

        Ok(record)
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<ApplicationRecord, PlacementError> {
        self.repository
            .fetch(application_id)?
            .ok_or_else(|| PlacementError::ApplicationNotFound(application_id.clone()))
    }

    pub fn for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<ApplicationRecord>, PlacementError> {
        Ok(sorted(self.repository.for_student(student_id)?))
    }

    pub fn for_supervisor(
        &self,
        supervisor_id: &SupervisorId,
    ) -> Result<Vec<ApplicationRecord>, PlacementError> {
        Ok(sorted(self.repository.for_supervisor(supervisor_id)?))
    }

    pub fn for_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<ApplicationRecord>, PlacementError> {
        Ok(sorted(self.repository.for_company(company_id)?))
    }

    fn transition<F>(
        &self,
        application_id: &ApplicationId,
        commit: Commit,
        apply: F,
    ) -> Result<(ApplicationRecord, bool), PlacementError>
    where
        F: Fn(&mut ApplicationRecord) -> Result<bool, PlacementError>,
    {
        let attempts = self.config.commit_retries.max(1);

        for attempt in 1..=attempts {
            let current = self.get(application_id)?;
            let expected_version = current.version;
            let previous = current.overall_status();
            let mut updated = current;

            if !apply(&mut updated)? {
                return Ok((updated, false));
            }

            let result = match commit {
                Commit::Update => self
                    .repository
                    .update_if_version(updated.clone(), expected_version),
                Commit::Hire => self.repository.commit_hire(updated.clone(), expected_version),
            };

            match result {
                Ok(()) => {
                    info!(
                        %application_id,
                        student_id = %updated.student_id,
                        supervisor_status = updated.supervisor_status().label(),
                        company_status = updated.company_status().label(),
                        application_status = updated.application_status().label(),
                        from = previous.label(),
                        to = updated.overall_status().label(),
                        "application transitioned"
                    );
                    return Ok((updated, true));
                }
                Err(RepositoryError::StaleVersion { expected, found }) => {
                    debug!(%application_id, attempt, expected, found, "application changed underneath; retrying");
                }
                Err(RepositoryError::Constraint(constraint)) => {
                    return Err(PlacementError::from_constraint(
                        constraint,
                        &updated.student_id,
                        None,
                    ));
                }
                Err(RepositoryError::NotFound) => {
                    return Err(PlacementError::ApplicationNotFound(application_id.clone()));
                }
                Err(other) => return Err(other.into()),
            }
        }

        warn!(%application_id, attempts, "application update abandoned after repeated conflicts");
        Err(PlacementError::CommitConflict {
            entity: application_id.to_string(),
            attempts,
        })
    }

    fn notify_student(&self, record: &ApplicationRecord, kind: NotificationKind, message: String) {
        self.notifier.dispatch(Notification::new(
            &record.student_id,
            kind,
            &record.id,
            message,
        ));
    }
}

fn normalize(comments: Option<String>) -> Option<String> {
    comments
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn sorted(mut records: Vec<ApplicationRecord>) -> Vec<ApplicationRecord> {
    records.sort_by(|a, b| {
        a.submitted_at
            .cmp(&b.submitted_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    records
}

