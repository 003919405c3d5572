use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Event vocabulary the core reports to the notification collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SupervisionRequested,
    SupervisionAccepted,
    SupervisionRejected,
    ApplicationSubmitted,
    ApplicationResubmitted,
    SupervisorApproved,
    SupervisorRejected,
    ChangesRequested,
    CompanyApproved,
    CompanyRejected,
    InterviewScheduled,
    InterviewPassed,
    InterviewFailed,
    Hired,
    StudentHired,
    JoiningReportFiled,
    AppraisalFiled,
    MisconductReported,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::SupervisionRequested => "supervision_requested",
            NotificationKind::SupervisionAccepted => "supervision_accepted",
            NotificationKind::SupervisionRejected => "supervision_rejected",
            NotificationKind::ApplicationSubmitted => "application_submitted",
            NotificationKind::ApplicationResubmitted => "application_resubmitted",
            NotificationKind::SupervisorApproved => "supervisor_approved",
            NotificationKind::SupervisorRejected => "supervisor_rejected",
            NotificationKind::ChangesRequested => "changes_requested",
            NotificationKind::CompanyApproved => "company_approved",
            NotificationKind::CompanyRejected => "company_rejected",
            NotificationKind::InterviewScheduled => "interview_scheduled",
            NotificationKind::InterviewPassed => "interview_passed",
            NotificationKind::InterviewFailed => "interview_failed",
            NotificationKind::Hired => "hired",
            NotificationKind::StudentHired => "student_hired",
            NotificationKind::JoiningReportFiled => "joining_report_filed",
            NotificationKind::AppraisalFiled => "appraisal_filed",
            NotificationKind::MisconductReported => "misconduct_reported",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// "Notify user X that event Y occurred regarding entity Z."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub related_entity_id: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        user_id: impl ToString,
        kind: NotificationKind,
        related_entity_id: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind,
            related_entity_id: related_entity_id.to_string(),
            message: message.into(),
        }
    }
}

/// Delivery and storage of notifications (in-app inbox, e-mail, ...).
///
/// Implementations must not block the caller on delivery; retry policy, if any, lives here.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Fire-and-forget dispatcher: failures are logged and never reach the caller.
pub struct Notifier<N> {
    sink: Arc<N>,
}

impl<N> Clone for Notifier<N> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<N: NotificationSink> Notifier<N> {
    pub fn new(sink: Arc<N>) -> Self {
        Self { sink }
    }

    pub fn dispatch(&self, notification: Notification) {
        let user_id = notification.user_id.clone();
        let kind = notification.kind;
        let related = notification.related_entity_id.clone();

        match self.sink.notify(notification) {
            Ok(()) => debug!(%user_id, %kind, %related, "notification dispatched"),
            Err(err) => warn!(
                %user_id,
                %kind,
                %related,
                error = %err,
                "notification dispatch failed; transition already committed"
            ),
        }
    }
}
