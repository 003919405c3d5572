use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use placement_portal::config::PlacementConfig;
use placement_portal::workflows::placement::applications::ApplicationStatusEngine;
use placement_portal::workflows::placement::eligibility::PostHireDocumentService;
use placement_portal::workflows::placement::memory::{
    InMemoryApplicationStore, InMemoryDirectory, InMemoryDocumentStore, InMemorySupervisionStore,
};
use placement_portal::workflows::placement::profiles::{
    CompanyProfile, JobPosting, StudentProfile, SupervisorProfile,
};
use placement_portal::workflows::placement::supervision::SupervisionAdmissionController;
use placement_portal::workflows::placement::{
    CompanyId, JobId, Notification, NotificationError, NotificationSink, StudentId, SupervisorId,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) inbox: NotificationInbox,
}

pub(crate) type Supervision<N> =
    SupervisionAdmissionController<InMemorySupervisionStore, InMemoryDirectory, N>;
pub(crate) type Applications<N> = ApplicationStatusEngine<
    InMemoryApplicationStore,
    InMemorySupervisionStore,
    InMemoryDirectory,
    N,
>;
pub(crate) type PostHire<N> =
    PostHireDocumentService<InMemoryApplicationStore, InMemoryDocumentStore, N>;

/// The three placement services wired to one set of in-memory stores.
pub(crate) struct Placement<N> {
    pub(crate) supervision: Arc<Supervision<N>>,
    pub(crate) applications: Arc<Applications<N>>,
    pub(crate) post_hire: Arc<PostHire<N>>,
}

impl<N: NotificationSink + 'static> Placement<N> {
    pub(crate) fn in_memory(
        directory: Arc<InMemoryDirectory>,
        notifications: Arc<N>,
        config: PlacementConfig,
    ) -> Self {
        let applications = Arc::new(InMemoryApplicationStore::new());
        let requests = Arc::new(InMemorySupervisionStore::new());
        Self {
            supervision: Arc::new(SupervisionAdmissionController::new(
                requests.clone(),
                directory.clone(),
                notifications.clone(),
                config,
            )),
            applications: Arc::new(ApplicationStatusEngine::new(
                applications.clone(),
                requests,
                directory,
                notifications.clone(),
                config,
            )),
            post_hire: Arc::new(PostHireDocumentService::new(
                applications,
                Arc::new(InMemoryDocumentStore::new()),
                notifications,
            )),
        }
    }
}

/// One stored notification as shown in a user's inbox.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct InboxEntry {
    pub(crate) id: u64,
    #[serde(flatten)]
    pub(crate) notification: Notification,
    pub(crate) read: bool,
    pub(crate) received_at: DateTime<Utc>,
}

/// Per-user in-app notification store. Entries arrive unread.
#[derive(Default, Clone)]
pub(crate) struct NotificationInbox {
    entries: Arc<Mutex<HashMap<String, Vec<InboxEntry>>>>,
    sequence: Arc<AtomicU64>,
}

impl NotificationInbox {
    pub(crate) fn deliver(&self, notification: Notification) {
        let entry = InboxEntry {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            notification,
            read: false,
            received_at: Utc::now(),
        };
        match self.entries.lock() {
            Ok(mut guard) => guard
                .entry(entry.notification.user_id.clone())
                .or_default()
                .push(entry),
            Err(_) => warn!("notification inbox lock poisoned; dropping notification"),
        }
    }

    pub(crate) fn for_user(&self, user_id: &str) -> Vec<InboxEntry> {
        self.entries
            .lock()
            .map(|guard| guard.get(user_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Returns `false` when the user has no entry with that id.
    pub(crate) fn mark_read(&self, user_id: &str, id: u64) -> bool {
        let Ok(mut guard) = self.entries.lock() else {
            return false;
        };
        guard
            .get_mut(user_id)
            .and_then(|entries| entries.iter_mut().find(|entry| entry.id == id))
            .map(|entry| entry.read = true)
            .is_some()
    }
}

/// Sink that hands notifications to a background task and returns immediately.
#[derive(Clone)]
pub(crate) struct QueuedNotificationSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl NotificationSink for QueuedNotificationSink {
    fn notify(&self, notification: Notification) -> Result<(), NotificationError> {
        self.sender
            .send(notification)
            .map_err(|_| NotificationError::Transport("notification queue closed".to_string()))
    }
}

/// Start the delivery task draining the queue into `inbox`. Must run inside a tokio runtime.
pub(crate) fn spawn_delivery(inbox: NotificationInbox) -> (QueuedNotificationSink, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::unbounded_channel::<Notification>();
    let handle = tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            debug!(
                user_id = %notification.user_id,
                kind = %notification.kind,
                "notification delivered to inbox"
            );
            inbox.deliver(notification);
        }
    });
    (QueuedNotificationSink { sender }, handle)
}

/// Sample directory used by the server and the demo; profile management lives elsewhere.
pub(crate) fn seed_directory() -> InMemoryDirectory {
    let directory = InMemoryDirectory::new();
    for (id, name, semester, gpa) in [
        ("stu-amina", "Amina Yusuf", 7, 3.6),
        ("stu-bilal", "Bilal Chaudhry", 8, 3.1),
        ("stu-chen", "Chen Wei", 7, 3.8),
    ] {
        directory.add_student(StudentProfile {
            id: StudentId::new(id),
            name: name.to_string(),
            email: format!("{}@campus.example", id.trim_start_matches("stu-")),
            department: "Computer Science".to_string(),
            semester,
            gpa,
            selected_supervisor_id: None,
        });
    }
    for (id, name, max_students) in [
        ("sup-rahman", "Dr. Rahman", Some(1)),
        ("sup-okafor", "Dr. Okafor", None),
    ] {
        directory.add_supervisor(SupervisorProfile {
            id: SupervisorId::new(id),
            name: name.to_string(),
            email: format!("{}@campus.example", id.trim_start_matches("sup-")),
            department: "Computer Science".to_string(),
            max_students,
        });
    }
    directory.add_company(CompanyProfile {
        id: CompanyId::new("co-orbit"),
        name: "Orbit Systems".to_string(),
        email: "careers@orbit.example".to_string(),
    });
    for (id, title) in [
        ("job-orbit-backend", "Backend Engineering Intern"),
        ("job-orbit-data", "Data Platform Intern"),
    ] {
        directory.add_job(JobPosting {
            id: JobId::new(id),
            company_id: CompanyId::new("co-orbit"),
            title: title.to_string(),
        });
    }
    directory
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
