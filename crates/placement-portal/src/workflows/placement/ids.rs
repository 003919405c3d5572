use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// Student account identifier.
    StudentId
);
identifier!(
    /// Faculty supervisor identifier.
    SupervisorId
);
identifier!(
    /// Hiring company identifier.
    CompanyId
);
identifier!(
    /// Job posting identifier.
    JobId
);
identifier!(
    /// Identifier for a job application tracked by the status engine.
    ApplicationId
);
identifier!(
    /// Identifier for a supervision request.
    RequestId
);
identifier!(
    /// Identifier for a post-hire document (joining report, appraisal, misconduct report).
    DocumentId
);

static SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique identifier with the given prefix, e.g. `app-000042`.
pub(crate) fn next_identifier(prefix: &str) -> String {
    let id = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id:06}")
}
