//! Internship placement core: supervision admission, application lifecycle, and post-hire
//! eligibility, exposed as services plus axum routers for the surrounding HTTP layer.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
