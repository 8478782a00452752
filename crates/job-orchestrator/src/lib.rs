//! Cutroom Job Orchestrator
//!
//! Owns the job registry and drives every export from submission to a
//! terminal state:
//!
//! ```text
//!   submit ──► pending ──accepted──► processing ──► completed
//!                │ ▲                     │
//!         cancel │ │ retry               │ engine failure
//!                ▼ │                     │
//!               failed ◄─────────────────┘
//! ```
//!
//! When the render engine cannot be reached at submission the job still runs:
//! it enters degraded mode and completes on simulated progress.

pub mod job;
pub mod orchestrator;
pub mod registry;

mod degraded;

pub use job::*;
pub use orchestrator::{JobOrchestrator, JobStats};
pub use registry::JobRegistry;
