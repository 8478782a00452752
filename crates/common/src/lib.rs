//! Cutroom Common Utilities
//!
//! Shared infrastructure for all Cutroom crates:
//! - Error types and result aliases
//! - Poll scheduling and log timestamp helpers
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
