//! Cutroom Edit Model
//!
//! Defines the core data contracts for Cutroom projects:
//! - **Assets:** Ingested media the timeline can reference
//! - **Clips:** Trimmed asset ranges placed on numbered tracks, with effects
//!   and text/image overlays
//! - **EditGraph:** The single owned store of assets, clips, and audio tracks,
//!   with mutators that reject any edit breaking the timeline invariants
//! - **Placement:** Auto-placement and reposition checks that keep clips on
//!   the same track from overlapping
//! - **Project:** Top-level metadata and default export settings
//!
//! Times are seconds (`f64`). Timeline intervals are half-open
//! `[start, end)`, so clips touching at an endpoint do not overlap.

pub mod asset;
pub mod audio;
pub mod clip;
pub mod graph;
pub mod ids;
pub mod placement;
pub mod project;
pub mod settings;

pub use asset::*;
pub use audio::*;
pub use clip::*;
pub use graph::*;
pub use ids::*;
pub use placement::*;
pub use project::*;
pub use settings::*;
