//! Cutroom Render Client
//!
//! Turns an edit graph into render requests and talks to the render engine
//! that executes them.
//!
//! # Flow
//!
//! ```text
//! EditGraph ─┐
//!            ├── build_render_request ──► RenderRequest
//! Settings ──┤         ▲                       │
//!            │   SourceResolver                ▼
//!            │                          RenderEngine::submit ──► EngineJobId
//!            │                                 │
//!            │                          RenderEngine::status (polled)
//!            │                                 │
//!            │                                 ▼
//!            └──────────────────────── { status, progress, logs, output_url }
//! ```
//!
//! The builder is pure; all I/O lives behind the [`RenderEngine`] trait.

pub mod builder;
pub mod engine;
pub mod http;
pub mod offline;
pub mod request;
pub mod thumbnail;

pub use builder::*;
pub use engine::*;
pub use http::HttpRenderEngine;
pub use offline::OfflineEngine;
pub use request::*;
pub use thumbnail::EngineThumbnails;
