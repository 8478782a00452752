//! Render request wire types.
//!
//! Field names match the render engine's JSON API. Overlay times are
//! relative to the start of the clip they belong to.

use cutroom_edit_model::{ClipEffects, ClipId, ExportSettings, ImageShape, OverlayPosition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A render request: the wire payload plus client-side bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Fresh per build; never sent to the engine.
    pub request_id: Uuid,

    /// Body of the engine's export call.
    pub payload: RenderPayload,

    /// Clips whose asset had no durable locator and were sent with their raw
    /// source instead.
    pub unresolved_clips: Vec<ClipId>,
}

impl RenderRequest {
    pub fn settings(&self) -> ExportSettings {
        self.payload.settings
    }

    /// Copy of this request under different settings and a new request id.
    pub fn with_settings(&self, settings: ExportSettings) -> Self {
        let mut payload = self.payload.clone();
        payload.settings = settings;
        Self {
            request_id: Uuid::new_v4(),
            payload,
            unresolved_clips: self.unresolved_clips.clone(),
        }
    }
}

/// JSON body of `POST /api/export`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub clips: Vec<ClipInstruction>,
    #[serde(default)]
    pub audio_tracks: Vec<AudioInstruction>,
    pub settings: ExportSettings,
}

/// One clip to cut, treat, and composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipInstruction {
    /// Resolved source locator, or the raw one when unresolvable.
    pub video_url: String,
    /// Trim start within the source.
    pub start_time: f64,
    /// Trim end within the source.
    pub end_time: f64,
    pub track: u32,
    pub effects: ClipEffects,
    #[serde(default)]
    pub text_overlays: Vec<TextOverlayInstruction>,
    #[serde(default)]
    pub image_overlays: Vec<ImageOverlayInstruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlayInstruction {
    pub text: String,
    pub font_family: String,
    pub font_size: u32,
    pub color: String,
    pub position: OverlayPosition,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOverlayInstruction {
    pub image_url: String,
    pub image_shape: ImageShape,
    #[serde(default)]
    pub shape_image_url: Option<String>,
    pub percentage_width: f64,
    pub percentage_from_top: f64,
    pub percentage_from_start: f64,
    pub start_time: f64,
    pub end_time: f64,
}

/// An audio file mixed under the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioInstruction {
    pub url: String,
    pub volume: f64,
    pub start_time: f64,
}
