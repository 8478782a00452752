//! Export request builder: projects an edit graph into a render request.
//!
//! Pure and deterministic. The same graph and settings always yield the same
//! payload; only `request_id` differs between builds.

use cutroom_edit_model::{Clip, EditGraph, ExportSettings, MediaAsset};
use uuid::Uuid;

use crate::request::{
    AudioInstruction, ClipInstruction, ImageOverlayInstruction, RenderPayload, RenderRequest,
    TextOverlayInstruction,
};

/// Maps assets and raw locators to locators the render engine can fetch.
pub trait SourceResolver {
    /// Durable locator for an asset, if it has one.
    fn resolve_asset(&self, asset: &MediaAsset) -> Option<String>;

    /// Locator for a free-standing source such as an audio track.
    fn resolve_locator(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Uses the durable locator recorded at ingestion, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurableLocatorResolver;

impl SourceResolver for DurableLocatorResolver {
    fn resolve_asset(&self, asset: &MediaAsset) -> Option<String> {
        asset.durable_locator.clone()
    }
}

/// Resolves server-relative locators (`/static/uploads/...`) against the
/// render engine's base URL. Absolute locators pass through.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base_url: String,
}

impl BaseUrlResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn absolutize(&self, locator: &str) -> String {
        if locator.starts_with('/') {
            format!("{}{}", self.base_url, locator)
        } else {
            locator.to_string()
        }
    }
}

impl SourceResolver for BaseUrlResolver {
    fn resolve_asset(&self, asset: &MediaAsset) -> Option<String> {
        asset.durable_locator.as_deref().map(|l| self.absolutize(l))
    }

    fn resolve_locator(&self, raw: &str) -> String {
        self.absolutize(raw)
    }
}

/// Build the render request for `graph` under `settings`.
///
/// Clips whose asset cannot be resolved are still emitted, carrying the
/// asset's raw source locator; the render engine reports the failure.
pub fn build_render_request(
    graph: &EditGraph,
    settings: ExportSettings,
    resolver: &dyn SourceResolver,
) -> RenderRequest {
    let mut unresolved_clips = vec![];

    let clips = graph
        .render_order()
        .into_iter()
        .map(|clip| {
            let asset = graph.asset(&clip.asset_id);
            let video_url = match asset.and_then(|a| resolver.resolve_asset(a)) {
                Some(url) => url,
                None => {
                    let raw = asset
                        .map(|a| a.source.clone())
                        .unwrap_or_else(|| format!("asset:{}", clip.asset_id));
                    tracing::warn!(
                        clip = %clip.id,
                        asset = %clip.asset_id,
                        locator = %raw,
                        "No durable locator for clip source, sending raw locator"
                    );
                    unresolved_clips.push(clip.id);
                    raw
                }
            };
            clip_instruction(clip, video_url)
        })
        .collect();

    let audio_tracks = graph
        .audio_tracks()
        .iter()
        .map(|track| AudioInstruction {
            url: resolver.resolve_locator(&track.source),
            volume: track.volume,
            start_time: track.start_secs,
        })
        .collect();

    RenderRequest {
        request_id: Uuid::new_v4(),
        payload: RenderPayload {
            clips,
            audio_tracks,
            settings,
        },
        unresolved_clips,
    }
}

fn clip_instruction(clip: &Clip, video_url: String) -> ClipInstruction {
    ClipInstruction {
        video_url,
        start_time: clip.source_start,
        end_time: clip.source_end,
        track: clip.track,
        effects: clip.effects,
        text_overlays: clip
            .text_overlays
            .iter()
            .map(|o| TextOverlayInstruction {
                text: o.text.clone(),
                font_family: o.font_family.clone(),
                font_size: o.font_size,
                color: o.color.clone(),
                position: o.position,
                start_time: o.start_secs,
                end_time: o.end_secs,
            })
            .collect(),
        image_overlays: clip
            .image_overlays
            .iter()
            .map(|o| ImageOverlayInstruction {
                image_url: o.image.clone(),
                image_shape: o.shape,
                shape_image_url: o.shape_mask.clone(),
                percentage_width: o.width_percent,
                percentage_from_top: o.from_top_percent,
                percentage_from_start: o.from_start_percent,
                start_time: o.start_secs,
                end_time: o.end_secs,
            })
            .collect(),
    }
}
