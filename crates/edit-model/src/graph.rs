//! The edit graph: the single owned description of what to render.
//!
//! Every mutator either applies completely or returns an [`EditError`] with
//! the graph untouched. Callers treat an error as "the UI action did not take
//! effect".

use serde::{Deserialize, Serialize};

use crate::asset::{MediaAsset, ThumbnailProvider};
use crate::audio::AudioTrack;
use crate::clip::{Clip, ClipEffects, ImageOverlay, TextOverlay};
use crate::ids::{AssetId, AudioTrackId, ClipId, OverlayId};
use crate::placement::{self, Placement, PlacementRejection};

/// Edits refused because they would break an edit-graph invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("Unknown clip: {0}")]
    UnknownClip(ClipId),

    #[error("Unknown overlay: {0}")]
    UnknownOverlay(OverlayId),

    #[error("Unknown audio track: {0}")]
    UnknownAudioTrack(AudioTrackId),

    #[error("Asset already present: {0}")]
    DuplicateAsset(AssetId),

    #[error("Invalid trim range [{start}, {end})")]
    InvalidTrim { start: f64, end: f64 },

    #[error("Trim end {end}s exceeds asset duration {duration}s")]
    TrimBeyondAsset { end: f64, duration: f64 },

    #[error("Start time {0}s is negative")]
    NegativeStart(f64),

    #[error("Clip would overlap {conflicting} on track {track}")]
    Overlap { track: u32, conflicting: ClipId },

    #[error("{field} out of range: {value}")]
    ValueOutOfRange { field: &'static str, value: f64 },

    #[error("Overlay window [{start}, {end}) must lie within [0, {clip_duration}]")]
    OverlayTiming {
        start: f64,
        end: f64,
        clip_duration: f64,
    },

    #[error("Overlay {overlay} would fall outside a {clip_duration}s clip")]
    OverlayOutsideClip {
        overlay: OverlayId,
        clip_duration: f64,
    },

    #[error("Clip order must list every clip exactly once")]
    InvalidOrder,
}

/// How clips are sequenced when projected for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sequencing {
    /// Ordered by timeline position.
    #[default]
    Timeline,
    /// Ordered as last arranged by [`EditGraph::reorder_clips`].
    Manual,
}

/// Assets, clips, and audio tracks for one edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditGraph {
    #[serde(default)]
    assets: Vec<MediaAsset>,
    #[serde(default)]
    clips: Vec<Clip>,
    #[serde(default)]
    audio_tracks: Vec<AudioTrack>,
    #[serde(default)]
    sequencing: Sequencing,
}

impl EditGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn audio_tracks(&self) -> &[AudioTrack] {
        &self.audio_tracks
    }

    pub fn sequencing(&self) -> Sequencing {
        self.sequencing
    }

    pub fn asset(&self, id: &AssetId) -> Option<&MediaAsset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn clips_on_track(&self, track: u32) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().filter(|c| c.track == track).collect();
        clips.sort_by(|a, b| a.timeline_start.total_cmp(&b.timeline_start));
        clips
    }

    /// Highest track index holding a clip.
    pub fn max_track(&self) -> Option<u32> {
        self.clips.iter().map(|c| c.track).max()
    }

    /// Length of the edit: the latest clip end in timeline mode, the sum of
    /// clip durations when manually sequenced.
    pub fn total_duration(&self) -> f64 {
        match self.sequencing {
            Sequencing::Timeline => self.clips.iter().map(|c| c.timeline_end).fold(0.0, f64::max),
            Sequencing::Manual => self.clips.iter().map(Clip::duration).sum(),
        }
    }

    /// Clips in the order they are handed to the render engine.
    pub fn render_order(&self) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().collect();
        if self.sequencing == Sequencing::Timeline {
            // Stable sort keeps insertion order for identical positions.
            clips.sort_by(|a, b| {
                a.timeline_start
                    .total_cmp(&b.timeline_start)
                    .then(a.track.cmp(&b.track))
            });
        }
        clips
    }

    // ── Assets ───────────────────────────────────────────────────────────

    pub fn add_asset(&mut self, asset: MediaAsset) -> Result<AssetId, EditError> {
        if self.asset(&asset.id).is_some() {
            return Err(EditError::DuplicateAsset(asset.id));
        }
        let id = asset.id.clone();
        tracing::debug!(asset = %id, name = %asset.name, "Asset added");
        self.assets.push(asset);
        Ok(id)
    }

    /// Apply a metadata refresh from the ingestion collaborator.
    pub fn update_asset_duration(
        &mut self,
        id: &AssetId,
        duration_secs: f64,
    ) -> Result<(), EditError> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(EditError::ValueOutOfRange {
                field: "duration_secs",
                value: duration_secs,
            });
        }
        let asset = self
            .assets
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| EditError::UnknownAsset(id.clone()))?;
        asset.duration_secs = duration_secs;

        for (clip, duration) in self.trims_beyond_asset() {
            if &clip.asset_id == id {
                tracing::warn!(
                    clip = %clip.id,
                    source_end = clip.source_end,
                    duration_secs = duration,
                    "Clip trim extends past refreshed asset duration"
                );
            }
        }
        Ok(())
    }

    /// Clips whose trim ends past their asset's known duration, with that
    /// duration. Only a metadata refresh can produce these.
    pub fn trims_beyond_asset(&self) -> Vec<(&Clip, f64)> {
        self.clips
            .iter()
            .filter_map(|clip| {
                let asset = self.asset(&clip.asset_id)?;
                (asset.has_known_duration() && clip.source_end > asset.duration_secs)
                    .then_some((clip, asset.duration_secs))
            })
            .collect()
    }

    /// Remove an asset and every clip that references it.
    pub fn remove_asset(&mut self, id: &AssetId) -> Result<MediaAsset, EditError> {
        let index = self
            .assets
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| EditError::UnknownAsset(id.clone()))?;
        let before = self.clips.len();
        self.clips.retain(|c| &c.asset_id != id);
        tracing::debug!(
            asset = %id,
            removed_clips = before - self.clips.len(),
            "Asset removed"
        );
        Ok(self.assets.remove(index))
    }

    // ── Clips ────────────────────────────────────────────────────────────

    /// Commit a trimmed asset range to the timeline at an auto-chosen spot.
    pub fn add_clip(
        &mut self,
        asset_id: &AssetId,
        source_start: f64,
        source_end: f64,
    ) -> Result<ClipId, EditError> {
        self.check_trim(asset_id, source_start, source_end)?;
        let placement = placement::auto_place(&self.clips, source_end - source_start);
        Ok(self.insert_clip(asset_id, source_start, source_end, placement))
    }

    /// Commit a trimmed asset range at an explicit track and time.
    pub fn add_clip_at(
        &mut self,
        asset_id: &AssetId,
        source_start: f64,
        source_end: f64,
        track: u32,
        start: f64,
    ) -> Result<ClipId, EditError> {
        self.check_trim(asset_id, source_start, source_end)?;
        if !start.is_finite() || start < 0.0 {
            return Err(EditError::NegativeStart(start));
        }
        let end = start + (source_end - source_start);
        if let Some(conflicting) = placement::find_conflict(&self.clips, track, start, end, None) {
            return Err(EditError::Overlap { track, conflicting });
        }
        Ok(self.insert_clip(asset_id, source_start, source_end, Placement { track, start }))
    }

    fn insert_clip(
        &mut self,
        asset_id: &AssetId,
        source_start: f64,
        source_end: f64,
        placement: Placement,
    ) -> ClipId {
        let clip = Clip {
            id: ClipId::new(),
            asset_id: asset_id.clone(),
            source_start,
            source_end,
            track: placement.track,
            timeline_start: placement.start,
            timeline_end: placement.start + (source_end - source_start),
            effects: ClipEffects::default(),
            text_overlays: vec![],
            image_overlays: vec![],
            thumbnail: None,
        };
        let id = clip.id;
        tracing::debug!(
            clip = %id,
            track = clip.track,
            start = clip.timeline_start,
            end = clip.timeline_end,
            "Clip placed"
        );
        self.clips.push(clip);
        id
    }

    /// Drag a clip to `(track, start)`. Track and times change together or
    /// not at all.
    pub fn move_clip(&mut self, id: ClipId, track: u32, start: f64) -> Result<(), EditError> {
        let placement = placement::check_reposition(&self.clips, id, track, start).map_err(
            |rejection| match rejection {
                PlacementRejection::UnknownClip => EditError::UnknownClip(id),
                PlacementRejection::NegativeStart => EditError::NegativeStart(start),
                PlacementRejection::Overlap { with } => EditError::Overlap {
                    track,
                    conflicting: with,
                },
            },
        )?;

        let clip = self.clip_mut(id)?;
        let duration = clip.timeline_end - clip.timeline_start;
        clip.track = placement.track;
        clip.timeline_start = placement.start;
        clip.timeline_end = placement.start + duration;
        self.sequencing = Sequencing::Timeline;
        Ok(())
    }

    /// Replace the stored clip order verbatim and switch to manual
    /// sequencing. `order` must name every clip exactly once.
    pub fn reorder_clips(&mut self, order: &[ClipId]) -> Result<(), EditError> {
        if order.len() != self.clips.len() {
            return Err(EditError::InvalidOrder);
        }
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if reordered.iter().any(|c: &Clip| c.id == *id) {
                return Err(EditError::InvalidOrder);
            }
            let clip = self.clip(*id).ok_or(EditError::InvalidOrder)?;
            reordered.push(clip.clone());
        }
        self.clips = reordered;
        self.sequencing = Sequencing::Manual;
        Ok(())
    }

    /// Change a clip's source range. The clip keeps its start and track; the
    /// new length must not collide with a neighbour or cut off an overlay.
    pub fn trim_clip(
        &mut self,
        id: ClipId,
        source_start: f64,
        source_end: f64,
    ) -> Result<(), EditError> {
        let clip = self.clip(id).ok_or(EditError::UnknownClip(id))?;
        self.check_trim(&clip.asset_id, source_start, source_end)?;

        let duration = source_end - source_start;
        let new_end = clip.timeline_start + duration;
        if let Some(conflicting) =
            placement::find_conflict(&self.clips, clip.track, clip.timeline_start, new_end, Some(id))
        {
            return Err(EditError::Overlap {
                track: clip.track,
                conflicting,
            });
        }
        clip.check_overlays_fit(duration)?;

        let clip = self.clip_mut(id)?;
        clip.source_start = source_start;
        clip.source_end = source_end;
        clip.timeline_end = new_end;
        Ok(())
    }

    pub fn remove_clip(&mut self, id: ClipId) -> Result<Clip, EditError> {
        let index = self
            .clips
            .iter()
            .position(|c| c.id == id)
            .ok_or(EditError::UnknownClip(id))?;
        Ok(self.clips.remove(index))
    }

    pub fn set_effects(&mut self, id: ClipId, effects: ClipEffects) -> Result<(), EditError> {
        effects.validate()?;
        self.clip_mut(id)?.effects = effects;
        Ok(())
    }

    /// Record a still frame at the clip's source start.
    pub fn decorate_clip_thumbnail(
        &mut self,
        id: ClipId,
        provider: &dyn ThumbnailProvider,
    ) -> Result<Option<String>, EditError> {
        let clip = self.clip_mut(id)?;
        let thumbnail = provider.thumbnail_at(&clip.asset_id, clip.source_start);
        clip.thumbnail = thumbnail.clone();
        Ok(thumbnail)
    }

    // ── Overlays ─────────────────────────────────────────────────────────

    pub fn add_text_overlay(
        &mut self,
        clip_id: ClipId,
        overlay: TextOverlay,
    ) -> Result<OverlayId, EditError> {
        let clip = self.clip_mut(clip_id)?;
        overlay.validate(clip.duration())?;
        let id = overlay.id;
        clip.text_overlays.push(overlay);
        Ok(id)
    }

    /// Replace the text overlay with the same id.
    pub fn update_text_overlay(
        &mut self,
        clip_id: ClipId,
        overlay: TextOverlay,
    ) -> Result<(), EditError> {
        let clip = self.clip_mut(clip_id)?;
        overlay.validate(clip.duration())?;
        let slot = clip
            .text_overlays
            .iter_mut()
            .find(|o| o.id == overlay.id)
            .ok_or(EditError::UnknownOverlay(overlay.id))?;
        *slot = overlay;
        Ok(())
    }

    pub fn add_image_overlay(
        &mut self,
        clip_id: ClipId,
        overlay: ImageOverlay,
    ) -> Result<OverlayId, EditError> {
        let clip = self.clip_mut(clip_id)?;
        overlay.validate(clip.duration())?;
        let id = overlay.id;
        clip.image_overlays.push(overlay);
        Ok(id)
    }

    /// Replace the image overlay with the same id.
    pub fn update_image_overlay(
        &mut self,
        clip_id: ClipId,
        overlay: ImageOverlay,
    ) -> Result<(), EditError> {
        let clip = self.clip_mut(clip_id)?;
        overlay.validate(clip.duration())?;
        let slot = clip
            .image_overlays
            .iter_mut()
            .find(|o| o.id == overlay.id)
            .ok_or(EditError::UnknownOverlay(overlay.id))?;
        *slot = overlay;
        Ok(())
    }

    /// Remove a text or image overlay from a clip.
    pub fn remove_overlay(&mut self, clip_id: ClipId, overlay_id: OverlayId) -> Result<(), EditError> {
        let clip = self.clip_mut(clip_id)?;
        let before = clip.text_overlays.len() + clip.image_overlays.len();
        clip.text_overlays.retain(|o| o.id != overlay_id);
        clip.image_overlays.retain(|o| o.id != overlay_id);
        if clip.text_overlays.len() + clip.image_overlays.len() == before {
            return Err(EditError::UnknownOverlay(overlay_id));
        }
        Ok(())
    }

    // ── Audio ────────────────────────────────────────────────────────────

    pub fn add_audio_track(
        &mut self,
        source: impl Into<String>,
        volume: f64,
        start_secs: f64,
    ) -> Result<AudioTrackId, EditError> {
        check_volume(volume)?;
        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(EditError::NegativeStart(start_secs));
        }
        let track = AudioTrack {
            id: AudioTrackId::new(),
            source: source.into(),
            volume,
            start_secs,
        };
        let id = track.id;
        self.audio_tracks.push(track);
        Ok(id)
    }

    pub fn set_audio_volume(&mut self, id: AudioTrackId, volume: f64) -> Result<(), EditError> {
        check_volume(volume)?;
        let track = self
            .audio_tracks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(EditError::UnknownAudioTrack(id))?;
        track.volume = volume;
        Ok(())
    }

    pub fn remove_audio_track(&mut self, id: AudioTrackId) -> Result<AudioTrack, EditError> {
        let index = self
            .audio_tracks
            .iter()
            .position(|t| t.id == id)
            .ok_or(EditError::UnknownAudioTrack(id))?;
        Ok(self.audio_tracks.remove(index))
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn clip_mut(&mut self, id: ClipId) -> Result<&mut Clip, EditError> {
        self.clips
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EditError::UnknownClip(id))
    }

    /// Strict trim check: `0 <= start < end`, and `end <= duration` when the
    /// asset duration is known.
    fn check_trim(&self, asset_id: &AssetId, start: f64, end: f64) -> Result<(), EditError> {
        let asset = self
            .asset(asset_id)
            .ok_or_else(|| EditError::UnknownAsset(asset_id.clone()))?;
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start >= end {
            return Err(EditError::InvalidTrim { start, end });
        }
        if asset.has_known_duration() && end > asset.duration_secs {
            return Err(EditError::TrimBeyondAsset {
                end,
                duration: asset.duration_secs,
            });
        }
        Ok(())
    }
}

fn check_volume(volume: f64) -> Result<(), EditError> {
    if AudioTrack::is_valid_volume(volume) {
        Ok(())
    } else {
        Err(EditError::ValueOutOfRange {
            field: "volume",
            value: volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{IngestedMedia, MediaOrigin};

    fn asset(id: &str, duration: f64) -> MediaAsset {
        MediaAsset::from_ingested(
            format!("{id}.mp4"),
            format!("blob:{id}"),
            MediaOrigin::Local,
            IngestedMedia {
                asset_id: AssetId::new(id),
                durable_locator: Some(format!("/static/uploads/{id}.mp4")),
                duration_secs: duration,
                thumbnail: None,
            },
        )
    }

    fn graph_with_asset(duration: f64) -> (EditGraph, AssetId) {
        let mut graph = EditGraph::new();
        let id = graph.add_asset(asset("a", duration)).unwrap();
        (graph, id)
    }

    fn span(graph: &EditGraph, id: ClipId) -> (u32, f64, f64) {
        let clip = graph.clip(id).unwrap();
        (clip.track, clip.timeline_start, clip.timeline_end)
    }

    #[test]
    fn test_three_auto_placed_clips_pack_base_track() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 10.0).unwrap();
        let b = graph.add_clip(&asset, 10.0, 20.0).unwrap();
        let c = graph.add_clip(&asset, 20.0, 30.0).unwrap();

        assert_eq!(span(&graph, a), (0, 0.0, 10.0));
        assert_eq!(span(&graph, b), (0, 10.0, 20.0));
        assert_eq!(span(&graph, c), (0, 20.0, 30.0));
        assert_eq!(graph.total_duration(), 30.0);
    }

    #[test]
    fn test_move_onto_occupied_range_leaves_clip_in_place() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip_at(&asset, 0.0, 10.0, 0, 0.0).unwrap();
        let b = graph.add_clip_at(&asset, 0.0, 5.0, 1, 3.0).unwrap();
        let before = graph.clone();

        let err = graph.move_clip(b, 0, 5.0).unwrap_err();
        assert_eq!(
            err,
            EditError::Overlap {
                track: 0,
                conflicting: a
            }
        );
        assert_eq!(graph, before);
        assert_eq!(span(&graph, b), (1, 3.0, 8.0));
    }

    #[test]
    fn test_move_to_free_range_updates_track_and_times_together() {
        let (mut graph, asset) = graph_with_asset(60.0);
        graph.add_clip_at(&asset, 0.0, 10.0, 0, 0.0).unwrap();
        let b = graph.add_clip_at(&asset, 0.0, 5.0, 1, 3.0).unwrap();

        graph.move_clip(b, 0, 10.0).unwrap();
        assert_eq!(span(&graph, b), (0, 10.0, 15.0));
    }

    #[test]
    fn test_negative_move_rejected() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 4.0).unwrap();
        assert_eq!(graph.move_clip(a, 0, -0.5), Err(EditError::NegativeStart(-0.5)));
        assert_eq!(span(&graph, a), (0, 0.0, 4.0));
    }

    #[test]
    fn test_trim_is_strict() {
        let (mut graph, asset) = graph_with_asset(20.0);
        assert!(matches!(
            graph.add_clip(&asset, 5.0, 5.0),
            Err(EditError::InvalidTrim { .. })
        ));
        assert!(matches!(
            graph.add_clip(&asset, 8.0, 3.0),
            Err(EditError::InvalidTrim { .. })
        ));
        assert!(matches!(
            graph.add_clip(&asset, 0.0, 25.0),
            Err(EditError::TrimBeyondAsset { .. })
        ));
        assert!(graph.clips().is_empty());
    }

    #[test]
    fn test_shrinking_refresh_reports_out_of_range_trim() {
        let (mut graph, asset) = graph_with_asset(0.0);
        let clip = graph.add_clip(&asset, 0.0, 50.0).unwrap();
        assert!(graph.trims_beyond_asset().is_empty());

        graph.update_asset_duration(&asset, 20.0).unwrap();
        let beyond = graph.trims_beyond_asset();
        assert_eq!(beyond.len(), 1);
        assert_eq!(beyond[0].0.id, clip);
        assert_eq!(beyond[0].1, 20.0);

        graph.trim_clip(clip, 0.0, 20.0).unwrap();
        assert!(graph.trims_beyond_asset().is_empty());
    }

    #[test]
    fn test_unknown_duration_does_not_bound_trim() {
        let (mut graph, asset) = graph_with_asset(0.0);
        assert!(graph.add_clip(&asset, 0.0, 500.0).is_ok());
    }

    #[test]
    fn test_trim_clip_rejects_growth_into_neighbour() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 10.0).unwrap();
        graph.add_clip(&asset, 0.0, 10.0).unwrap();

        assert!(matches!(
            graph.trim_clip(a, 0.0, 12.0),
            Err(EditError::Overlap { .. })
        ));
        graph.trim_clip(a, 2.0, 8.0).unwrap();
        assert_eq!(span(&graph, a), (0, 0.0, 6.0));
    }

    #[test]
    fn test_trim_clip_rejects_cutting_off_overlay() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 10.0).unwrap();
        graph
            .add_text_overlay(a, TextOverlay::new("Late title", 7.0, 9.0))
            .unwrap();

        assert!(matches!(
            graph.trim_clip(a, 0.0, 8.0),
            Err(EditError::OverlayOutsideClip { .. })
        ));
        assert_eq!(graph.clip(a).unwrap().source_end, 10.0);
    }

    #[test]
    fn test_remove_asset_cascades_to_clips() {
        let mut graph = EditGraph::new();
        let keep = graph.add_asset(asset("keep", 30.0)).unwrap();
        let drop = graph.add_asset(asset("drop", 30.0)).unwrap();
        graph.add_clip(&keep, 0.0, 5.0).unwrap();
        graph.add_clip(&drop, 0.0, 5.0).unwrap();
        graph.add_clip(&drop, 5.0, 9.0).unwrap();

        graph.remove_asset(&drop).unwrap();
        assert_eq!(graph.clips().len(), 1);
        assert_eq!(graph.clips()[0].asset_id, keep);
    }

    #[test]
    fn test_duplicate_asset_rejected() {
        let (mut graph, _) = graph_with_asset(10.0);
        assert!(matches!(
            graph.add_asset(asset("a", 10.0)),
            Err(EditError::DuplicateAsset(_))
        ));
    }

    #[test]
    fn test_effects_edit_validated() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 10.0).unwrap();
        let bad = ClipEffects {
            speed: 8.0,
            ..ClipEffects::default()
        };
        assert!(graph.set_effects(a, bad).is_err());
        assert_eq!(graph.clip(a).unwrap().effects, ClipEffects::default());

        let good = ClipEffects {
            fade_in: 1.0,
            fade_out: 0.5,
            speed: 2.0,
        };
        graph.set_effects(a, good).unwrap();
        assert_eq!(graph.clip(a).unwrap().effects, good);
    }

    #[test]
    fn test_overlay_lifecycle() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 10.0).unwrap();

        let text = TextOverlay::new("Hello", 0.0, 3.0);
        let text_id = graph.add_text_overlay(a, text.clone()).unwrap();
        let image_id = graph
            .add_image_overlay(a, ImageOverlay::new("logo.png", 15.0, 1.0, 2.0))
            .unwrap();

        let mut edited = text;
        edited.text = "Hello again".to_string();
        graph.update_text_overlay(a, edited).unwrap();
        assert_eq!(graph.clip(a).unwrap().text_overlays[0].text, "Hello again");

        graph.remove_overlay(a, image_id).unwrap();
        assert!(graph.clip(a).unwrap().image_overlays.is_empty());
        assert_eq!(
            graph.remove_overlay(a, image_id),
            Err(EditError::UnknownOverlay(image_id))
        );
        assert_eq!(graph.clip(a).unwrap().overlay_ids().collect::<Vec<_>>(), vec![text_id]);
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 5.0).unwrap();
        let b = graph.add_clip(&asset, 5.0, 8.0).unwrap();

        assert_eq!(graph.reorder_clips(&[a]), Err(EditError::InvalidOrder));
        assert_eq!(graph.reorder_clips(&[a, a]), Err(EditError::InvalidOrder));
        assert_eq!(graph.sequencing(), Sequencing::Timeline);

        graph.reorder_clips(&[b, a]).unwrap();
        assert_eq!(graph.sequencing(), Sequencing::Manual);
        let order: Vec<ClipId> = graph.render_order().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(graph.total_duration(), 8.0);
    }

    #[test]
    fn test_render_order_follows_timeline_position() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let late = graph.add_clip_at(&asset, 0.0, 5.0, 0, 20.0).unwrap();
        let early_upper = graph.add_clip_at(&asset, 0.0, 5.0, 1, 0.0).unwrap();
        let early_base = graph.add_clip_at(&asset, 0.0, 5.0, 0, 0.0).unwrap();

        let order: Vec<ClipId> = graph.render_order().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![early_base, early_upper, late]);
    }

    #[test]
    fn test_audio_track_volume_bounds() {
        let mut graph = EditGraph::new();
        assert!(graph.add_audio_track("music.mp3", 1.5, 0.0).is_err());
        assert!(graph.add_audio_track("music.mp3", 0.5, -1.0).is_err());

        let id = graph.add_audio_track("music.mp3", 0.5, 2.0).unwrap();
        assert!(graph.set_audio_volume(id, -0.1).is_err());
        graph.set_audio_volume(id, 0.8).unwrap();
        assert_eq!(graph.audio_tracks()[0].volume, 0.8);

        graph.remove_audio_track(id).unwrap();
        assert!(graph.audio_tracks().is_empty());
    }

    struct FixedThumbnails;

    impl ThumbnailProvider for FixedThumbnails {
        fn thumbnail_at(&self, asset_id: &AssetId, offset_secs: f64) -> Option<String> {
            Some(format!("/static/temp/{asset_id}_thumb_{}.jpg", (offset_secs * 1000.0) as u64))
        }
    }

    #[test]
    fn test_thumbnail_uses_source_start() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 2.5, 10.0).unwrap();
        let thumb = graph.decorate_clip_thumbnail(a, &FixedThumbnails).unwrap();
        assert_eq!(thumb.as_deref(), Some("/static/temp/a_thumb_2500.jpg"));
        assert_eq!(graph.clip(a).unwrap().thumbnail, thumb);
    }

    #[test]
    fn test_graph_round_trips_through_json() {
        let (mut graph, asset) = graph_with_asset(60.0);
        let a = graph.add_clip(&asset, 0.0, 10.0).unwrap();
        graph
            .add_text_overlay(a, TextOverlay::new("Hi", 0.0, 1.0))
            .unwrap();
        let json = serde_json::to_string(&graph).unwrap();
        let parsed: EditGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph);
    }
}
