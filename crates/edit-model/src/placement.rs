//! Track placement: where new clips land and whether a drag is legal.
//!
//! Every function here is pure over a clip slice. The invariant they protect
//! is that clips sharing a track never overlap on `[timeline_start,
//! timeline_end)`.

use crate::clip::Clip;
use crate::ids::ClipId;

/// Track tried first by auto-placement.
pub const BASE_TRACK: u32 = 0;

/// Highest track auto-placement searches before opening a fresh one.
pub const MAX_SEARCHED_TRACK: u32 = 9;

/// Where a clip lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub track: u32,
    pub start: f64,
}

/// Why a reposition was refused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementRejection {
    UnknownClip,
    NegativeStart,
    Overlap { with: ClipId },
}

/// Half-open interval intersection test.
pub fn intervals_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

/// First clip on `track` that intersects `[start, end)`, skipping `ignore`.
pub fn find_conflict(
    clips: &[Clip],
    track: u32,
    start: f64,
    end: f64,
    ignore: Option<ClipId>,
) -> Option<ClipId> {
    clips
        .iter()
        .filter(|c| c.track == track && Some(c.id) != ignore)
        .find(|c| c.overlaps(start, end))
        .map(|c| c.id)
}

/// Whether `[start, end)` on `track` is free.
pub fn is_free(clips: &[Clip], track: u32, start: f64, end: f64, ignore: Option<ClipId>) -> bool {
    find_conflict(clips, track, start, end, ignore).is_none()
}

/// Latest end time on a track, or 0 when the track is empty.
pub fn track_end(clips: &[Clip], track: u32) -> f64 {
    clips
        .iter()
        .filter(|c| c.track == track)
        .map(|c| c.timeline_end)
        .fold(0.0, f64::max)
}

/// Choose a track and start time for a new clip of `duration` seconds.
///
/// Prefers appending to the base track, then the first gap on the base
/// track that fits, then the first of tracks 1..=9 free at the base track's
/// end, and finally a fresh track above every track in use. The result never
/// overlaps an existing clip.
pub fn auto_place(clips: &[Clip], duration: f64) -> Placement {
    let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    let base_end = track_end(clips, BASE_TRACK);

    if is_free(clips, BASE_TRACK, base_end, base_end + duration, None) {
        return Placement {
            track: BASE_TRACK,
            start: base_end,
        };
    }

    if let Some(start) = first_gap(clips, BASE_TRACK, duration) {
        return Placement {
            track: BASE_TRACK,
            start,
        };
    }

    for track in (BASE_TRACK + 1)..=MAX_SEARCHED_TRACK {
        if is_free(clips, track, base_end, base_end + duration, None) {
            return Placement {
                track,
                start: base_end,
            };
        }
    }

    let fresh = clips.iter().map(|c| c.track).max().unwrap_or(BASE_TRACK) + 1;
    tracing::debug!(track = fresh, "No free track in search range, opening a new one");
    Placement {
        track: fresh,
        start: base_end,
    }
}

/// Earliest gap on `track` (starting from 0) at least `duration` long,
/// looking only between existing clips.
fn first_gap(clips: &[Clip], track: u32, duration: f64) -> Option<f64> {
    let mut on_track: Vec<&Clip> = clips.iter().filter(|c| c.track == track).collect();
    on_track.sort_by(|a, b| a.timeline_start.total_cmp(&b.timeline_start));

    let mut cursor = 0.0_f64;
    for clip in on_track {
        if clip.timeline_start - cursor >= duration {
            return Some(cursor);
        }
        cursor = cursor.max(clip.timeline_end);
    }
    None
}

/// Check a drag of `clip_id` to `(target_track, new_start)`.
///
/// The clip keeps its duration. Returns the accepted placement or the
/// reason it was refused; callers apply nothing on refusal.
pub fn check_reposition(
    clips: &[Clip],
    clip_id: ClipId,
    target_track: u32,
    new_start: f64,
) -> Result<Placement, PlacementRejection> {
    let clip = clips
        .iter()
        .find(|c| c.id == clip_id)
        .ok_or(PlacementRejection::UnknownClip)?;

    if !new_start.is_finite() || new_start < 0.0 {
        return Err(PlacementRejection::NegativeStart);
    }

    let new_end = new_start + (clip.timeline_end - clip.timeline_start);
    if let Some(other) = find_conflict(clips, target_track, new_start, new_end, Some(clip_id)) {
        return Err(PlacementRejection::Overlap { with: other });
    }

    Ok(Placement {
        track: target_track,
        start: new_start,
    })
}
