//! Timeline clips, per-clip effects, and overlays.
//!
//! Overlay times are relative to the clip start and must fall inside
//! `[0, clip duration]`. Positions and sizes are percentages of the frame.

use serde::{Deserialize, Serialize};

use crate::graph::EditError;
use crate::ids::{AssetId, ClipId, OverlayId};

/// Slowest allowed playback speed multiplier.
pub const MIN_SPEED: f64 = 0.25;
/// Fastest allowed playback speed multiplier.
pub const MAX_SPEED: f64 = 4.0;
/// Smallest text overlay font size in pixels.
pub const MIN_FONT_SIZE: u32 = 12;
/// Largest text overlay font size in pixels.
pub const MAX_FONT_SIZE: u32 = 120;

/// A trimmed asset range placed on a track.
///
/// `timeline_end - timeline_start == source_end - source_start` always holds
/// for clips owned by an [`EditGraph`](crate::EditGraph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    pub asset_id: AssetId,

    /// Trim start within the asset (seconds).
    pub source_start: f64,
    /// Trim end within the asset (seconds).
    pub source_end: f64,

    /// Track index, 0 is the base track.
    pub track: u32,

    /// Placement on the global timeline, half-open.
    pub timeline_start: f64,
    pub timeline_end: f64,

    #[serde(default)]
    pub effects: ClipEffects,

    #[serde(default)]
    pub text_overlays: Vec<TextOverlay>,

    #[serde(default)]
    pub image_overlays: Vec<ImageOverlay>,

    /// Still frame decorating the clip in the timeline, if one was fetched.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Clip {
    /// Length of the trimmed range, which is also its length on the timeline.
    pub fn duration(&self) -> f64 {
        self.source_end - self.source_start
    }

    /// Whether `[start, end)` intersects this clip's timeline interval.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        crate::placement::intervals_overlap(start, end, self.timeline_start, self.timeline_end)
    }

    pub fn overlay_ids(&self) -> impl Iterator<Item = OverlayId> + '_ {
        self.text_overlays
            .iter()
            .map(|o| o.id)
            .chain(self.image_overlays.iter().map(|o| o.id))
    }

    /// Check every overlay window against a candidate clip duration.
    pub(crate) fn check_overlays_fit(&self, duration: f64) -> Result<(), EditError> {
        for overlay in &self.text_overlays {
            if overlay.end_secs > duration {
                return Err(EditError::OverlayOutsideClip {
                    overlay: overlay.id,
                    clip_duration: duration,
                });
            }
        }
        for overlay in &self.image_overlays {
            if overlay.end_secs > duration {
                return Err(EditError::OverlayOutsideClip {
                    overlay: overlay.id,
                    clip_duration: duration,
                });
            }
        }
        Ok(())
    }
}

/// Per-clip effects applied by the render engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipEffects {
    /// Fade-in length in seconds.
    pub fade_in: f64,
    /// Fade-out length in seconds.
    pub fade_out: f64,
    /// Playback speed multiplier in `[0.25, 4.0]`.
    pub speed: f64,
}

impl Default for ClipEffects {
    fn default() -> Self {
        Self {
            fade_in: 0.0,
            fade_out: 0.0,
            speed: 1.0,
        }
    }
}

impl ClipEffects {
    pub fn validate(&self) -> Result<(), EditError> {
        if !self.fade_in.is_finite() || self.fade_in < 0.0 {
            return Err(EditError::ValueOutOfRange {
                field: "fade_in",
                value: self.fade_in,
            });
        }
        if !self.fade_out.is_finite() || self.fade_out < 0.0 {
            return Err(EditError::ValueOutOfRange {
                field: "fade_out",
                value: self.fade_out,
            });
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(EditError::ValueOutOfRange {
                field: "speed",
                value: self.speed,
            });
        }
        Ok(())
    }
}

/// Normalized overlay anchor; both axes are percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for OverlayPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// Text drawn over a clip for part of its duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub id: OverlayId,
    pub text: String,
    pub font_family: String,
    /// Font size in pixels, `12..=120`.
    pub font_size: u32,
    /// CSS-style color, e.g. `#ffffff`.
    pub color: String,
    pub position: OverlayPosition,
    /// Clip-relative start (seconds).
    pub start_secs: f64,
    /// Clip-relative end (seconds).
    pub end_secs: f64,
}

impl TextOverlay {
    /// A white 32px Arial overlay centered in the frame.
    pub fn new(text: impl Into<String>, start_secs: f64, end_secs: f64) -> Self {
        Self {
            id: OverlayId::new(),
            text: text.into(),
            font_family: "Arial".to_string(),
            font_size: 32,
            color: "#ffffff".to_string(),
            position: OverlayPosition::default(),
            start_secs,
            end_secs,
        }
    }

    pub fn validate(&self, clip_duration: f64) -> Result<(), EditError> {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&self.font_size) {
            return Err(EditError::ValueOutOfRange {
                field: "font_size",
                value: self.font_size as f64,
            });
        }
        check_percent("position.x", self.position.x)?;
        check_percent("position.y", self.position.y)?;
        check_overlay_window(self.start_secs, self.end_secs, clip_duration)
    }
}

/// Mask shape applied to an image overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageShape {
    #[default]
    Circle,
    Rectangle,
    Square,
}

/// An image composited over a clip for part of its duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOverlay {
    pub id: OverlayId,
    /// Locator of the overlay image.
    pub image: String,
    /// Optional locator of a pre-shaped mask image.
    #[serde(default)]
    pub shape_mask: Option<String>,
    pub shape: ImageShape,
    /// Overlay width as a percentage of frame width.
    pub width_percent: f64,
    /// Offset from the top edge as a percentage of frame height.
    pub from_top_percent: f64,
    /// Offset from the leading edge as a percentage of frame width.
    pub from_start_percent: f64,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl ImageOverlay {
    pub fn new(image: impl Into<String>, width_percent: f64, start_secs: f64, end_secs: f64) -> Self {
        Self {
            id: OverlayId::new(),
            image: image.into(),
            shape_mask: None,
            shape: ImageShape::default(),
            width_percent,
            from_top_percent: 0.0,
            from_start_percent: 0.0,
            start_secs,
            end_secs,
        }
    }

    pub fn validate(&self, clip_duration: f64) -> Result<(), EditError> {
        if !self.width_percent.is_finite() || self.width_percent <= 0.0 || self.width_percent > 100.0
        {
            return Err(EditError::ValueOutOfRange {
                field: "width_percent",
                value: self.width_percent,
            });
        }
        check_percent("from_top_percent", self.from_top_percent)?;
        check_percent("from_start_percent", self.from_start_percent)?;
        check_overlay_window(self.start_secs, self.end_secs, clip_duration)
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), EditError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(EditError::ValueOutOfRange { field, value })
    }
}

/// `0 <= start < end <= clip_duration`.
fn check_overlay_window(start: f64, end: f64, clip_duration: f64) -> Result<(), EditError> {
    if start >= 0.0 && start < end && end <= clip_duration {
        Ok(())
    } else {
        Err(EditError::OverlayTiming {
            start,
            end,
            clip_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effects_speed_bounds() {
        let mut effects = ClipEffects::default();
        assert!(effects.validate().is_ok());

        effects.speed = 0.25;
        assert!(effects.validate().is_ok());
        effects.speed = 4.0;
        assert!(effects.validate().is_ok());

        effects.speed = 4.5;
        assert!(matches!(
            effects.validate(),
            Err(EditError::ValueOutOfRange { field: "speed", .. })
        ));
    }

    #[test]
    fn test_effects_reject_negative_fades() {
        let effects = ClipEffects {
            fade_in: -0.5,
            ..ClipEffects::default()
        };
        assert!(effects.validate().is_err());
    }

    #[test]
    fn test_text_overlay_window_must_fit_clip() {
        let overlay = TextOverlay::new("Hello", 1.0, 4.0);
        assert!(overlay.validate(4.0).is_ok());
        assert!(matches!(
            overlay.validate(3.5),
            Err(EditError::OverlayTiming { .. })
        ));

        let inverted = TextOverlay::new("Hello", 2.0, 2.0);
        assert!(inverted.validate(10.0).is_err());
    }

    #[test]
    fn test_text_overlay_font_size_bounds() {
        let mut overlay = TextOverlay::new("Title", 0.0, 1.0);
        overlay.font_size = 11;
        assert!(overlay.validate(5.0).is_err());
        overlay.font_size = 120;
        assert!(overlay.validate(5.0).is_ok());
    }

    #[test]
    fn test_image_overlay_percent_bounds() {
        let mut overlay = ImageOverlay::new("https://cdn.example/logo.png", 20.0, 0.0, 2.0);
        assert!(overlay.validate(2.0).is_ok());

        overlay.from_top_percent = 101.0;
        assert!(overlay.validate(2.0).is_err());

        overlay.from_top_percent = 10.0;
        overlay.width_percent = 0.0;
        assert!(overlay.validate(2.0).is_err());
    }

    #[test]
    fn test_image_shape_wire_names() {
        assert_eq!(
            serde_json::to_string(&ImageShape::Rectangle).unwrap(),
            "\"RECTANGLE\""
        );
    }
}
