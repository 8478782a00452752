//! Audio tracks mixed into the final render.

use serde::{Deserialize, Serialize};

use crate::ids::AudioTrackId;

/// An external audio source laid under the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: AudioTrackId,

    /// Source locator of the audio file.
    pub source: String,

    /// Mix volume in `[0.0, 1.0]`.
    pub volume: f64,

    /// Offset into the final mix, in seconds.
    pub start_secs: f64,
}

impl AudioTrack {
    pub fn is_valid_volume(volume: f64) -> bool {
        (0.0..=1.0).contains(&volume)
    }
}
