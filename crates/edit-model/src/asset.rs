//! Media assets supplied by the ingestion collaborator.

use serde::{Deserialize, Serialize};

use crate::ids::AssetId;

/// Where an asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaOrigin {
    /// Uploaded from the local machine.
    Local,
    /// Fetched from a URL.
    Remote,
}

/// A media file the timeline can reference. Read-only to the edit graph
/// except for the duration refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: AssetId,

    /// Display name (usually the original file name).
    pub name: String,

    /// Raw source locator as first seen (file path, URL, or a transient handle).
    pub source: String,

    /// Locator the render engine can fetch, once ingestion has stored the file.
    #[serde(default)]
    pub durable_locator: Option<String>,

    /// Duration in seconds. `0.0` means unknown.
    pub duration_secs: f64,

    #[serde(default)]
    pub thumbnail: Option<String>,

    pub origin: MediaOrigin,
}

impl MediaAsset {
    /// Build an asset from an ingestion result.
    pub fn from_ingested(
        name: impl Into<String>,
        source: impl Into<String>,
        origin: MediaOrigin,
        ingested: IngestedMedia,
    ) -> Self {
        Self {
            id: ingested.asset_id,
            name: name.into(),
            source: source.into(),
            durable_locator: ingested.durable_locator,
            duration_secs: ingested.duration_secs.max(0.0),
            thumbnail: ingested.thumbnail,
            origin,
        }
    }

    /// Whether the duration is known. Unknown durations do not bound trims.
    pub fn has_known_duration(&self) -> bool {
        self.duration_secs > 0.0
    }
}

/// What the ingestion collaborator returns for a raw source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedMedia {
    pub asset_id: AssetId,
    pub durable_locator: Option<String>,
    pub duration_secs: f64,
    pub thumbnail: Option<String>,
}

/// Still-frame provider used to decorate clips after placement.
pub trait ThumbnailProvider {
    /// Locator of a still frame at `offset_secs` into the asset, if available.
    fn thumbnail_at(&self, asset_id: &AssetId, offset_secs: f64) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ingested_clamps_negative_duration() {
        let asset = MediaAsset::from_ingested(
            "intro.mp4",
            "blob:local/123",
            MediaOrigin::Local,
            IngestedMedia {
                asset_id: AssetId::new("abc"),
                durable_locator: Some("/static/uploads/abc.mp4".to_string()),
                duration_secs: -3.0,
                thumbnail: None,
            },
        );
        assert_eq!(asset.duration_secs, 0.0);
        assert!(!asset.has_known_duration());
        assert_eq!(asset.id.as_str(), "abc");
    }
}
