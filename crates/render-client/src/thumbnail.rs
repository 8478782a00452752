//! Still frames for timeline clips.

use std::collections::HashMap;

use cutroom_edit_model::{AssetId, EditGraph, ThumbnailProvider};
use tracing::debug;

use crate::engine::EngineError;
use crate::http::HttpRenderEngine;

/// Offsets are matched at millisecond precision, as the engine names stills.
fn offset_key(offset_secs: f64) -> u64 {
    (offset_secs.max(0.0) * 1000.0).round() as u64
}

/// Stills fetched from the render engine, keyed by asset and offset.
///
/// An offset that was never fetched falls back to the still recorded when
/// the asset was ingested.
#[derive(Debug, Clone, Default)]
pub struct EngineThumbnails {
    fetched: HashMap<(AssetId, u64), String>,
    imported: HashMap<AssetId, String>,
}

impl EngineThumbnails {
    /// Start from the import stills of every asset in `graph`.
    pub fn from_graph(graph: &EditGraph) -> Self {
        let imported = graph
            .assets()
            .iter()
            .filter_map(|a| a.thumbnail.clone().map(|t| (a.id.clone(), t)))
            .collect();
        Self {
            fetched: HashMap::new(),
            imported,
        }
    }

    /// Fetch the still at `offset_secs` into `asset`. On error nothing is
    /// recorded and lookups keep using the import still.
    pub async fn fetch(
        &mut self,
        engine: &HttpRenderEngine,
        asset: &AssetId,
        offset_secs: f64,
    ) -> Result<(), EngineError> {
        let still = engine.thumbnail(asset, offset_secs).await?;
        debug!(asset = %asset, offset_secs, still = %still, "Fetched thumbnail");
        self.insert(asset.clone(), offset_secs, still);
        Ok(())
    }

    pub fn insert(&mut self, asset: AssetId, offset_secs: f64, still: impl Into<String>) {
        self.fetched
            .insert((asset, offset_key(offset_secs)), still.into());
    }
}

impl ThumbnailProvider for EngineThumbnails {
    fn thumbnail_at(&self, asset_id: &AssetId, offset_secs: f64) -> Option<String> {
        self.fetched
            .get(&(asset_id.clone(), offset_key(offset_secs)))
            .or_else(|| self.imported.get(asset_id))
            .cloned()
    }
}
