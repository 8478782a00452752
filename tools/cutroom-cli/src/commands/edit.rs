//! Timeline edits: each command loads the project, applies one edit, and
//! saves. A rejected edit leaves the file untouched.

use std::path::{Path, PathBuf};

use cutroom_common::config::AppConfig;
use cutroom_common::error::{CutroomError, CutroomResult};
use cutroom_edit_model::{AssetId, ClipId, EditError, EditGraph, IngestedMedia, MediaAsset, MediaOrigin};
use cutroom_render_client::{EngineThumbnails, HttpRenderEngine};

use super::{load_project, save_project};

pub struct ImportArgs {
    pub id: String,
    pub source: String,
    pub locator: Option<String>,
    pub duration: f64,
    pub name: Option<String>,
    pub thumbnail: Option<String>,
    pub remote: bool,
}

fn rejected(err: EditError) -> CutroomError {
    CutroomError::edit(err.to_string())
}

fn edit<R>(
    path: &Path,
    apply: impl FnOnce(&mut EditGraph) -> Result<R, EditError>,
) -> CutroomResult<R> {
    let mut project = load_project(path)?;
    let out = apply(&mut project.project.graph).map_err(rejected)?;
    save_project(&mut project)?;
    Ok(out)
}

fn file_name(source: &str) -> String {
    source
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or(source)
        .to_string()
}

pub fn import(path: PathBuf, args: ImportArgs) -> anyhow::Result<()> {
    let origin = if args.remote {
        MediaOrigin::Remote
    } else {
        MediaOrigin::Local
    };
    let name = args.name.unwrap_or_else(|| file_name(&args.source));
    let asset = MediaAsset::from_ingested(
        name,
        args.source,
        origin,
        IngestedMedia {
            asset_id: AssetId::new(args.id),
            durable_locator: args.locator,
            duration_secs: args.duration,
            thumbnail: args.thumbnail,
        },
    );

    let known = asset.has_known_duration();
    let display = format!("{} ({})", asset.name, asset.id);
    edit(&path, |graph| graph.add_asset(asset))?;

    println!("Imported {display}");
    if !known {
        println!("  Duration unknown; trims are not bounded until it is refreshed.");
    }
    Ok(())
}

/// Place a clip, then decorate it with the engine's still at its source
/// start. Without the engine, the still recorded at import is used.
pub async fn add_clip(
    path: PathBuf,
    asset: String,
    start: f64,
    end: f64,
    explicit: Option<(u32, f64)>,
    config: &AppConfig,
    offline: bool,
) -> anyhow::Result<()> {
    let asset = AssetId::new(asset);
    let mut project = load_project(&path)?;
    let graph = &mut project.project.graph;

    let id = match explicit {
        Some((track, at)) => graph.add_clip_at(&asset, start, end, track, at),
        None => graph.add_clip(&asset, start, end),
    }
    .map_err(rejected)?;

    let mut thumbnails = EngineThumbnails::from_graph(graph);
    if !offline {
        let engine = HttpRenderEngine::from_config(&config.engine)?;
        if let Err(err) = thumbnails.fetch(&engine, &asset, start).await {
            tracing::warn!(asset = %asset, error = %err, "Thumbnail fetch failed");
            println!("  Thumbnail unavailable from engine; using the import still");
        }
    }
    graph
        .decorate_clip_thumbnail(id, &thumbnails)
        .map_err(rejected)?;
    let clip = graph.clip(id).cloned();
    save_project(&mut project)?;

    if let Some(clip) = clip {
        println!("Added clip {}", clip.id);
        println!(
            "  Track {} at {:.2}s to {:.2}s (source {:.2}s to {:.2}s)",
            clip.track, clip.timeline_start, clip.timeline_end, clip.source_start, clip.source_end
        );
        if let Some(thumbnail) = &clip.thumbnail {
            println!("  Thumbnail: {thumbnail}");
        }
    }
    Ok(())
}

pub fn move_clip(path: PathBuf, clip: ClipId, track: u32, start: f64) -> anyhow::Result<()> {
    edit(&path, |graph| graph.move_clip(clip, track, start))?;
    println!("Moved clip {clip} to track {track} at {start:.2}s");
    Ok(())
}

pub fn trim_clip(path: PathBuf, clip: ClipId, start: f64, end: f64) -> anyhow::Result<()> {
    edit(&path, |graph| graph.trim_clip(clip, start, end))?;
    println!("Trimmed clip {clip} to source {start:.2}s to {end:.2}s");
    Ok(())
}

pub fn remove_clip(path: PathBuf, clip: ClipId) -> anyhow::Result<()> {
    let removed = edit(&path, |graph| graph.remove_clip(clip))?;
    println!("Removed clip {} from track {}", removed.id, removed.track);
    Ok(())
}

pub fn effects(
    path: PathBuf,
    clip: ClipId,
    fade_in: Option<f64>,
    fade_out: Option<f64>,
    speed: Option<f64>,
) -> anyhow::Result<()> {
    let effects = edit(&path, |graph| {
        let mut effects = graph
            .clip(clip)
            .map(|c| c.effects)
            .ok_or(EditError::UnknownClip(clip))?;
        if let Some(v) = fade_in {
            effects.fade_in = v;
        }
        if let Some(v) = fade_out {
            effects.fade_out = v;
        }
        if let Some(v) = speed {
            effects.speed = v;
        }
        graph.set_effects(clip, effects)?;
        Ok(effects)
    })?;
    println!(
        "Clip {clip}: fade in {:.2}s, fade out {:.2}s, speed {:.2}x",
        effects.fade_in, effects.fade_out, effects.speed
    );
    Ok(())
}

pub fn audio(path: PathBuf, source: String, volume: f64, start: f64) -> anyhow::Result<()> {
    let id = edit(&path, |graph| graph.add_audio_track(source.clone(), volume, start))?;
    println!("Added audio track {id}: {source} at {start:.2}s, volume {volume:.2}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_path_and_url() {
        assert_eq!(file_name("/home/me/clips/intro.mp4"), "intro.mp4");
        assert_eq!(file_name("https://cdn.example/v/main.mov"), "main.mov");
        assert_eq!(file_name("plain.avi"), "plain.avi");
    }

    #[test]
    fn test_rejected_edit_maps_to_edit_error() {
        let err = rejected(EditError::NegativeStart(-1.0));
        assert!(matches!(err, CutroomError::Edit { .. }));
        assert!(err.to_string().contains("-1"));
    }
}
