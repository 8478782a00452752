//! Show project information.

use std::path::PathBuf;

use super::load_project;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let project = load_project(&path)?;
    let p = &project.project;
    let graph = &p.graph;

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.modified_at);
    println!();

    println!("Assets:");
    for asset in graph.assets() {
        let locator = asset.durable_locator.as_deref().unwrap_or("(no durable locator)");
        if asset.has_known_duration() {
            println!("  {} {} ({:.1}s) -> {}", asset.id, asset.name, asset.duration_secs, locator);
        } else {
            println!("  {} {} (duration unknown) -> {}", asset.id, asset.name, locator);
        }
    }
    println!();

    println!("Timeline ({:?}, {:.2}s):", graph.sequencing(), graph.total_duration());
    let max_track = graph.max_track().unwrap_or(0);
    for track in 0..=max_track {
        let clips = graph.clips_on_track(track);
        if clips.is_empty() {
            continue;
        }
        println!("  Track {track}:");
        for clip in clips {
            println!(
                "    {} [{:.2}, {:.2}) {} {:.2}-{:.2}s",
                clip.id,
                clip.timeline_start,
                clip.timeline_end,
                clip.asset_id,
                clip.source_start,
                clip.source_end
            );
            let e = &clip.effects;
            if e.fade_in > 0.0 || e.fade_out > 0.0 || e.speed != 1.0 {
                println!(
                    "      effects: fade in {:.2}s, fade out {:.2}s, speed {:.2}x",
                    e.fade_in, e.fade_out, e.speed
                );
            }
            for overlay in &clip.text_overlays {
                println!(
                    "      text {} \"{}\" [{:.2}, {:.2})",
                    overlay.id, overlay.text, overlay.start_secs, overlay.end_secs
                );
            }
            for overlay in &clip.image_overlays {
                println!(
                    "      image {} {} [{:.2}, {:.2})",
                    overlay.id, overlay.image, overlay.start_secs, overlay.end_secs
                );
            }
        }
    }
    println!();

    if !graph.audio_tracks().is_empty() {
        println!("Audio:");
        for track in graph.audio_tracks() {
            println!(
                "  {} {} at {:.2}s, volume {:.2}",
                track.id, track.source, track.start_secs, track.volume
            );
        }
        println!();
    }

    let (width, height) = p.export.output_dimensions();
    println!("Export config:");
    println!("  Preset: {}", p.export);
    println!(
        "  Output: {}x{} @ {}fps, {} kbps, {}",
        width,
        height,
        p.export.quality.preset().fps,
        p.export.quality.preset().video_bitrate_kbps,
        p.export.format.codec_hint()
    );

    Ok(())
}
