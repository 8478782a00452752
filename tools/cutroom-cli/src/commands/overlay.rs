//! Text and image overlays. Overlay times are relative to the clip.

use std::path::PathBuf;

use cutroom_common::error::CutroomError;
use cutroom_edit_model::{ClipId, ImageOverlay, ImageShape, OverlayPosition, TextOverlay};

use super::{load_project, save_project};

pub struct TextArgs {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub font: String,
    pub size: u32,
    pub color: String,
    pub x: f64,
    pub y: f64,
}

pub struct ImageArgs {
    pub image: String,
    pub start: f64,
    pub end: f64,
    pub width: f64,
    pub top: f64,
    pub left: f64,
    pub shape: ImageShape,
}

pub fn text(path: PathBuf, clip: ClipId, args: TextArgs) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;

    let mut overlay = TextOverlay::new(args.text, args.start, args.end);
    overlay.font_family = args.font;
    overlay.font_size = args.size;
    overlay.color = args.color;
    overlay.position = OverlayPosition { x: args.x, y: args.y };

    let id = project
        .project
        .graph
        .add_text_overlay(clip, overlay)
        .map_err(|e| CutroomError::edit(e.to_string()))?;
    save_project(&mut project)?;

    println!("Added text overlay {id} to clip {clip}");
    Ok(())
}

pub fn image(path: PathBuf, clip: ClipId, args: ImageArgs) -> anyhow::Result<()> {
    let mut project = load_project(&path)?;

    let mut overlay = ImageOverlay::new(args.image, args.width, args.start, args.end);
    overlay.from_top_percent = args.top;
    overlay.from_start_percent = args.left;
    overlay.shape = args.shape;

    let id = project
        .project
        .graph
        .add_image_overlay(clip, overlay)
        .map_err(|e| CutroomError::edit(e.to_string()))?;
    save_project(&mut project)?;

    println!("Added image overlay {id} to clip {clip}");
    Ok(())
}
