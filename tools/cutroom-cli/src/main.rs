//! Cutroom CLI: build a timeline in a project directory and export it.
//!
//! Usage:
//!   cutroom init <NAME>                 Create a new project
//!   cutroom import <PATH> ...           Register an ingested asset
//!   cutroom add-clip <PATH> ...         Place a trimmed asset on the timeline
//!   cutroom move-clip <PATH> <CLIP> ... Reposition a clip
//!   cutroom info <PATH>                 Show the project timeline
//!   cutroom validate <PATH>             Check a project before export
//!   cutroom export <PATH> [--preset]    Render one or more exports
//!   cutroom stats                       Show render engine job counts

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cutroom_common::config::AppConfig;
use cutroom_edit_model::{ClipId, ExportSettings, ImageShape};

mod commands;

#[derive(Parser)]
#[command(
    name = "cutroom",
    about = "Multi-track timeline editing with asynchronous render exports",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Render engine base URL (overrides the config file)
    #[arg(long, global = true)]
    engine_url: Option<String>,

    /// Skip the render engine; exports run in degraded mode
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty project
    Init {
        /// Project name
        name: String,

        /// Parent directory (defaults to the configured projects directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Register an asset returned by the ingestion service
    Import {
        /// Path to the project directory
        path: PathBuf,

        /// Asset id assigned at ingestion
        #[arg(long)]
        id: String,

        /// Raw source the user picked (file path or URL)
        #[arg(long)]
        source: String,

        /// Durable locator the render engine can fetch
        #[arg(long)]
        locator: Option<String>,

        /// Duration in seconds (0 = unknown)
        #[arg(long, default_value = "0")]
        duration: f64,

        /// Display name (defaults to the source's file name)
        #[arg(long)]
        name: Option<String>,

        /// Thumbnail locator
        #[arg(long)]
        thumbnail: Option<String>,

        /// The source is a remote URL rather than a local file
        #[arg(long)]
        remote: bool,
    },

    /// Add a trimmed range of an asset to the timeline
    AddClip {
        /// Path to the project directory
        path: PathBuf,

        /// Asset to cut from
        #[arg(long)]
        asset: String,

        /// Trim start within the asset (seconds)
        #[arg(long, default_value = "0")]
        start: f64,

        /// Trim end within the asset (seconds)
        #[arg(long)]
        end: f64,

        /// Explicit track (requires --at)
        #[arg(long, requires = "at")]
        track: Option<u32>,

        /// Explicit timeline start (requires --track)
        #[arg(long, requires = "track")]
        at: Option<f64>,
    },

    /// Move a clip to another track or time
    MoveClip {
        /// Path to the project directory
        path: PathBuf,

        clip: ClipId,

        #[arg(long)]
        track: u32,

        #[arg(long)]
        start: f64,
    },

    /// Change a clip's source range
    TrimClip {
        /// Path to the project directory
        path: PathBuf,

        clip: ClipId,

        #[arg(long)]
        start: f64,

        #[arg(long)]
        end: f64,
    },

    /// Remove a clip from the timeline
    RemoveClip {
        /// Path to the project directory
        path: PathBuf,

        clip: ClipId,
    },

    /// Set fades and speed on a clip
    Effects {
        /// Path to the project directory
        path: PathBuf,

        clip: ClipId,

        #[arg(long)]
        fade_in: Option<f64>,

        #[arg(long)]
        fade_out: Option<f64>,

        /// Playback speed, 0.25 to 4.0
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Add a text overlay to a clip
    Text {
        /// Path to the project directory
        path: PathBuf,

        clip: ClipId,

        text: String,

        /// Clip-relative start (seconds)
        #[arg(long)]
        start: f64,

        /// Clip-relative end (seconds)
        #[arg(long)]
        end: f64,

        #[arg(long, default_value = "Arial")]
        font: String,

        #[arg(long, default_value = "32")]
        size: u32,

        #[arg(long, default_value = "#ffffff")]
        color: String,

        /// Horizontal position, percent of frame width
        #[arg(long, default_value = "50")]
        x: f64,

        /// Vertical position, percent of frame height
        #[arg(long, default_value = "50")]
        y: f64,
    },

    /// Add an image overlay to a clip
    Image {
        /// Path to the project directory
        path: PathBuf,

        clip: ClipId,

        /// Image locator
        image: String,

        #[arg(long)]
        start: f64,

        #[arg(long)]
        end: f64,

        /// Width, percent of frame width
        #[arg(long, default_value = "20")]
        width: f64,

        #[arg(long, default_value = "0")]
        top: f64,

        #[arg(long, default_value = "0")]
        left: f64,

        /// circle, rectangle or square
        #[arg(long, default_value = "circle", value_parser = parse_shape)]
        shape: ImageShape,
    },

    /// Add a background audio track
    Audio {
        /// Path to the project directory
        path: PathBuf,

        /// Audio locator
        source: String,

        /// Volume, 0.0 to 1.0
        #[arg(long, default_value = "1.0")]
        volume: f64,

        /// Timeline start (seconds)
        #[arg(long, default_value = "0")]
        start: f64,
    },

    /// Show project information
    Info {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Validate a project before export
    Validate {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Export a project through the render engine
    Export {
        /// Path to the project directory
        path: PathBuf,

        /// Export preset as aspect/quality/format, e.g. 9:16/high/mp4.
        /// Repeat for a batch. Defaults to the project's export settings.
        #[arg(short, long = "preset")]
        presets: Vec<ExportSettings>,

        /// Print job records as JSON when done
        #[arg(long)]
        json: bool,
    },

    /// Show the render engine's job counts
    Stats,
}

fn parse_shape(value: &str) -> Result<ImageShape, String> {
    match value.to_ascii_lowercase().as_str() {
        "circle" => Ok(ImageShape::Circle),
        "rectangle" => Ok(ImageShape::Rectangle),
        "square" => Ok(ImageShape::Square),
        _ => Err(format!("unknown shape: {value}. Use: circle, rectangle, square")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(url) = cli.engine_url {
        config.engine.base_url = url;
    }
    cutroom_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Init { name, output } => {
            let parent = output.unwrap_or_else(|| config.projects_dir.clone());
            commands::init::run(name, parent)
        }
        Commands::Import {
            path,
            id,
            source,
            locator,
            duration,
            name,
            thumbnail,
            remote,
        } => commands::edit::import(
            path,
            commands::edit::ImportArgs {
                id,
                source,
                locator,
                duration,
                name,
                thumbnail,
                remote,
            },
        ),
        Commands::AddClip {
            path,
            asset,
            start,
            end,
            track,
            at,
        } => {
            commands::edit::add_clip(path, asset, start, end, track.zip(at), &config, cli.offline)
                .await
        }
        Commands::MoveClip {
            path,
            clip,
            track,
            start,
        } => commands::edit::move_clip(path, clip, track, start),
        Commands::TrimClip {
            path,
            clip,
            start,
            end,
        } => commands::edit::trim_clip(path, clip, start, end),
        Commands::RemoveClip { path, clip } => commands::edit::remove_clip(path, clip),
        Commands::Effects {
            path,
            clip,
            fade_in,
            fade_out,
            speed,
        } => commands::edit::effects(path, clip, fade_in, fade_out, speed),
        Commands::Text {
            path,
            clip,
            text,
            start,
            end,
            font,
            size,
            color,
            x,
            y,
        } => commands::overlay::text(
            path,
            clip,
            commands::overlay::TextArgs {
                text,
                start,
                end,
                font,
                size,
                color,
                x,
                y,
            },
        ),
        Commands::Image {
            path,
            clip,
            image,
            start,
            end,
            width,
            top,
            left,
            shape,
        } => commands::overlay::image(
            path,
            clip,
            commands::overlay::ImageArgs {
                image,
                start,
                end,
                width,
                top,
                left,
                shape,
            },
        ),
        Commands::Audio {
            path,
            source,
            volume,
            start,
        } => commands::edit::audio(path, source, volume, start),
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Export {
            path,
            presets,
            json,
        } => commands::export::run(path, presets, &config, cli.offline, json).await,
        Commands::Stats => commands::stats::run(&config, cli.offline).await,
    }
}
