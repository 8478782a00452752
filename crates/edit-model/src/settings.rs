//! Export settings chosen by the user at export time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// 1:1 square.
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 widescreen.
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 vertical.
    #[serde(rename = "9:16")]
    Portrait,
}

/// Output quality tier. Each tier maps to a fixed [`QualityPreset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Optimised,
    High,
}

/// Output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Mov,
    Avi,
}

/// Resolution and rate targets for a quality tier (landscape orientation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityPreset {
    pub width: u32,
    pub height: u32,
    pub video_bitrate_kbps: u32,
    pub fps: u32,
}

/// The three user-selected export fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ExportSettings {
    pub aspect_ratio: AspectRatio,
    pub quality: Quality,
    pub format: ExportFormat,
}

impl Quality {
    pub fn preset(self) -> QualityPreset {
        match self {
            Quality::Low => QualityPreset {
                width: 854,
                height: 480,
                video_bitrate_kbps: 1000,
                fps: 24,
            },
            Quality::Optimised => QualityPreset {
                width: 1280,
                height: 720,
                video_bitrate_kbps: 2500,
                fps: 30,
            },
            Quality::High => QualityPreset {
                width: 1920,
                height: 1080,
                video_bitrate_kbps: 5000,
                fps: 30,
            },
        }
    }
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "mp4",
            ExportFormat::Mov => "mov",
            ExportFormat::Avi => "avi",
        }
    }

    /// Video codec the render engine is expected to use for this container.
    pub fn codec_hint(self) -> &'static str {
        match self {
            ExportFormat::Mp4 | ExportFormat::Mov => "libx264",
            ExportFormat::Avi => "mpeg4",
        }
    }
}

impl ExportSettings {
    pub fn new(aspect_ratio: AspectRatio, quality: Quality, format: ExportFormat) -> Self {
        Self {
            aspect_ratio,
            quality,
            format,
        }
    }

    /// Output frame size in pixels for this aspect ratio and quality.
    pub fn output_dimensions(&self) -> (u32, u32) {
        let preset = self.quality.preset();
        match self.aspect_ratio {
            AspectRatio::Landscape => (preset.width, preset.height),
            AspectRatio::Portrait => (preset.height, preset.width),
            AspectRatio::Square => {
                let side = preset.width.min(preset.height);
                (side, side)
            }
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        })
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quality::Low => "low",
            Quality::Optimised => "optimised",
            Quality::High => "high",
        })
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl fmt::Display for ExportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.aspect_ratio, self.quality, self.format)
    }
}

/// Error for unrecognised export setting names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseSettingError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for AspectRatio {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1:1" => Ok(AspectRatio::Square),
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            _ => Err(ParseSettingError {
                kind: "aspect ratio",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Quality {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "optimised" | "optimized" => Ok(Quality::Optimised),
            "high" => Ok(Quality::High),
            _ => Err(ParseSettingError {
                kind: "quality",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Ok(ExportFormat::Mp4),
            "mov" => Ok(ExportFormat::Mov),
            "avi" => Ok(ExportFormat::Avi),
            _ => Err(ParseSettingError {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Parses `aspect/quality/format`, e.g. `9:16/high/mov`.
impl FromStr for ExportSettings {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [aspect, quality, format] => Ok(Self {
                aspect_ratio: aspect.parse()?,
                quality: quality.parse()?,
                format: format.parse()?,
            }),
            _ => Err(ParseSettingError {
                kind: "export preset (expected aspect/quality/format)",
                value: s.to_string(),
            }),
        }
    }
}
