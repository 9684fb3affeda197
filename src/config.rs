//! Configuration for form filling.
//!
//! Every knob has a default that reproduces the stock behaviour, so
//! `FillConfig::default()` is what most callers want. The struct can also be
//! loaded from a JSON file; absent keys keep their defaults.

use crate::correlate::Correlator;
use crate::error::Result;
use crate::overlay::OverlayConfig;
use crate::resolve::Resolver;
use crate::writer::AssemblyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Minimum similarity ratio for an answer key to be accepted.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Tokens shorter than this (in characters) never anchor a field.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// Overlay text size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 30.0;

/// Preferred overlay font, relative to the working directory.
pub const DEFAULT_FONT_PATH: &str = "./arial.ttf";

/// Output resolution used to size PDF pages from pixel dimensions.
pub const DEFAULT_RESOLUTION: f32 = 100.0;

/// JPEG quality for page images embedded in the output.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Fonts tried, in order, when the preferred font cannot be loaded.
pub const DEFAULT_FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Form filling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Minimum similarity ratio (0.0-1.0) between a field label and an answer key.
    pub similarity_threshold: f64,

    /// Minimum token length in characters for a token to anchor a field.
    pub min_token_len: usize,

    /// Overlay text size in pixels.
    pub font_size: f32,

    /// Preferred TrueType/OpenType font for overlay text.
    pub font_path: PathBuf,

    /// Fonts tried in order when the preferred font is unavailable.
    pub fallback_font_paths: Vec<PathBuf>,

    /// Overlay text colour as RGBA.
    pub text_color: [u8; 4],

    /// Output resolution in dots per inch.
    pub resolution: f32,

    /// JPEG quality (1-100) for embedded page images.
    pub jpeg_quality: u8,

    /// Optional title written to the output document's Info dictionary.
    pub title: Option<String>,

    /// Creator application written to the output document's Info dictionary.
    pub creator: Option<String>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FillConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            font_size: DEFAULT_FONT_SIZE,
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            fallback_font_paths: DEFAULT_FALLBACK_FONTS.iter().map(PathBuf::from).collect(),
            text_color: [0, 0, 0, 255],
            resolution: DEFAULT_RESOLUTION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            title: None,
            creator: Some(format!("{} {}", crate::NAME, crate::VERSION)),
        }
    }

    /// Load configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Set the answer similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the minimum anchoring token length.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Set the overlay font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the preferred overlay font.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    /// Replace the fallback font list.
    pub fn with_fallback_fonts(mut self, paths: Vec<PathBuf>) -> Self {
        self.fallback_font_paths = paths;
        self
    }

    /// Set the output resolution.
    pub fn with_resolution(mut self, dpi: f32) -> Self {
        self.resolution = dpi;
        self
    }

    /// Set the JPEG quality for embedded pages.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Set the output document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Correlator configured from this config.
    pub fn correlator(&self) -> Correlator {
        Correlator::new().with_min_token_len(self.min_token_len)
    }

    /// Resolver configured from this config.
    pub fn resolver(&self) -> Resolver {
        Resolver::with_threshold(self.similarity_threshold)
    }

    /// Overlay settings derived from this config.
    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            font_size: self.font_size,
            font_path: self.font_path.clone(),
            fallback_font_paths: self.fallback_font_paths.clone(),
            text_color: self.text_color,
        }
    }

    /// Assembly settings derived from this config.
    pub fn assembly_config(&self) -> AssemblyConfig {
        AssemblyConfig {
            resolution: self.resolution,
            jpeg_quality: self.jpeg_quality,
            title: self.title.clone(),
            creator: self.creator.clone(),
            compress: true,
        }
    }
}
