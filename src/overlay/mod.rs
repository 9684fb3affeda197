//! Overlay rendering: burning resolved answers onto a page image.
//!
//! Resolutions are drawn in order with the text's top-left corner at the
//! anchor box's first vertex. A value identical to the previously written
//! one is skipped, which keeps repeated labels (a "Seller's Name" printed
//! twice in a row, say) from stacking the same text. An empty value updates
//! the last-written value but draws nothing.

mod font;

pub use font::OverlayFont;

use crate::config::{DEFAULT_FALLBACK_FONTS, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE};
use crate::geometry::{Point, Rect};
use crate::resolve::Resolution;
use image::{DynamicImage, GenericImageView, Rgba};
use std::path::PathBuf;

/// Overlay rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Text size in pixels
    pub font_size: f32,
    /// Preferred font file
    pub font_path: PathBuf,
    /// Fonts tried in order when the preferred one is unavailable
    pub fallback_font_paths: Vec<PathBuf>,
    /// Text colour as RGBA
    pub text_color: [u8; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            fallback_font_paths: DEFAULT_FALLBACK_FONTS.iter().map(PathBuf::from).collect(),
            text_color: [0, 0, 0, 255],
        }
    }
}

/// A piece of text placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Text drawn
    pub text: String,
    /// Top-left corner of the text
    pub origin: Point,
}

/// What the renderer did with a page's resolutions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayReport {
    /// Text actually drawn, in drawing order
    pub placements: Vec<Placement>,
    /// Resolutions skipped as repeats of the previous value
    pub duplicates: usize,
    /// Resolutions with an empty value
    pub blanks: usize,
}

/// Decide which resolutions get drawn and where.
///
/// Pure function of the input order; the renderer draws exactly what this
/// returns.
pub fn plan_placements(resolutions: &[Resolution]) -> OverlayReport {
    let mut report = OverlayReport::default();
    let mut last_written = "";

    for resolution in resolutions {
        if resolution.value == last_written {
            if resolution.value.is_empty() {
                report.blanks += 1;
            } else {
                report.duplicates += 1;
            }
            continue;
        }
        last_written = resolution.value.as_str();
        if resolution.value.is_empty() {
            report.blanks += 1;
            continue;
        }
        report.placements.push(Placement {
            text: resolution.value.clone(),
            origin: resolution.anchor.top_left(),
        });
    }

    report
}

/// Draws resolved answers onto page images.
#[derive(Debug)]
pub struct OverlayRenderer {
    font: OverlayFont,
    font_size: f32,
    color: Rgba<u8>,
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(&OverlayConfig::default())
    }
}

impl OverlayRenderer {
    /// Create a renderer, loading the font once. Font problems are logged
    /// and recovered by falling back.
    pub fn new(config: &OverlayConfig) -> Self {
        let font = OverlayFont::load(&config.font_path, &config.fallback_font_paths);
        Self::with_font(font, config.font_size, Rgba(config.text_color))
    }

    /// Create a renderer with an already-chosen face.
    pub fn with_font(font: OverlayFont, font_size: f32, color: Rgba<u8>) -> Self {
        Self {
            font,
            font_size,
            color,
        }
    }

    /// The face in use.
    pub fn font(&self) -> &OverlayFont {
        &self.font
    }

    /// Draw the page's resolutions and hand the page back.
    pub fn render(
        &self,
        mut page: DynamicImage,
        resolutions: &[Resolution],
    ) -> (DynamicImage, OverlayReport) {
        let report = plan_placements(resolutions);
        let (width, height) = page.dimensions();
        let bounds = Rect::new(0.0, 0.0, width as f32, height as f32);

        for placement in &report.placements {
            if !bounds.contains_point(&placement.origin) {
                log::debug!(
                    "Anchor ({}, {}) for '{}' lies outside the {}x{} page, text will be clipped",
                    placement.origin.x,
                    placement.origin.y,
                    placement.text,
                    width,
                    height
                );
            }
            self.font.draw(
                &mut page,
                &placement.text,
                placement.origin.x.round() as i32,
                placement.origin.y.round() as i32,
                self.font_size,
                self.color,
            );
        }

        log::debug!(
            "Overlay drew {} values ({} repeats, {} blanks) with font {}",
            report.placements.len(),
            report.duplicates,
            report.blanks,
            self.font.name()
        );
        (page, report)
    }
}
