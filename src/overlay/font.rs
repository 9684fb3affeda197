//! Overlay font selection with best-effort fallback.
//!
//! The preferred font is tried first, then each fallback path in order. If
//! no file loads, text is drawn with DejaVu Sans Mono compiled into the
//! crate, so the page is still filled with legible text. A missing font is
//! logged and never fails the page.

use crate::error::{Error, Result};
use ab_glyph::{FontRef, FontVec};
use image::{DynamicImage, Rgba};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect as PixelRect;
use std::fmt;
use std::path::{Path, PathBuf};

/// DejaVu Sans Mono (Bitstream Vera licence, see `assets/DejaVu-LICENSE.txt`).
const EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

/// Display name of the embedded face.
const EMBEDDED_FONT_NAME: &str = "DejaVu Sans Mono (embedded)";

/// The face used to draw overlay text.
pub enum OverlayFont {
    /// A TrueType/OpenType font loaded from disk
    Outline {
        /// Parsed font
        font: FontVec,
        /// File it was loaded from
        source: PathBuf,
    },
    /// The face compiled into the crate, used when no font file loads
    Embedded(FontRef<'static>),
    /// Filled blocks per character; only reached if the embedded face
    /// fails to parse
    Blocks,
}

impl fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayFont::Outline { source, .. } => {
                f.debug_struct("Outline").field("source", source).finish()
            },
            OverlayFont::Embedded(_) => f.write_str("Embedded"),
            OverlayFont::Blocks => f.write_str("Blocks"),
        }
    }
}

impl OverlayFont {
    /// Load the preferred font, falling back through `fallbacks` and finally
    /// to the embedded face.
    pub fn load(preferred: &Path, fallbacks: &[PathBuf]) -> Self {
        match load_font_file(preferred) {
            Ok(font) => {
                log::debug!("Loaded overlay font {}", preferred.display());
                return OverlayFont::Outline {
                    font,
                    source: preferred.to_path_buf(),
                };
            },
            Err(e) => log::warn!("Error loading font {}: {}", preferred.display(), e),
        }

        for path in fallbacks {
            if let Ok(font) = load_font_file(path) {
                log::info!("Using fallback overlay font {}", path.display());
                return OverlayFont::Outline {
                    font,
                    source: path.clone(),
                };
            }
        }

        log::warn!("No overlay font file could be loaded, using {}", EMBEDDED_FONT_NAME);
        Self::embedded()
    }

    /// The face compiled into the crate.
    pub fn embedded() -> Self {
        match FontRef::try_from_slice(EMBEDDED_FONT) {
            Ok(font) => OverlayFont::Embedded(font),
            Err(e) => {
                log::error!("Embedded font is unreadable ({}), drawing block glyphs", e);
                OverlayFont::Blocks
            },
        }
    }

    /// Whether a face shipped with the crate is in use rather than a font file.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, OverlayFont::Outline { .. })
    }

    /// Human-readable face name for reports.
    pub fn name(&self) -> String {
        match self {
            OverlayFont::Outline { source, .. } => source.display().to_string(),
            OverlayFont::Embedded(_) => EMBEDDED_FONT_NAME.to_string(),
            OverlayFont::Blocks => "blocks".to_string(),
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels outside the
    /// image are clipped.
    pub(crate) fn draw(
        &self,
        image: &mut DynamicImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
    ) {
        match self {
            OverlayFont::Outline { font, .. } => {
                draw_text_mut(image, color, x, y, size, font, text);
            },
            OverlayFont::Embedded(font) => {
                draw_text_mut(image, color, x, y, size, font, text);
            },
            OverlayFont::Blocks => draw_block_glyphs(image, text, x, y, size, color),
        }
    }
}

fn load_font_file(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|e| Error::Font(e.to_string()))
}

/// Draw each character as a filled block sitting on a common baseline.
fn draw_block_glyphs(
    image: &mut DynamicImage,
    text: &str,
    x: i32,
    y: i32,
    size: f32,
    color: Rgba<u8>,
) {
    let advance = size * 0.6;
    let glyph_width = ((advance * 0.8).round() as u32).max(1);
    let height = ((size * 0.7).round() as u32).max(1);
    let top = (y as f32 + size * 0.8 - height as f32).round() as i32;
    let mut pen_x = x as f32;

    for ch in text.chars() {
        if !ch.is_whitespace() {
            let rect = PixelRect::at(pen_x.round() as i32, top).of_size(glyph_width, height);
            draw_filled_rect_mut(image, rect, color);
        }
        pen_x += advance;
    }
}
