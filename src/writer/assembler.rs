//! Multi-page PDF assembly from rendered page images.

use super::image_handler::PageImageData;
use super::pdf_writer::{PdfWriter, PdfWriterConfig};
use crate::config::{DEFAULT_JPEG_QUALITY, DEFAULT_RESOLUTION};
use crate::error::{Error, Result};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for turning page images into a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    /// Pixels per inch used to size pages
    pub resolution: f32,
    /// JPEG quality for embedded pages (1-100)
    pub jpeg_quality: u8,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress page content streams
    pub compress: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            title: None,
            creator: Some(format!("{} {}", crate::NAME, crate::VERSION)),
            compress: true,
        }
    }
}

impl AssemblyConfig {
    fn writer_config(&self) -> PdfWriterConfig {
        PdfWriterConfig {
            title: self.title.clone(),
            creator: self.creator.clone(),
            compress: self.compress,
            ..PdfWriterConfig::default()
        }
    }
}

/// Assemble pages into PDF bytes, one page per image in input order.
///
/// Fails with [`Error::InvalidInput`] when `pages` is empty. Every page is
/// encoded before the document is built, so a bad page leaves nothing
/// half-written.
pub fn assemble_pdf(pages: &[DynamicImage], config: &AssemblyConfig) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(Error::InvalidInput("no pages to assemble".to_string()));
    }
    if !(config.resolution.is_finite() && config.resolution > 0.0) {
        return Err(Error::InvalidInput(format!(
            "resolution must be positive, got {}",
            config.resolution
        )));
    }

    let encoded = pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            PageImageData::encode(page, config.jpeg_quality).map_err(|e| match e {
                Error::InvalidInput(msg) => Error::InvalidInput(format!("page {}: {}", index, msg)),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut writer = PdfWriter::with_config(config.writer_config());
    for image in encoded {
        let (width, height) = image.size_in_points(config.resolution);
        writer.add_image_page(image, width, height);
    }
    let bytes = writer.finish()?;

    log::debug!("Assembled {} pages into {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}

/// Assemble pages and write the PDF to `path`.
///
/// The document is written to a sibling temporary file and renamed into
/// place; on failure no file exists at `path` unless one was there before.
pub fn write_pdf(pages: &[DynamicImage], path: impl AsRef<Path>, config: &AssemblyConfig) -> Result<()> {
    let path = path.as_ref();
    let bytes = assemble_pdf(pages, config)?;

    let partial = partial_path(path);
    if let Err(e) = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, path)) {
        let _ = fs::remove_file(&partial);
        return Err(e.into());
    }

    log::info!("Wrote {} pages to {}", pages.len(), path.display());
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
