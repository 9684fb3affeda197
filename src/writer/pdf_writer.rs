//! PDF document writer for image-only documents.
//!
//! Assembles a complete PDF with header, body, xref table and trailer. Each
//! page carries exactly one full-bleed image.

use super::image_handler::PageImageData;
use super::object::{Object, ObjectRef};
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use std::io::Write;

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.7")
    pub version: String,
    /// Document title
    pub title: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Whether to compress page content streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            creator: Some(crate::NAME.to_string()),
            compress: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Compress data using Flate/Deflate compression.
fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Internal page data.
struct PageData {
    width: f32,
    height: f32,
    image: PageImageData,
}

/// Writer producing one page per image.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    next_obj_id: u32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            next_obj_id: 1,
        }
    }

    fn alloc_obj_id(&mut self) -> u32 {
        let id = self.next_obj_id;
        self.next_obj_id += 1;
        id
    }

    /// Append a page of `width` x `height` points showing `image` full-bleed.
    pub fn add_image_page(&mut self, image: PageImageData, width: f32, height: f32) -> &mut Self {
        self.pages.push(PageData {
            width,
            height,
            image,
        });
        self
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Build the complete PDF document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let serializer = ObjectSerializer::compact();
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let catalog_id = self.alloc_obj_id();
        let pages_id = self.alloc_obj_id();

        // Page, content stream and image object per page
        let mut page_ids: Vec<(u32, u32, u32)> = Vec::with_capacity(self.pages.len());
        for _ in 0..self.pages.len() {
            let page_id = self.alloc_obj_id();
            let content_id = self.alloc_obj_id();
            let image_id = self.alloc_obj_id();
            page_ids.push((page_id, content_id, image_id));
        }
        let info_id = self.alloc_obj_id();

        let page_refs: Vec<Object> = page_ids
            .iter()
            .map(|(page_id, _, _)| Object::Reference(ObjectRef::new(*page_id, 0)))
            .collect();

        let catalog_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Pages", ObjectSerializer::reference(pages_id, 0)),
        ]);
        let pages_obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            ("Kids", Object::Array(page_refs)),
            ("Count", ObjectSerializer::integer(self.pages.len() as i64)),
        ]);

        xref_offsets.push((catalog_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(catalog_id, 0, &catalog_obj)?);
        xref_offsets.push((pages_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(pages_id, 0, &pages_obj)?);

        for (page_data, (page_id, content_id, image_id)) in self.pages.iter().zip(&page_ids) {
            // Scale the unit image square to the page
            let raw_content = format!(
                "q\n{} 0 0 {} 0 0 cm\n/Im0 Do\nQ\n",
                format_coord(page_data.width),
                format_coord(page_data.height)
            )
            .into_bytes();

            let mut content_dict = ObjectSerializer::dict_map(Vec::new());
            let content_bytes = if self.config.compress {
                match compress_data(&raw_content) {
                    Ok(compressed) => {
                        content_dict
                            .insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));
                        compressed
                    },
                    Err(e) => {
                        log::warn!("Content stream compression failed, writing uncompressed: {}", e);
                        raw_content
                    },
                }
            } else {
                raw_content
            };

            let page_obj = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(pages_id, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(0.0, 0.0, page_data.width as f64, page_data.height as f64),
                ),
                ("Contents", ObjectSerializer::reference(*content_id, 0)),
                (
                    "Resources",
                    ObjectSerializer::dict(vec![(
                        "XObject",
                        ObjectSerializer::dict(vec![(
                            "Im0",
                            ObjectSerializer::reference(*image_id, 0),
                        )]),
                    )]),
                ),
            ]);
            let content_obj = Object::Stream {
                dict: content_dict,
                data: bytes::Bytes::from(content_bytes),
            };
            let image_obj = Object::Stream {
                dict: page_data.image.build_xobject_dict(),
                data: bytes::Bytes::copy_from_slice(&page_data.image.data),
            };

            for (id, obj) in [(*page_id, page_obj), (*content_id, content_obj), (*image_id, image_obj)] {
                xref_offsets.push((id, output.len()));
                output.extend_from_slice(&serializer.serialize_indirect(id, 0, &obj)?);
            }
        }

        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", ObjectSerializer::string(title)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", ObjectSerializer::string(creator)));
            info_entries.push(("Producer", ObjectSerializer::string(creator)));
        }
        let info_obj = ObjectSerializer::dict(info_entries);
        xref_offsets.push((info_id, output.len()));
        output.extend_from_slice(&serializer.serialize_indirect(info_id, 0, &info_obj)?);

        // Cross-reference table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", self.next_obj_id)?;
        // Object 0 is always free
        writeln!(output, "0000000000 65535 f ")?;
        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(self.next_obj_id as i64)),
            ("Root", ObjectSerializer::reference(catalog_id, 0)),
            ("Info", ObjectSerializer::reference(info_id, 0)),
        ]);
        writeln!(output, "trailer")?;
        output.extend_from_slice(&serializer.serialize(&trailer)?);
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }
}

/// Format a coordinate with at most two decimals, trailing zeros trimmed.
fn format_coord(value: f32) -> String {
    let formatted = format!("{:.2}", value);
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}
