//! Page images as PDF Image XObjects.
//!
//! Every page is normalized to 8-bit DeviceRGB and embedded as a JPEG
//! (DCTDecode filter), whatever colour model it arrived in.

use super::object::Object;
use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::collections::HashMap;

/// An encoded page image ready for embedding.
#[derive(Debug, Clone)]
pub struct PageImageData {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// JPEG-encoded RGB data
    pub data: Vec<u8>,
}

impl PageImageData {
    /// Convert a page to RGB and JPEG-encode it.
    pub fn encode(page: &DynamicImage, quality: u8) -> Result<Self> {
        let rgb = page.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "page image has zero size ({}x{})",
                width, height
            )));
        }

        let mut data = Vec::new();
        JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100))
            .encode_image(&rgb)
            .map_err(|e| Error::Image(e.to_string()))?;

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Page size in points for the given resolution (72 points per inch).
    pub fn size_in_points(&self, dpi: f32) -> (f32, f32) {
        let scale = 72.0 / dpi;
        (self.width as f32 * scale, self.height as f32 * scale)
    }

    /// Build the Image XObject stream dictionary.
    pub fn build_xobject_dict(&self) -> HashMap<String, Object> {
        ObjectSerializer::dict_map(vec![
            ("Type", ObjectSerializer::name("XObject")),
            ("Subtype", ObjectSerializer::name("Image")),
            ("Width", ObjectSerializer::integer(self.width as i64)),
            ("Height", ObjectSerializer::integer(self.height as i64)),
            ("ColorSpace", ObjectSerializer::name("DeviceRGB")),
            ("BitsPerComponent", ObjectSerializer::integer(8)),
            ("Filter", ObjectSerializer::name("DCTDecode")),
            ("Length", ObjectSerializer::integer(self.data.len() as i64)),
        ])
    }
}
