//! OCR token input.
//!
//! Text detection itself happens outside this crate. A detector returns the
//! raw annotation list for one page image; by convention its first entry is
//! the whole-page text block and every following entry is a single word.
//! [`words_from_annotations`] drops that first entry and turns the rest into
//! [`Token`]s for the correlator.
//!
//! The JSON shape understood here is the common
//! `{"description": ..., "boundingPoly": {"vertices": [{"x": .., "y": ..}]}}`
//! layout. Detection services omit coordinates that are zero, so missing
//! `x`/`y` default to 0.

use crate::error::{Error, Result};
use crate::geometry::{Point, Quad};
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// One OCR-recognized word with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Recognized text
    pub text: String,
    /// Bounding box in source vertex order
    pub bounds: Quad,
}

impl Token {
    /// Create a token.
    pub fn new(text: impl Into<String>, bounds: Quad) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// A polygon vertex in integer pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    /// X coordinate (omitted by the service when zero)
    #[serde(default)]
    pub x: i32,
    /// Y coordinate (omitted by the service when zero)
    #[serde(default)]
    pub y: i32,
}

/// Polygon enclosing a detected text entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingPoly {
    /// Vertices in detection order
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// A raw text-detection entry as returned by the OCR service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    /// Detected text
    pub description: String,
    /// Enclosing polygon
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

impl TextAnnotation {
    /// Convert to a [`Token`]. Fails unless the polygon has exactly four vertices.
    pub fn to_token(&self) -> Result<Token> {
        let points: Vec<Point> = self
            .bounding_poly
            .vertices
            .iter()
            .map(|v| Point::new(v.x as f32, v.y as f32))
            .collect();
        let bounds = Quad::from_slice(&points).ok_or_else(|| {
            Error::InvalidInput(format!(
                "text box for '{}' has {} vertices, expected 4",
                self.description,
                points.len()
            ))
        })?;
        Ok(Token::new(self.description.clone(), bounds))
    }
}

/// Accepts either a bare annotation array or a full detection response.
#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationDocument {
    List(Vec<TextAnnotation>),
    Response {
        #[serde(rename = "textAnnotations", default)]
        text_annotations: Vec<TextAnnotation>,
    },
}

/// Parse text annotations from JSON.
///
/// Accepts `[...]` or `{"textAnnotations": [...]}`.
pub fn annotations_from_json(json: &str) -> Result<Vec<TextAnnotation>> {
    let doc: AnnotationDocument = serde_json::from_str(json)?;
    Ok(match doc {
        AnnotationDocument::List(list) => list,
        AnnotationDocument::Response { text_annotations } => text_annotations,
    })
}

/// Drop the leading whole-page entry and convert the per-word entries to tokens.
///
/// Token order is the detector's order and is never re-sorted. A word whose
/// box is malformed is logged and left out; the rest of the page still fills.
pub fn words_from_annotations(annotations: &[TextAnnotation]) -> Vec<Token> {
    annotations
        .iter()
        .skip(1)
        .filter_map(|annotation| match annotation.to_token() {
            Ok(token) => Some(token),
            Err(e) => {
                log::warn!("Skipping OCR word: {}", e);
                None
            },
        })
        .collect()
}

/// Text detection collaborator.
///
/// Implementations wrap whatever OCR backend the caller uses. Failures should
/// be reported as [`Error::Upstream`]; the engine propagates them unchanged.
pub trait TextDetector {
    /// Detect text on one page, returning the raw annotation list
    /// (whole-page block first).
    fn detect(&self, page_index: usize, page: &DynamicImage) -> Result<Vec<TextAnnotation>>;
}
