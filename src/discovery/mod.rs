//! Field discovery.
//!
//! Field names are enumerated by an external vision-language model looking
//! at the page images. This module builds the request body sent to that
//! model and splits its plain-text reply into [`FieldLabel`]s. The reply is
//! split on the literal `", "` and nothing else: a bulleted or
//! newline-separated reply degrades into one oversized label rather than an
//! error.

use crate::error::{Error, Result};
use base64::Engine as _;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction sent alongside the page images.
pub const FIELD_DISCOVERY_INSTRUCTION: &str = "List all of the form field names as written on the document. Output it in a comma separated list. Don't bullet or enumerate.";

/// Separator between field names in the model reply.
pub const FIELD_LIST_SEPARATOR: &str = ", ";

/// JPEG quality used when encoding pages for the discovery request.
const DISCOVERY_JPEG_QUALITY: u8 = 75;

/// A form field label as printed on the page (e.g. "Selling Price").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldLabel(String);

impl FieldLabel {
    /// Create a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of whitespace-separated words in the label.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl From<&str> for FieldLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a discovery reply into labels, preserving reply order.
///
/// # Examples
///
/// ```
/// use pdf_formfill::discovery::parse_field_list;
///
/// let fields = parse_field_list("Make, Year Model, Buyer's Name");
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields[1].as_str(), "Year Model");
/// ```
pub fn parse_field_list(response: &str) -> Vec<FieldLabel> {
    response.split(FIELD_LIST_SEPARATOR).map(FieldLabel::from).collect()
}

/// One part of a multimodal chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text instruction
    Text {
        /// Instruction text
        text: String,
    },
    /// Inline image as a data URI
    ImageUrl {
        /// Image reference
        image_url: ImageUrl,
    },
}

/// Image reference inside a [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    /// `data:image/jpeg;base64,...` URI
    pub url: String,
}

/// Request body for the field discovery model: the instruction followed by
/// one image part per page, in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryRequest {
    /// Message role
    pub role: &'static str,
    /// Message parts
    pub content: Vec<ContentPart>,
}

impl DiscoveryRequest {
    /// Build a request for the given pages using the standard instruction.
    pub fn for_pages(pages: &[DynamicImage]) -> Result<Self> {
        let mut content = Vec::with_capacity(pages.len() + 1);
        content.push(ContentPart::Text {
            text: FIELD_DISCOVERY_INSTRUCTION.to_string(),
        });
        for page in pages {
            content.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/jpeg;base64,{}", encode_page(page)?),
                },
            });
        }
        Ok(Self {
            role: "user",
            content,
        })
    }

    /// Number of page images attached.
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .filter(|part| matches!(part, ContentPart::ImageUrl { .. }))
            .count()
    }

    /// Serialize the request body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Encode a page as base64 JPEG. JPEG has no alpha, so pages go through RGB.
pub fn encode_page(page: &DynamicImage) -> Result<String> {
    let rgb = page.to_rgb8();
    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, DISCOVERY_JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| Error::Image(e.to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(jpeg))
}

/// Field discovery collaborator.
///
/// Implementations send the request to a vision-language model and return
/// its raw text reply.
pub trait FieldNameSource {
    /// Ask for the field names visible in the request's page images.
    fn list_fields(&self, request: &DiscoveryRequest) -> Result<String>;
}

/// Discover the document's fields: build the request, call the source, split
/// the reply.
pub fn discover_fields(
    pages: &[DynamicImage],
    source: &dyn FieldNameSource,
) -> Result<Vec<FieldLabel>> {
    let request = DiscoveryRequest::for_pages(pages)?;
    let reply = source.list_fields(&request)?;
    let fields = parse_field_list(&reply);
    log::info!("Discovered {} field labels across {} pages", fields.len(), pages.len());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    struct CannedReply(&'static str);

    impl FieldNameSource for CannedReply {
        fn list_fields(&self, request: &DiscoveryRequest) -> Result<String> {
            assert_eq!(request.image_count(), 2);
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    impl FieldNameSource for Offline {
        fn list_fields(&self, _request: &DiscoveryRequest) -> Result<String> {
            Err(Error::Upstream("model unavailable".to_string()))
        }
    }

    fn blank_page() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])))
    }

    #[test]
    fn test_parse_preserves_order() {
        let fields = parse_field_list("Identification Number, Year Model, Make");
        let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["Identification Number", "Year Model", "Make"]);
    }

    #[test]
    fn test_parse_bulleted_reply_is_not_split() {
        let fields = parse_field_list("- Make\n- Year Model");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].as_str(), "- Make\n- Year Model");
    }

    #[test]
    fn test_parse_comma_without_space_is_not_split() {
        let fields = parse_field_list("Make,Model");
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(FieldLabel::from("Selling Price").word_count(), 2);
        assert_eq!(FieldLabel::from("DL, ID, or Dealer #").word_count(), 5);
        assert_eq!(FieldLabel::from("Make").word_count(), 1);
        assert_eq!(FieldLabel::from("").word_count(), 0);
    }

    #[test]
    fn test_request_layout() {
        let request = DiscoveryRequest::for_pages(&[blank_page()]).unwrap();
        assert_eq!(request.content.len(), 2);
        assert_eq!(
            request.content[0],
            ContentPart::Text {
                text: FIELD_DISCOVERY_INSTRUCTION.to_string()
            }
        );
        match &request.content[1] {
            ContentPart::ImageUrl { image_url } => {
                assert!(image_url.url.starts_with("data:image/jpeg;base64,/9j/"));
            },
            other => panic!("expected image part, got {:?}", other),
        }
    }

    #[test]
    fn test_request_json_shape() {
        let request = DiscoveryRequest::for_pages(&[blank_page()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][1]["type"], "image_url");
        assert!(value["content"][1]["image_url"]["url"].is_string());
    }

    #[test]
    fn test_discover_fields() {
        let pages = vec![blank_page(), blank_page()];
        let fields = discover_fields(&pages, &CannedReply("Make, Buyer's Name")).unwrap();
        assert_eq!(fields, vec![FieldLabel::from("Make"), FieldLabel::from("Buyer's Name")]);
    }

    #[test]
    fn test_discover_fields_propagates_upstream_failure() {
        let err = discover_fields(&[blank_page()], &Offline).unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }
}
