//! Box correlation: binding field labels to OCR token boxes.
//!
//! The correlator walks a page's tokens once, in OCR order. A token anchors
//! the first field (in discovery order) whose label contains the token text,
//! provided the token is at least two characters long. After a match the
//! remaining words of that label are assumed to be the next tokens and are
//! skipped without being considered for matching.
//!
//! This is greedy and never backtracks. When OCR segmentation disagrees with
//! the label's word boundaries (merged words, a dropped word) the skip
//! counter swallows the wrong tokens and later fields on the line can be
//! missed. Callers that need better recall must fix the token stream before
//! it reaches the correlator.

use crate::config::DEFAULT_MIN_TOKEN_LEN;
use crate::discovery::FieldLabel;
use crate::geometry::Quad;
use crate::ocr::Token;

/// A field label bound to the box of its first recognized word.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    /// The matched field label
    pub field: FieldLabel,
    /// Box of the anchoring token
    pub anchor: Quad,
}

/// Single-pass label-to-token matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlator {
    min_token_len: usize,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new()
    }
}

impl Correlator {
    /// Create a correlator that ignores single-character tokens.
    pub fn new() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Set the minimum token length (in characters) that may anchor a field.
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Correlate one page's tokens against the document's field labels.
    ///
    /// Output order follows token order. A field may be anchored any number
    /// of times on a page, or not at all.
    pub fn correlate(&self, tokens: &[Token], fields: &[FieldLabel]) -> Vec<Correlation> {
        let mut correlations = Vec::new();
        let mut to_skip = 0usize;

        for token in tokens {
            if to_skip > 0 {
                to_skip -= 1;
                log::trace!("Skipping continuation token '{}'", token.text);
                continue;
            }
            if !self.can_anchor(&token.text) {
                continue;
            }
            if let Some(field) = fields.iter().find(|f| f.as_str().contains(token.text.as_str())) {
                log::debug!("Token '{}' anchors field '{}'", token.text, field);
                correlations.push(Correlation {
                    field: field.clone(),
                    anchor: token.bounds,
                });
                to_skip = field.word_count().saturating_sub(1);
            }
        }

        correlations
    }

    fn can_anchor(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().count() >= self.min_token_len
    }
}

/// Correlate with the default settings.
pub fn correlate(tokens: &[Token], fields: &[FieldLabel]) -> Vec<Correlation> {
    Correlator::new().correlate(tokens, fields)
}
