//! # PDF Formfill
//!
//! Fills image-only (non-fillable) PDF forms: scanned pages with no
//! machine-readable fields.
//!
//! ## Flow
//!
//! 1. **Field discovery**: a vision-language model lists the field labels
//!    printed on the pages
//! 2. **Box correlation**: each label is bound to the OCR box of its first word
//! 3. **Answer resolution**: each label is fuzzy-matched against the caller's
//!    answer keys (LCS similarity, threshold 0.7, first key wins)
//! 4. **Overlay**: resolved answers are drawn at the label boxes, skipping
//!    consecutive repeats
//! 5. **Assembly**: filled pages become one RGB PDF, one page per image
//!
//! OCR, page rasterization and the vision model live outside the crate and
//! plug in through [`ocr::TextDetector`] and [`discovery::FieldNameSource`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_formfill::{AnswerSet, FillConfig, FormFiller};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let answers = AnswerSet::from_json_file("answers.json")?;
//! let filler = FormFiller::with_config(FillConfig::default());
//! let report = filler.fill_document(pages, &detector, &vision, &answers, "filled.pdf")?;
//! println!("{} values drawn", report.total_drawn());
//! # Ok(())
//! # }
//! ```
//!
//! The stages are also usable on their own:
//!
//! ```ignore
//! use pdf_formfill::correlate::correlate;
//! use pdf_formfill::resolve::resolve;
//!
//! let correlations = correlate(&tokens, &fields);
//! let resolutions: Vec<_> = correlations.iter().map(|c| resolve(c, &answers)).collect();
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Page geometry
pub mod geometry;

// Collaborator boundaries
pub mod discovery;
pub mod ocr;

// Core engine
pub mod correlate;
pub mod overlay;
pub mod resolve;

// PDF writing
pub mod writer;

// End-to-end orchestration
pub mod pipeline;

// Re-exports
pub use config::FillConfig;
pub use correlate::{Correlation, Correlator};
pub use discovery::{FieldLabel, FieldNameSource};
pub use error::{Error, Result};
pub use ocr::{TextDetector, Token};
pub use overlay::{OverlayRenderer, OverlayReport};
pub use pipeline::{FillReport, FormFiller, PageReport};
pub use resolve::{AnswerSet, Resolution, Resolver};
pub use writer::{assemble_pdf, write_pdf, AssemblyConfig};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        // VERSION is populated from CARGO_PKG_VERSION at compile time
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_formfill");
    }
}
