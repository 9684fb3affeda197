//! Error types for the form filling engine.
//!
//! Only a few conditions are fatal. Unmatched fields, labels that never show
//! up on a page and missing fonts are handled where they occur and never
//! surface here.

/// Result type alias for form filling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while filling a form.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller supplied input the engine cannot work with
    /// (e.g. no pages to assemble, a box without four vertices)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Font file could not be parsed
    #[error("Font error: {0}")]
    Font(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external collaborator (OCR, field discovery, rasterization) failed
    #[error("Upstream service failure: {0}")]
    Upstream(String),
}
