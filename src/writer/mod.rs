//! PDF writing for image-only documents.
//!
//! ## Architecture
//!
//! ```text
//! DynamicImage[]
//!     ↓
//! [assemble_pdf] (validation, page sizing)
//!     ↓
//! [PageImageData] (RGB normalization, JPEG encoding)
//!     ↓
//! [PdfWriter] (assembles complete PDF structure)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ```ignore
//! use pdf_formfill::writer::{write_pdf, AssemblyConfig};
//!
//! write_pdf(&pages, "filled.pdf", &AssemblyConfig::default())?;
//! ```

mod assembler;
mod image_handler;
mod object;
mod object_serializer;
mod pdf_writer;

pub use assembler::{assemble_pdf, write_pdf, AssemblyConfig};
pub use image_handler::PageImageData;
pub use object::{Object, ObjectRef};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
