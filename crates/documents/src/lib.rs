//! Word-processing documents for Mediar.
//!
//! A `.docx` file is a zip package of XML parts. This crate reads and writes
//! those packages ([`package`]), builds simple documents paragraph by
//! paragraph ([`builder`]), fills bracketed placeholders ([`template`]),
//! embeds a header picture ([`header_image`]), produces mediation actas
//! ([`acta`]), and extracts plain text from docx/pdf/text files
//! ([`extract`]).

pub mod acta;
pub mod builder;
pub mod error;
pub mod extract;
pub mod header_image;
pub mod package;
pub mod template;
mod xml;

pub use acta::{ActaGenerator, ActaRequest, GeneratedActa};
pub use builder::DocumentBuilder;
pub use error::DocumentError;
pub use extract::{extract_text, truncate_chars, DocumentKind};
pub use package::DocxPackage;
