//! Plain-text extraction from user documents.

use std::path::Path;

use crate::error::DocumentError;
use crate::package::{DocxPackage, DOCUMENT_PART};
use crate::xml::paragraphs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A picture, sent to the model as-is rather than as text.
    Image { mime: &'static str },
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Classify by file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let kind = match extension.to_ascii_lowercase().as_str() {
            "png" => DocumentKind::Image { mime: "image/png" },
            "jpg" | "jpeg" => DocumentKind::Image { mime: "image/jpeg" },
            "gif" => DocumentKind::Image { mime: "image/gif" },
            "webp" => DocumentKind::Image { mime: "image/webp" },
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "txt" | "md" | "csv" | "json" => DocumentKind::Text,
            _ => return None,
        };
        Some(kind)
    }

    /// Classify by the extension of a path or URL path.
    pub fn from_path(path: &str) -> Result<Self, DocumentError> {
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| DocumentError::Unsupported(path.to_string()))
    }
}

/// Extract text from a non-image document.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, DocumentError> {
    match kind {
        DocumentKind::Pdf => pdf_text(bytes),
        DocumentKind::Docx => docx_text(bytes),
        DocumentKind::Text => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentKind::Image { mime } => Err(DocumentError::Unsupported(format!(
            "{mime} has no text layer"
        ))),
    }
}

/// Body paragraphs of a `.docx`, one per line.
pub fn docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let package = DocxPackage::from_bytes(bytes)?;
    Ok(paragraphs(package.xml_part(DOCUMENT_PART)?).join("\n"))
}

fn pdf_text(bytes: &[u8]) -> Result<String, DocumentError> {
    // The PDF parser panics on some malformed inputs.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DocumentError::Pdf(e.to_string())),
        Err(_) => Err(DocumentError::Pdf("malformed PDF".to_string())),
    }
}

/// Cut `text` to at most `max_chars` characters. Returns the kept prefix and
/// whether anything was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
