#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid docx package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Missing package part: {0}")]
    MissingPart(String),

    #[error("Package part is not UTF-8: {0}")]
    Encoding(String),

    #[error("Unsupported image: {0}")]
    Image(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("Unsupported document type: {0}")]
    Unsupported(String),
}
