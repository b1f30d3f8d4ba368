use mediar_documents::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// The document reference points outside the allowed locations.
    #[error("Invalid document reference: {0}")]
    InvalidReference(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Unreadable document: {0}")]
    Document(#[from] DocumentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fetching a remote document or calling the model failed in transit.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A remote document host answered with a non-2xx status.
    #[error("Document fetch returned HTTP {0}")]
    FetchStatus(u16),

    /// The completion API answered with a non-2xx status or no content.
    #[error("Completion API error ({status}): {body}")]
    Upstream { status: u16, body: String },
}
