use mediar_notify::EmailError;

#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] async_native_tls::Error),

    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    #[error("Reply delivery failed: {0}")]
    Email(#[from] EmailError),
}
