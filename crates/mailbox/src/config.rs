use std::time::Duration;

use mediar_notify::EmailConfig;

/// Settings for the IMAP side of the responder plus the SMTP settings used
/// to answer.
#[derive(Debug, Clone)]
pub struct MailboxConfig {
    pub imap_host: String,
    pub imap_port: u16,
    pub imap_user: String,
    pub imap_password: String,
    /// Folder to watch (default: `INBOX`).
    pub mailbox: String,
    pub poll_interval: Duration,
    /// Failed sends before a message is flagged without a reply.
    pub max_send_attempts: u32,
    pub email: EmailConfig,
}

impl MailboxConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default      |
    /// |-----------------------------|--------------|
    /// | `IMAP_HOST`                 | **required** |
    /// | `IMAP_PORT`                 | `993`        |
    /// | `IMAP_USER`                 | **required** |
    /// | `IMAP_PASSWORD`             | **required** |
    /// | `IMAP_MAILBOX`              | `INBOX`      |
    /// | `MAILBOX_POLL_SECS`         | `60`         |
    /// | `MAILBOX_MAX_SEND_ATTEMPTS` | `5`          |
    ///
    /// SMTP settings come from [`EmailConfig::from_env`] and are required.
    ///
    /// # Panics
    ///
    /// Panics when a required variable is missing or a number does not parse.
    pub fn from_env() -> Self {
        let required = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| panic!("{var} must be set in the environment"))
        };

        let imap_port: u16 = std::env::var("IMAP_PORT")
            .unwrap_or_else(|_| "993".into())
            .parse()
            .expect("IMAP_PORT must be a valid u16");

        let poll_secs: u64 = std::env::var("MAILBOX_POLL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("MAILBOX_POLL_SECS must be a valid u64");
        assert!(poll_secs > 0, "MAILBOX_POLL_SECS must be positive");

        let max_send_attempts: u32 = std::env::var("MAILBOX_MAX_SEND_ATTEMPTS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("MAILBOX_MAX_SEND_ATTEMPTS must be a valid u32");
        assert!(max_send_attempts > 0, "MAILBOX_MAX_SEND_ATTEMPTS must be positive");

        Self {
            imap_host: required("IMAP_HOST"),
            imap_port,
            imap_user: required("IMAP_USER"),
            imap_password: required("IMAP_PASSWORD"),
            mailbox: std::env::var("IMAP_MAILBOX").unwrap_or_else(|_| "INBOX".into()),
            poll_interval: Duration::from_secs(poll_secs),
            max_send_attempts,
            email: EmailConfig::from_env()
                .expect("SMTP_HOST must be set: the responder answers over SMTP"),
        }
    }
}
