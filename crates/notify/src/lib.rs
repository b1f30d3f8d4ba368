//! Outbound email for Mediar.
//!
//! - [`Mailer`] sends plain-text messages over SMTP (STARTTLS), one
//!   connection per message, no queue and no retry.
//! - [`templates`] renders the transactional messages (welcome, approval,
//!   subscription, contact auto-replies).
//!
//! Callers treat delivery failures as soft: they log the error and carry on.

pub mod email;
pub mod templates;

pub use email::{EmailConfig, EmailError, Mailer, OutgoingEmail};
pub use templates::EmailTemplate;
