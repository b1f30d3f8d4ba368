//! Mailbox auto-responder.
//!
//! Polls an IMAP inbox for unseen messages, classifies each one with the
//! contact keyword classifier, and answers with the matching auto-reply
//! template over SMTP.
//!
//! Only one instance should run per mailbox; there is no lock between
//! instances, so two pollers would answer the same message twice.

pub mod config;
pub mod error;
pub mod ledger;
pub mod reply;
pub mod responder;

pub use config::MailboxConfig;
pub use error::MailboxError;
pub use ledger::{Disposition, ReplyLedger};
pub use reply::{plan_reply, InboundMessage, ReplyDecision, SkipReason};
pub use responder::{CycleReport, Responder};
