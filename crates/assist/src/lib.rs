//! AI legal assistant.
//!
//! Answers a question, optionally about a document the user uploaded or
//! generated. The document reference is resolved to a remote URL or a file
//! inside the storage roots ([`source`]), its text is extracted (or, for
//! pictures, it is attached as an image), and the question goes to an
//! OpenAI-compatible chat completions endpoint ([`client`]) with a fixed
//! Spanish legal-assistant system prompt ([`prompt`]).

pub mod assistant;
pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod source;

pub use assistant::{Answer, Assistant};
pub use client::CompletionClient;
pub use config::AssistConfig;
pub use error::AssistError;
pub use source::{DocumentSource, StorageRoots};
