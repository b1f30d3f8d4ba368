//! Domain building blocks shared by every Mediar crate.
//!
//! Nothing in here performs I/O: database access lives in `mediar-db`,
//! outbound integrations in their own crates.

pub mod actor;
pub mod contact;
pub mod email;
pub mod error;
pub mod news;
pub mod paging;
pub mod slug;
pub mod status;
pub mod types;
