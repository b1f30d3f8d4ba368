//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the session behind a Bearer token.
//! - [`guard`] -- per-actor requirements ([`guard::RequireMediador`],
//!   [`guard::RequireInstitucion`], [`guard::RequireAccount`],
//!   [`guard::RequireAdmin`]) and the [`guard::ActorGuard`] trait that lets
//!   one handler serve several actor classes.

pub mod auth;
pub mod guard;
