//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session token issue and validation.
//! - [`admin`] -- shared-secret comparison for the admin header.

pub mod admin;
pub mod jwt;
pub mod password;
