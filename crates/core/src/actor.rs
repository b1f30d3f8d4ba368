//! Actor classes that can hold a session.
//!
//! Mediators and institutions are separate identity spaces with their own
//! tables; the admin is a single operator identified by a shared secret.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ACTOR_MEDIADOR: &str = "mediador";
pub const ACTOR_INSTITUCION: &str = "institucion";
pub const ACTOR_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Mediador,
    Institucion,
    Admin,
}

impl ActorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActorKind::Mediador => ACTOR_MEDIADOR,
            ActorKind::Institucion => ACTOR_INSTITUCION,
            ActorKind::Admin => ACTOR_ADMIN,
        }
    }

    /// Whether this actor class owns cases and agenda events.
    pub fn owns_cases(self) -> bool {
        matches!(self, ActorKind::Mediador | ActorKind::Institucion)
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ACTOR_MEDIADOR => Ok(ActorKind::Mediador),
            ACTOR_INSTITUCION | "institución" => Ok(ActorKind::Institucion),
            ACTOR_ADMIN => Ok(ActorKind::Admin),
            other => Err(format!("Unknown actor kind '{other}'")),
        }
    }
}

/// The owner of a case, agenda event, or acta: an actor class plus the
/// normalised email of the identity within that class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub kind: ActorKind,
    pub email: String,
}

impl Owner {
    pub fn new(kind: ActorKind, email: &str) -> Self {
        Self {
            kind,
            email: crate::email::normalize_email(email),
        }
    }

    /// Case-insensitive ownership check against a stored row.
    pub fn owns(&self, kind: &str, email: &str) -> bool {
        self.kind.as_str() == kind && self.email == crate::email::normalize_email(email)
    }
}
