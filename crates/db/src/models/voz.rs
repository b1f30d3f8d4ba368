//! Published article ("voz") model and DTOs.

use mediar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `voces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Voz {
    pub id: DbId,
    pub slug: String,
    pub titulo: String,
    pub resumen: Option<String>,
    pub contenido: String,
    pub autor_email: String,
    pub autor_nombre: String,
    pub publicado: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for publishing a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVoz {
    pub titulo: String,
    pub resumen: Option<String>,
    pub contenido: String,
    /// Defaults to `true`.
    pub publicado: Option<bool>,
}

/// Insert DTO: the request plus the generated slug and the author from the session.
#[derive(Debug, Clone)]
pub struct NewVoz {
    pub slug: String,
    pub titulo: String,
    pub resumen: Option<String>,
    pub contenido: String,
    pub autor_email: String,
    pub autor_nombre: String,
    pub publicado: bool,
}

/// DTO for editing a post. The slug never changes once published.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVoz {
    pub titulo: Option<String>,
    pub resumen: Option<String>,
    pub contenido: Option<String>,
    pub publicado: Option<bool>,
}
