//! Institution note model and DTOs.

use mediar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Nota {
    pub id: DbId,
    pub owner_email: String,
    pub titulo: String,
    pub contenido: String,
    pub caso_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNota {
    pub titulo: String,
    #[serde(default)]
    pub contenido: String,
    pub caso_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNota {
    pub titulo: Option<String>,
    pub contenido: Option<String>,
    pub caso_id: Option<DbId>,
}
