//! Case model and DTOs.

use mediar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `casos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Caso {
    pub id: DbId,
    pub owner_kind: String,
    pub owner_email: String,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub partes: Option<String>,
    pub materia: Option<String>,
    pub estado: String,
    /// Set when the case is first closed; cleared when it is reopened.
    pub fecha_cierre: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a case. The owner comes from the session, never the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCaso {
    pub titulo: String,
    pub descripcion: Option<String>,
    pub partes: Option<String>,
    pub materia: Option<String>,
    /// Defaults to `abierto` if omitted.
    pub estado: Option<String>,
}

/// DTO for updating a case. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCaso {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub partes: Option<String>,
    pub materia: Option<String>,
    pub estado: Option<String>,
}

/// Query parameters for listing cases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasoFilter {
    pub estado: Option<String>,
}
