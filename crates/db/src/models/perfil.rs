//! Mediator profile model, upsert DTO, and public directory rows.

use mediar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `perfiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Perfil {
    pub mediador_id: DbId,
    pub bio: Option<String>,
    pub especialidades: Vec<String>,
    pub provincia: Option<String>,
    pub localidad: Option<String>,
    pub modalidad: Option<String>,
    pub foto_url: Option<String>,
    pub sitio_web: Option<String>,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing the caller's profile. Omitted fields keep
/// their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertPerfil {
    pub bio: Option<String>,
    pub especialidades: Option<Vec<String>>,
    pub provincia: Option<String>,
    pub localidad: Option<String>,
    pub modalidad: Option<String>,
    pub foto_url: Option<String>,
    pub sitio_web: Option<String>,
}

/// An approved mediator joined with their profile, as listed publicly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DirectorioEntry {
    pub mediador_id: DbId,
    pub nombre: String,
    pub apellido: String,
    pub matricula: Option<String>,
    pub bio: Option<String>,
    pub especialidades: Vec<String>,
    pub provincia: Option<String>,
    pub localidad: Option<String>,
    pub modalidad: Option<String>,
    pub foto_url: Option<String>,
    pub sitio_web: Option<String>,
}

/// Directory filters (`?provincia=&especialidad=&q=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorioFilter {
    pub provincia: Option<String>,
    pub especialidad: Option<String>,
    /// Free-text match on name or bio.
    pub q: Option<String>,
}
