//! Agenda event model and DTOs.

use mediar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `agenda_eventos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaEvento {
    pub id: DbId,
    pub owner_kind: String,
    pub owner_email: String,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub inicio: Timestamp,
    pub fin: Option<Timestamp>,
    pub ubicacion: Option<String>,
    pub caso_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an agenda event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgendaEvento {
    pub titulo: String,
    pub descripcion: Option<String>,
    pub inicio: Timestamp,
    pub fin: Option<Timestamp>,
    pub ubicacion: Option<String>,
    pub caso_id: Option<DbId>,
}

/// DTO for updating an agenda event. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgendaEvento {
    pub titulo: Option<String>,
    pub descripcion: Option<String>,
    pub inicio: Option<Timestamp>,
    pub fin: Option<Timestamp>,
    pub ubicacion: Option<String>,
    pub caso_id: Option<DbId>,
}

/// Optional `?desde=&hasta=` window on `inicio`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgendaRange {
    pub desde: Option<Timestamp>,
    pub hasta: Option<Timestamp>,
}
