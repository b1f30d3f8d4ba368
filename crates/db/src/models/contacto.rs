//! Contact-form submission model.

use mediar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `contactos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contacto {
    pub id: DbId,
    pub nombre: String,
    pub email: String,
    pub mensaje: String,
    pub categoria: String,
    pub confianza: f64,
    pub auto_reply_sent: bool,
    pub created_at: Timestamp,
}

/// Insert DTO, built after classification.
#[derive(Debug, Clone)]
pub struct CreateContacto {
    pub nombre: String,
    pub email: String,
    pub mensaje: String,
    pub categoria: String,
    pub confianza: f64,
}
