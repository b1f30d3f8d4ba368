//! Institution identity model and DTOs.

use mediar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `instituciones` table (includes the password hash).
#[derive(Debug, Clone, FromRow)]
pub struct Institucion {
    pub id: DbId,
    pub email: String,
    pub nombre: String,
    pub cuit: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub password_hash: String,
    pub subscription_status: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe institution representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct InstitucionResponse {
    pub id: DbId,
    pub email: String,
    pub nombre: String,
    pub cuit: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub subscription_status: String,
    pub created_at: Timestamp,
}

impl From<Institucion> for InstitucionResponse {
    fn from(i: Institucion) -> Self {
        Self {
            id: i.id,
            email: i.email,
            nombre: i.nombre,
            cuit: i.cuit,
            telefono: i.telefono,
            direccion: i.direccion,
            subscription_status: i.subscription_status,
            created_at: i.created_at,
        }
    }
}

/// Insert DTO. The email must already be normalised and the password hashed.
#[derive(Debug, Clone)]
pub struct CreateInstitucion {
    pub email: String,
    pub nombre: String,
    pub cuit: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub password_hash: String,
}
