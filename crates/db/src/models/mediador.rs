//! Mediator identity model and DTOs.

use mediar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full row from the `mediadores` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`MediadorResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Mediador {
    pub id: DbId,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub password_hash: String,
    pub matricula: Option<String>,
    pub telefono: Option<String>,
    pub approval_status: String,
    pub subscription_status: String,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe mediator representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct MediadorResponse {
    pub id: DbId,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub matricula: Option<String>,
    pub telefono: Option<String>,
    pub approval_status: String,
    pub subscription_status: String,
    pub created_at: Timestamp,
}

impl From<Mediador> for MediadorResponse {
    fn from(m: Mediador) -> Self {
        Self {
            id: m.id,
            email: m.email,
            nombre: m.nombre,
            apellido: m.apellido,
            matricula: m.matricula,
            telefono: m.telefono,
            approval_status: m.approval_status,
            subscription_status: m.subscription_status,
            created_at: m.created_at,
        }
    }
}

/// Insert DTO. The email must already be normalised and the password hashed.
#[derive(Debug, Clone)]
pub struct CreateMediador {
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub password_hash: String,
    pub matricula: Option<String>,
    pub telefono: Option<String>,
}
