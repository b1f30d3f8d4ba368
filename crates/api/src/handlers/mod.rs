pub mod actas;
pub mod admin;
pub mod agenda;
pub mod ai;
pub mod auth;
pub mod casos;
pub mod contacto;
pub mod instituciones;
pub mod news;
pub mod notas;
pub mod payments;
pub mod perfil;
pub mod upload;
pub mod voces;

use mediar_core::actor::Owner;
use mediar_core::error::CoreError;
use mediar_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Reject blank required text fields with a 400 naming the field.
pub(crate) fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{field}' must not be empty"
        ))));
    }
    Ok(())
}

/// 403 unless the row's stored owner is `owner` (case-insensitive email and
/// same actor class).
pub(crate) fn ensure_owned(
    owner: &Owner,
    entity: &'static str,
    id: DbId,
    row_kind: &str,
    row_email: &str,
) -> AppResult<()> {
    if !owner.owns(row_kind, row_email) {
        tracing::warn!(entity, id, owner = %owner.email, "Ownership check failed");
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "{entity} {id} belongs to another account"
        ))));
    }
    Ok(())
}
