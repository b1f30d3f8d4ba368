//! Public contact form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mediar_core::contact::{classify, ContactCategory};
use mediar_core::email::{looks_like_email, normalize_email};
use mediar_core::error::CoreError;
use mediar_core::types::DbId;
use mediar_db::models::contacto::CreateContacto;
use mediar_db::repositories::ContactoRepo;
use mediar_notify::templates;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactoRequest {
    pub nombre: String,
    pub email: String,
    pub mensaje: String,
}

#[derive(Debug, Serialize)]
pub struct ContactoResponse {
    pub id: DbId,
    pub categoria: ContactCategory,
    pub confianza: f64,
    pub email_sent: bool,
}

/// POST /api/v1/contacto
///
/// Classifies the message, stores it, and sends the matching auto-reply.
/// A failed reply does not fail the request.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<ContactoRequest>,
) -> AppResult<(StatusCode, Json<ContactoResponse>)> {
    require_text("nombre", &input.nombre)?;
    require_text("mensaje", &input.mensaje)?;
    if !looks_like_email(&input.email) {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid email address".into(),
        )));
    }

    let email = normalize_email(&input.email);
    let nombre = input.nombre.trim().to_string();
    let classification = classify(&input.mensaje);

    let contacto = ContactoRepo::create(
        &state.pool,
        &CreateContacto {
            nombre: nombre.clone(),
            email: email.clone(),
            mensaje: input.mensaje,
            categoria: classification.category.as_str().to_string(),
            confianza: classification.confidence,
        },
    )
    .await?;
    tracing::info!(
        contacto_id = contacto.id,
        categoria = classification.category.as_str(),
        confianza = classification.confidence,
        "Contact message stored"
    );

    let email_sent = state
        .send_email(
            &email,
            templates::contact_auto_reply(classification.category, &nombre),
        )
        .await;
    if email_sent {
        ContactoRepo::mark_auto_reply_sent(&state.pool, contacto.id).await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(ContactoResponse {
            id: contacto.id,
            categoria: classification.category,
            confianza: classification.confidence,
            email_sent,
        }),
    ))
}
