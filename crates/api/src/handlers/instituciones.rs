//! Handlers for `/instituciones/auth` (institution accounts).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mediar_core::actor::ActorKind;
use mediar_core::error::CoreError;
use mediar_db::models::institucion::{CreateInstitucion, Institucion, InstitucionResponse};
use mediar_db::repositories::InstitucionRepo;
use mediar_notify::templates;
use serde::{Deserialize, Serialize};

use super::auth::{
    check_password, email_taken, hash, invalid_credentials, issue_token, validate_credentials,
    ChangePasswordRequest, LoginRequest,
};
use super::require_text;
use crate::auth::password::validate_password_strength;
use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireInstitucion;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterInstitucionRequest {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub cuit: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub institucion: InstitucionResponse,
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub institucion: InstitucionResponse,
}

async fn current_institucion(state: &AppState, email: &str) -> AppResult<Institucion> {
    InstitucionRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))
}

/// POST /api/v1/instituciones/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInstitucionRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let email = validate_credentials(&input.email, &input.password)?;
    require_text("nombre", &input.nombre)?;

    if InstitucionRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(email_taken());
    }

    let institucion = InstitucionRepo::create(
        &state.pool,
        &CreateInstitucion {
            email: email.clone(),
            nombre: input.nombre.trim().to_string(),
            cuit: input.cuit,
            telefono: input.telefono,
            direccion: input.direccion,
            password_hash: hash(&input.password)?,
        },
    )
    .await?;
    tracing::info!(institucion_id = institucion.id, "Institucion registered");

    let email_sent = state
        .send_email(&email, templates::welcome_institucion(&institucion.nombre))
        .await;
    let token = issue_token(&state, &email, ActorKind::Institucion)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            institucion: institucion.into(),
            email_sent,
        }),
    ))
}

/// POST /api/v1/instituciones/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let institucion = InstitucionRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;
    check_password(&input.password, &institucion.password_hash)?;

    let token = issue_token(&state, &institucion.email, ActorKind::Institucion)?;
    tracing::info!(institucion_id = institucion.id, "Institucion logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        institucion: institucion.into(),
    }))
}

/// POST /api/v1/instituciones/auth/change-password
pub async fn change_password(
    RequireInstitucion(user): RequireInstitucion,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let institucion = current_institucion(&state, &user.email).await?;
    check_password(&input.old_password, &institucion.password_hash)?;
    validate_password_strength(&input.new_password)
        .map_err(|m| AppError::Core(CoreError::Validation(m)))?;

    InstitucionRepo::update_password(&state.pool, institucion.id, &hash(&input.new_password)?)
        .await?;
    tracing::info!(institucion_id = institucion.id, "Institucion password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/instituciones/auth/me
pub async fn me(
    RequireInstitucion(user): RequireInstitucion,
    State(state): State<AppState>,
) -> AppResult<Json<InstitucionResponse>> {
    let institucion = current_institucion(&state, &user.email).await?;
    Ok(Json(institucion.into()))
}
