//! Handlers for `/auth` (mediator accounts).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mediar_core::actor::ActorKind;
use mediar_core::email::{looks_like_email, normalize_email};
use mediar_core::error::CoreError;
use mediar_db::models::mediador::{CreateMediador, Mediador, MediadorResponse};
use mediar_db::repositories::MediadorRepo;
use mediar_notify::templates;
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireMediador;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterMediadorRequest {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub apellido: String,
    pub matricula: Option<String>,
    pub telefono: Option<String>,
}

/// Request body for both `login` endpoints.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for both `change-password` endpoints.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub mediador: MediadorResponse,
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub mediador: MediadorResponse,
}

// ---------------------------------------------------------------------------
// Shared helpers (also used by the institution handlers)
// ---------------------------------------------------------------------------

pub(crate) fn validate_credentials(email: &str, password: &str) -> AppResult<String> {
    if !looks_like_email(email) {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid email address".into(),
        )));
    }
    validate_password_strength(password).map_err(|m| AppError::Core(CoreError::Validation(m)))?;
    Ok(normalize_email(email))
}

pub(crate) fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// `Ok(())` if `password` matches `stored_hash`, else 401.
pub(crate) fn check_password(password: &str, stored_hash: &str) -> AppResult<()> {
    let valid = verify_password(password, stored_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(invalid_credentials());
    }
    Ok(())
}

pub(crate) fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
}

pub(crate) fn issue_token(state: &AppState, email: &str, actor: ActorKind) -> AppResult<String> {
    generate_token(email, actor, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

pub(crate) fn email_taken() -> AppError {
    AppError::Core(CoreError::Conflict("Email already registered".into()))
}

/// The mediator row behind a session; 401 if the account no longer exists.
pub(crate) async fn current_mediador(state: &AppState, email: &str) -> AppResult<Mediador> {
    MediadorRepo::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Account no longer exists".into())))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterMediadorRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let email = validate_credentials(&input.email, &input.password)?;
    require_text("nombre", &input.nombre)?;
    require_text("apellido", &input.apellido)?;

    if MediadorRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(email_taken());
    }

    let mediador = MediadorRepo::create(
        &state.pool,
        &CreateMediador {
            email: email.clone(),
            nombre: input.nombre.trim().to_string(),
            apellido: input.apellido.trim().to_string(),
            password_hash: hash(&input.password)?,
            matricula: input.matricula,
            telefono: input.telefono,
        },
    )
    .await?;
    tracing::info!(mediador_id = mediador.id, "Mediador registered");

    let email_sent = state
        .send_email(&email, templates::welcome_mediador(&mediador.nombre))
        .await;
    let token = issue_token(&state, &email, ActorKind::Mediador)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token,
            mediador: mediador.into(),
            email_sent,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mediador = MediadorRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;
    check_password(&input.password, &mediador.password_hash)?;

    let token = issue_token(&state, &mediador.email, ActorKind::Mediador)?;
    tracing::info!(mediador_id = mediador.id, "Mediador logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        mediador: mediador.into(),
    }))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let mediador = current_mediador(&state, &user.email).await?;
    check_password(&input.old_password, &mediador.password_hash)?;
    validate_password_strength(&input.new_password)
        .map_err(|m| AppError::Core(CoreError::Validation(m)))?;

    MediadorRepo::update_password(&state.pool, mediador.id, &hash(&input.new_password)?).await?;
    tracing::info!(mediador_id = mediador.id, "Mediador password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
) -> AppResult<Json<MediadorResponse>> {
    let mediador = current_mediador(&state, &user.email).await?;
    Ok(Json(mediador.into()))
}
