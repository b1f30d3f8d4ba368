//! Institution notes (`/instituciones/notas`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::error::CoreError;
use mediar_core::types::DbId;
use mediar_db::models::nota::{CreateNota, Nota, UpdateNota};
use mediar_db::repositories::{CasoRepo, NotaRepo};

use super::require_text;
use crate::error::{AppError, AppResult};
use crate::middleware::guard::{ActorGuard, RequireInstitucion};
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_owned(state: &AppState, email: &str, id: DbId) -> AppResult<Nota> {
    let nota = NotaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Nota", id }))?;
    if !nota.owner_email.eq_ignore_ascii_case(email) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Nota {id} belongs to another account"
        ))));
    }
    Ok(nota)
}

async fn validate_caso_ref(
    state: &AppState,
    guard: &RequireInstitucion,
    caso_id: Option<DbId>,
) -> AppResult<()> {
    let Some(caso_id) = caso_id else {
        return Ok(());
    };
    let owner = guard.owner();
    let owned = CasoRepo::find_by_id(&state.pool, caso_id)
        .await?
        .is_some_and(|c| owner.owns(&c.owner_kind, &c.owner_email));
    if !owned {
        return Err(AppError::BadRequest(format!(
            "caso_id {caso_id} does not reference one of your cases"
        )));
    }
    Ok(())
}

/// GET /api/v1/instituciones/notas
pub async fn list(
    guard: RequireInstitucion,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notas = NotaRepo::list_by_owner(&state.pool, &guard.0.email).await?;
    Ok(Json(DataResponse { data: notas }))
}

/// GET /api/v1/instituciones/notas/{id}
pub async fn get(
    guard: RequireInstitucion,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Nota>> {
    Ok(Json(load_owned(&state, &guard.0.email, id).await?))
}

/// POST /api/v1/instituciones/notas
pub async fn create(
    guard: RequireInstitucion,
    State(state): State<AppState>,
    Json(input): Json<CreateNota>,
) -> AppResult<(StatusCode, Json<Nota>)> {
    require_text("titulo", &input.titulo)?;
    validate_caso_ref(&state, &guard, input.caso_id).await?;

    let nota = NotaRepo::create(&state.pool, &guard.0.email, &input).await?;
    tracing::info!(nota_id = nota.id, "Nota created");

    Ok((StatusCode::CREATED, Json(nota)))
}

/// PUT /api/v1/instituciones/notas/{id}
pub async fn update(
    guard: RequireInstitucion,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNota>,
) -> AppResult<Json<Nota>> {
    if let Some(titulo) = &input.titulo {
        require_text("titulo", titulo)?;
    }
    load_owned(&state, &guard.0.email, id).await?;
    validate_caso_ref(&state, &guard, input.caso_id).await?;

    let nota = NotaRepo::update(&state.pool, id, &guard.0.email, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Nota", id }))?;

    Ok(Json(nota))
}

/// DELETE /api/v1/instituciones/notas/{id}
pub async fn delete(
    guard: RequireInstitucion,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, &guard.0.email, id).await?;
    if !NotaRepo::delete(&state.pool, id, &guard.0.email).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Nota", id }));
    }
    tracing::info!(nota_id = id, "Nota deleted");

    Ok(StatusCode::NO_CONTENT)
}
