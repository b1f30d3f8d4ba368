//! Mediator profiles and the public directory.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::error::CoreError;
use mediar_core::types::DbId;
use mediar_db::models::perfil::{DirectorioEntry, DirectorioFilter, Perfil, UpsertPerfil};
use mediar_db::repositories::PerfilRepo;

use super::auth::current_mediador;
use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireMediador;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/perfil
pub async fn get_own(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
) -> AppResult<Json<Perfil>> {
    let mediador = current_mediador(&state, &user.email).await?;
    let perfil = PerfilRepo::find(&state.pool, mediador.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Perfil",
            id: mediador.id,
        }))?;
    Ok(Json(perfil))
}

/// PUT /api/v1/perfil -- create or update; omitted fields keep their value.
pub async fn upsert_own(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
    Json(input): Json<UpsertPerfil>,
) -> AppResult<Json<Perfil>> {
    let mediador = current_mediador(&state, &user.email).await?;
    let perfil = PerfilRepo::upsert(&state.pool, mediador.id, &input).await?;
    tracing::info!(mediador_id = mediador.id, "Perfil updated");
    Ok(Json(perfil))
}

/// GET /api/v1/perfil/directorio -- approved mediators only.
pub async fn directorio(
    State(state): State<AppState>,
    Query(filter): Query<DirectorioFilter>,
) -> AppResult<impl IntoResponse> {
    let entries = PerfilRepo::directorio(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/perfil/{mediador_id} -- 404 unless the mediator is approved.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(mediador_id): Path<DbId>,
) -> AppResult<Json<DirectorioEntry>> {
    let entry = PerfilRepo::find_public(&state.pool, mediador_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Mediador",
            id: mediador_id,
        }))?;
    Ok(Json(entry))
}
