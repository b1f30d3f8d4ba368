//! Published articles ("voces").

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::error::CoreError;
use mediar_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use mediar_core::slug::{first_free_slug, slugify};
use mediar_db::models::voz::{CreateVoz, NewVoz, UpdateVoz, Voz};
use mediar_db::repositories::VozRepo;

use super::auth::current_mediador;
use super::require_text;
use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireMediador;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(slug: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Voz",
        key: slug.to_string(),
    })
}

/// Load a post and check the session's mediator wrote it.
async fn load_authored(state: &AppState, email: &str, slug: &str) -> AppResult<Voz> {
    let voz = VozRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| not_found(slug))?;
    if !voz.autor_email.eq_ignore_ascii_case(email) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can modify this post".into(),
        )));
    }
    Ok(voz)
}

/// GET /api/v1/voces -- published posts, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let voces = VozRepo::list_published(
        &state.pool,
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: voces }))
}

/// GET /api/v1/voces/{slug} -- unpublished posts are not found.
pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Voz>> {
    let voz = VozRepo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|v| v.publicado)
        .ok_or_else(|| not_found(&slug))?;
    Ok(Json(voz))
}

/// POST /api/v1/voces
pub async fn create(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
    Json(input): Json<CreateVoz>,
) -> AppResult<(StatusCode, Json<Voz>)> {
    require_text("titulo", &input.titulo)?;
    require_text("contenido", &input.contenido)?;
    let autor = current_mediador(&state, &user.email).await?;

    let base = slugify(&input.titulo);
    let taken = VozRepo::slugs_with_base(&state.pool, &base).await?;
    let slug = first_free_slug(&base, &taken);

    let voz = VozRepo::create(
        &state.pool,
        &NewVoz {
            slug,
            titulo: input.titulo.trim().to_string(),
            resumen: input.resumen,
            contenido: input.contenido,
            autor_email: autor.email,
            autor_nombre: format!("{} {}", autor.nombre, autor.apellido),
            publicado: input.publicado.unwrap_or(true),
        },
    )
    .await?;
    tracing::info!(slug = %voz.slug, mediador_id = autor.id, "Voz published");

    Ok((StatusCode::CREATED, Json(voz)))
}

/// PUT /api/v1/voces/{slug} -- author only.
pub async fn update(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateVoz>,
) -> AppResult<Json<Voz>> {
    if let Some(titulo) = &input.titulo {
        require_text("titulo", titulo)?;
    }
    load_authored(&state, &user.email, &slug).await?;

    let voz = VozRepo::update(&state.pool, &slug, &input)
        .await?
        .ok_or_else(|| not_found(&slug))?;
    Ok(Json(voz))
}

/// DELETE /api/v1/voces/{slug} -- author only.
pub async fn delete(
    RequireMediador(user): RequireMediador,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    load_authored(&state, &user.email, &slug).await?;
    if !VozRepo::delete(&state.pool, &slug).await? {
        return Err(not_found(&slug));
    }
    tracing::info!(slug = %slug, "Voz deleted by author");
    Ok(StatusCode::NO_CONTENT)
}
