//! Acta generation.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::types::DbId;
use mediar_documents::header_image::{HeaderImage, MAX_HEADER_IMAGE_BYTES};
use mediar_documents::template::values_from_fields;
use mediar_documents::ActaRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::casos::load_owned;
use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireAccount;
use crate::response::DataResponse;
use crate::state::AppState;

/// Public URL prefix under which `ACTAS_DIR` is served.
pub const ACTAS_URL_PREFIX: &str = "/files/actas";

const HEADER_IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
pub struct GenerateActaRequest {
    pub caso_id: Option<DbId>,
    /// Field values keyed by placeholder name (`nombre_mediador`, ...).
    #[serde(default)]
    pub campos: HashMap<String, String>,
    pub header_image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateActaResponse {
    pub filename: String,
    pub url: String,
    /// Placeholders left unfilled.
    pub missing: Vec<String>,
    pub header_image: bool,
}

/// Fetch and validate a header picture. Any failure is logged and yields
/// `None`; the acta is generated without it.
async fn fetch_header_image(state: &AppState, url: &str) -> Option<HeaderImage> {
    let lower = url.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        tracing::warn!(url, "Header image URL is not http(s), skipping");
        return None;
    }

    let result: Result<Vec<u8>, String> = async {
        let mut response = state
            .http
            .get(url)
            .timeout(HEADER_IMAGE_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| e.to_string())? {
            if bytes.len() + chunk.len() > MAX_HEADER_IMAGE_BYTES {
                return Err(format!("larger than {MAX_HEADER_IMAGE_BYTES} bytes"));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
    .await;

    match result.and_then(|bytes| HeaderImage::from_bytes(bytes).map_err(|e| e.to_string())) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(url, error = %e, "Header image unavailable");
            None
        }
    }
}

/// POST /api/v1/actas
pub async fn generate(
    RequireAccount(user): RequireAccount,
    State(state): State<AppState>,
    Json(input): Json<GenerateActaRequest>,
) -> AppResult<(StatusCode, Json<GenerateActaResponse>)> {
    let mut fields = values_from_fields(&input.campos);

    let filename = match input.caso_id {
        Some(caso_id) => {
            let caso = load_owned(&state, &user.owner(), caso_id).await?;
            for (token, value) in [
                ("TITULO", Some(caso.titulo)),
                ("PARTES", caso.partes),
                ("MATERIA", caso.materia),
            ] {
                if let Some(value) = value {
                    fields.entry(token.to_string()).or_insert(value);
                }
            }
            format!("acta_caso_{caso_id}.docx")
        }
        None => format!("acta_{}.docx", Uuid::new_v4()),
    };

    let header_image = match input.header_image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => fetch_header_image(&state, url).await,
        _ => None,
    };

    let generator = state.actas.clone();
    let request = ActaRequest {
        fields,
        header_image,
    };
    let acta = tokio::task::spawn_blocking(move || generator.generate(&request))
        .await
        .map_err(|e| AppError::InternalError(format!("Acta task failed: {e}")))??;

    let dir = &state.config.actas_dir;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Creating {}: {e}", dir.display())))?;
    tokio::fs::write(dir.join(&filename), &acta.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Writing {filename}: {e}")))?;

    tracing::info!(
        filename = %filename,
        missing = acta.missing.len(),
        header_image = acta.header_image,
        "Acta generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(GenerateActaResponse {
            url: format!("{ACTAS_URL_PREFIX}/{filename}"),
            filename,
            missing: acta.missing,
            header_image: acta.header_image,
        }),
    ))
}

/// GET /api/v1/actas/placeholders
pub async fn placeholders(
    _user: RequireAccount,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.actas.placeholders()?,
    }))
}
