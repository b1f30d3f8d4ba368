//! File uploads.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Public URL prefix under which `UPLOAD_DIR` is served.
pub const UPLOADS_URL_PREFIX: &str = "/files/uploads";

/// Longest kept portion of a client file name.
const MAX_NAME_CHARS: usize = 120;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub url: String,
    pub size: usize,
}

/// Reduce a client-supplied name to a safe basename of `[A-Za-z0-9._-]`.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "archivo".to_string()
    } else {
        cleaned.to_string()
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// POST /api/v1/upload -- multipart field `file`.
pub async fn upload(
    user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let original = field.file_name().unwrap_or("archivo").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        let filename = format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(&original));

        let dir = &state.config.upload_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Creating {}: {e}", dir.display())))?;
        tokio::fs::write(dir.join(&filename), &bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Writing {filename}: {e}")))?;

        tracing::info!(filename = %filename, size = bytes.len(), actor = %user.actor, "File uploaded");
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("{UPLOADS_URL_PREFIX}/{filename}"),
                size: bytes.len(),
                filename,
            }),
        ));
    }

    Err(AppError::BadRequest("Missing multipart field 'file'".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_basename_and_safe_chars() {
        assert_eq!(sanitize_filename("C:\\docs\\Acta Final (1).pdf"), "Acta_Final__1_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("mediación.docx"), "mediaci_n.docx");
    }

    #[test]
    fn hidden_and_empty_names_get_a_default() {
        assert_eq!(sanitize_filename(".env"), "env");
        assert_eq!(sanitize_filename(""), "archivo");
        assert_eq!(sanitize_filename("dir/"), "archivo");
    }
}
