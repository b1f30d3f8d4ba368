use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mediar_assist::AssistError;
use mediar_core::error::CoreError;
use mediar_documents::DocumentError;
use mediar_payments::StripeError;
use serde_json::json;

/// Message returned for every error whose detail stays in the logs.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Internal detail (database, SDK, I/O) is logged and never sent to clients.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An external service (payment processor, completion API) failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A required integration is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(&'static str),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StripeError> for AppError {
    fn from(err: StripeError) -> Self {
        AppError::Upstream(format!("Stripe: {err}"))
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        AppError::InternalError(format!("Document generation: {err}"))
    }
}

impl From<AssistError> for AppError {
    fn from(err: AssistError) -> Self {
        match err {
            AssistError::InvalidReference(reference) => {
                AppError::BadRequest(format!("Invalid document reference: {reference}"))
            }
            AssistError::NotFound(reference) => AppError::Core(CoreError::NotFoundByKey {
                entity: "Document",
                key: reference,
            }),
            AssistError::TooLarge { limit } => {
                AppError::PayloadTooLarge(format!("Document exceeds {limit} bytes"))
            }
            AssistError::FetchStatus(status) => {
                AppError::BadRequest(format!("Document could not be fetched (HTTP {status})"))
            }
            AssistError::Document(DocumentError::Unsupported(ext)) => {
                AppError::BadRequest(format!("Unsupported document type: {ext}"))
            }
            AssistError::Document(e) => AppError::BadRequest(format!("Unreadable document: {e}")),
            AssistError::Io(e) => AppError::InternalError(format!("Reading document: {e}")),
            e @ (AssistError::Request(_) | AssistError::Upstream { .. }) => {
                AppError::Upstream(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundByKey { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream service error");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "An external service failed to respond".to_string(),
                )
            }
            AppError::ServiceUnavailable(service) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                format!("{service} is not configured"),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on a `uq_*` constraint map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_is_not_returned() {
        let response =
            AppError::InternalError("connection refused at 10.0.0.3".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn assist_errors_map_to_client_statuses() {
        let status = |e: AssistError| AppError::from(e).into_response().status();
        assert_eq!(
            status(AssistError::InvalidReference("../etc/passwd".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(AssistError::NotFound("a.pdf".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AssistError::TooLarge { limit: 10 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status(AssistError::Upstream {
                status: 500,
                body: "boom".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(AssistError::Document(DocumentError::Unsupported("exe".into()))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn row_not_found_is_404() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
