use std::path::PathBuf;

use mediar_core::news::DEFAULT_FEEDS;

use crate::auth::jwt::JwtConfig;

/// Default cap on request bodies (uploads included): 20 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// Integrations with their own settings (SMTP, Stripe keys, the AI API) load
/// them in their crates; this struct covers what the HTTP layer needs.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Shared secret accepted in the `X-Admin-Token` header.
    pub admin_token: String,
    /// Where uploaded files are written and served from.
    pub upload_dir: PathBuf,
    /// Where generated actas are written and served from.
    pub actas_dir: PathBuf,
    /// Optional `.docx` used as the acta base instead of the built-in one.
    pub acta_template_path: Option<PathBuf>,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// RSS/Atom feeds searched by the news endpoint.
    pub news_feeds: Vec<String>,
    /// Stripe webhook signing secret. Unset means webhooks are not verified.
    pub stripe_webhook_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `60`                     |
    /// | `ADMIN_TOKEN`           | **required**             |
    /// | `UPLOAD_DIR`            | `storage/uploads`        |
    /// | `ACTAS_DIR`             | `storage/actas`          |
    /// | `ACTA_TEMPLATE_PATH`    | unset (built-in acta)    |
    /// | `MAX_UPLOAD_BYTES`      | `20971520`               |
    /// | `NEWS_FEEDS`            | built-in legal feeds     |
    /// | `STRIPE_WEBHOOK_SECRET` | unset                    |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on missing secrets or unparsable numbers; misconfiguration
    /// should stop the server at start-up.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let admin_token =
            std::env::var("ADMIN_TOKEN").expect("ADMIN_TOKEN must be set in the environment");
        assert!(!admin_token.trim().is_empty(), "ADMIN_TOKEN must not be empty");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let news_feeds = match std::env::var("NEWS_FEEDS") {
            Ok(list) if !list.trim().is_empty() => split_list(&list),
            _ => DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            admin_token,
            upload_dir: env_path("UPLOAD_DIR", "storage/uploads"),
            actas_dir: env_path("ACTAS_DIR", "storage/actas"),
            acta_template_path: std::env::var("ACTA_TEMPLATE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            max_upload_bytes,
            news_feeds,
            stripe_webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    PathBuf::from(std::env::var(var).unwrap_or_else(|_| default.to_string()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
