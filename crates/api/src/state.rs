use std::sync::Arc;

use mediar_assist::Assistant;
use mediar_documents::ActaGenerator;
use mediar_notify::{EmailTemplate, Mailer, OutgoingEmail};
use mediar_payments::StripeClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. Optional integrations are `None` when their
/// configuration is absent; routes that need them answer 503.
#[derive(Clone)]
pub struct AppState {
    pub pool: mediar_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub mailer: Option<Arc<Mailer>>,
    pub stripe: Option<Arc<StripeClient>>,
    pub assistant: Option<Arc<Assistant>>,
    pub actas: Arc<ActaGenerator>,
    /// Client for feeds and header images.
    pub http: reqwest::Client,
}

impl AppState {
    /// State with every optional integration disabled and the built-in acta.
    pub fn new(pool: mediar_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            mailer: None,
            stripe: None,
            assistant: None,
            actas: Arc::new(ActaGenerator::builtin()),
            http: reqwest::Client::new(),
        }
    }

    /// Send a transactional email, treating failure as soft.
    ///
    /// Returns whether the message was handed to the SMTP server.
    pub async fn send_email(&self, to: &str, template: EmailTemplate) -> bool {
        let Some(mailer) = &self.mailer else {
            tracing::debug!(to, "Email disabled, not sending");
            return false;
        };
        let email = OutgoingEmail::from_template(to, template);
        match mailer.send(&email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(to, error = %e, "Email delivery failed");
                false
            }
        }
    }
}
