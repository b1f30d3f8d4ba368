//! REST client for the Stripe Checkout endpoints.
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with bracketed
//! keys for nested parameters and answers with JSON.

use std::collections::HashMap;
use std::time::Duration;

use mediar_core::actor::ActorKind;
use serde::Deserialize;

/// Default API base; overridable for tests and proxies.
const DEFAULT_API_BASE: &str = "https://api.stripe.com/v1";

/// HTTP timeout for a single Stripe call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Placeholder Stripe replaces with the session id in redirect URLs.
const SESSION_ID_TEMPLATE: &str = "{CHECKOUT_SESSION_ID}";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Stripe returned a non-2xx status code.
    #[error("Stripe API error ({status}): {body}")]
    Api { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// Recurring price the checkout subscribes to.
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub api_base: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` (payments disabled) if `STRIPE_SECRET_KEY` is not set.
    /// A key without `STRIPE_PRICE_ID` is logged and also disables payments.
    ///
    /// | Variable             | Required | Default                                   |
    /// |----------------------|----------|-------------------------------------------|
    /// | `STRIPE_SECRET_KEY`  | yes      | -                                         |
    /// | `STRIPE_PRICE_ID`    | yes      | -                                         |
    /// | `STRIPE_SUCCESS_URL` | no       | `http://localhost:5173/suscripcion/exito` |
    /// | `STRIPE_CANCEL_URL`  | no       | `http://localhost:5173/suscripcion`       |
    /// | `STRIPE_API_BASE`    | no       | `https://api.stripe.com/v1`               |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let Some(price_id) = std::env::var("STRIPE_PRICE_ID").ok() else {
            tracing::warn!("STRIPE_SECRET_KEY is set but STRIPE_PRICE_ID is not; payments disabled");
            return None;
        };
        Some(Self {
            secret_key,
            price_id,
            success_url: std::env::var("STRIPE_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:5173/suscripcion/exito".to_string()),
            cancel_url: std::env::var("STRIPE_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:5173/suscripcion".to_string()),
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

/// The subset of a Checkout Session object the platform reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: Option<String>,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub customer_email: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    pub client_reference_id: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    /// Create a subscription-mode checkout session for an actor.
    pub async fn create_checkout_session(
        &self,
        email: &str,
        actor: ActorKind,
    ) -> Result<CheckoutSession, StripeError> {
        let form = checkout_form(&self.config, email, actor);
        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.config.api_base))
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;

        let session: CheckoutSession = Self::parse_response(response).await?;
        tracing::info!(session_id = %session.id, email, actor = %actor, "Checkout session created");
        Ok(session)
    }

    /// Fetch a checkout session by id.
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let response = self
            .client
            .get(format!(
                "{}/checkout/sessions/{}",
                self.config.api_base, session_id
            ))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StripeError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Form parameters for a subscription checkout. The actor's email and kind
/// travel in the session metadata and in the subscription metadata so later
/// events can be routed back to the right row.
pub fn checkout_form(config: &StripeConfig, email: &str, actor: ActorKind) -> Vec<(String, String)> {
    let success_url = if config.success_url.contains(SESSION_ID_TEMPLATE) {
        config.success_url.clone()
    } else {
        let sep = if config.success_url.contains('?') { '&' } else { '?' };
        format!("{}{sep}session_id={SESSION_ID_TEMPLATE}", config.success_url)
    };

    let pairs = [
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", config.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("customer_email", email.to_string()),
        ("client_reference_id", email.to_string()),
        ("success_url", success_url),
        ("cancel_url", config.cancel_url.clone()),
        ("metadata[email]", email.to_string()),
        ("metadata[actor]", actor.as_str().to_string()),
        ("subscription_data[metadata][email]", email.to_string()),
        ("subscription_data[metadata][actor]", actor.as_str().to_string()),
    ];
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(success_url: &str) -> StripeConfig {
        StripeConfig {
            secret_key: "sk_test".to_string(),
            price_id: "price_123".to_string(),
            success_url: success_url.to_string(),
            cancel_url: "https://mediar.test/cancel".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn form_carries_actor_metadata() {
        let form = checkout_form(
            &config("https://mediar.test/ok"),
            "juzgado@example.com",
            ActorKind::Institucion,
        );
        assert_eq!(value(&form, "mode"), Some("subscription"));
        assert_eq!(value(&form, "line_items[0][price]"), Some("price_123"));
        assert_eq!(value(&form, "metadata[actor]"), Some("institucion"));
        assert_eq!(
            value(&form, "subscription_data[metadata][email]"),
            Some("juzgado@example.com")
        );
    }

    #[test]
    fn success_url_gets_session_placeholder_once() {
        let form = checkout_form(&config("https://mediar.test/ok?x=1"), "a@b.c", ActorKind::Mediador);
        assert_eq!(
            value(&form, "success_url"),
            Some("https://mediar.test/ok?x=1&session_id={CHECKOUT_SESSION_ID}")
        );

        let already = "https://mediar.test/ok?s={CHECKOUT_SESSION_ID}";
        let form = checkout_form(&config(already), "a@b.c", ActorKind::Mediador);
        assert_eq!(value(&form, "success_url"), Some(already));
    }

    #[test]
    fn session_tolerates_null_fields() {
        let session: CheckoutSession = serde_json::from_str(
            r#"{"id":"cs_1","url":null,"payment_status":"unpaid","customer":null,
                "customer_details":null,"metadata":null,"object":"checkout.session"}"#,
        )
        .unwrap();
        assert_eq!(session.id, "cs_1");
        assert!(session.metadata.is_none());
    }
}
