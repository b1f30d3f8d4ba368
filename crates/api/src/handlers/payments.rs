//! Stripe checkout, webhook, and post-checkout confirmation.
//!
//! The webhook and the confirmation endpoint both turn what Stripe reports
//! into a [`SubscriptionUpdate`] through the same pure mapping and apply it
//! with [`apply_update`], so whichever arrives second re-applies the same
//! assignment.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use mediar_core::actor::ActorKind;
use mediar_core::status::SubscriptionStatus;
use mediar_db::repositories::{InstitucionRepo, MediadorRepo, SubscriptionRepo};
use mediar_notify::templates;
use mediar_payments::mapping::{session_owner, update_from_event, update_from_session};
use mediar_payments::webhook::{parse_event, verify_signature_now};
use mediar_payments::{StripeClient, SubscriptionUpdate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireAccount;
use crate::state::AppState;

/// Header carrying the webhook signature.
const SIGNATURE_HEADER: &str = "stripe-signature";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    /// Whether a subscription row changed.
    pub applied: bool,
    /// Whether this call moved the account into `active` (and sent the
    /// activation email).
    pub activated: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub session_id: String,
    /// Stripe's `payment_status` for the session.
    pub payment_status: Option<String>,
    /// The stored subscription status after confirmation, if the account
    /// could be identified.
    pub status: Option<String>,
    pub applied: bool,
    pub activated: bool,
}

fn stripe(state: &AppState) -> AppResult<&StripeClient> {
    state
        .stripe
        .as_deref()
        .ok_or(AppError::ServiceUnavailable("Payments"))
}

// ---------------------------------------------------------------------------
// Applying updates
// ---------------------------------------------------------------------------

/// What [`apply_update`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// A subscription row was written.
    pub applied: bool,
    /// The email-matched row went from another status to `active`.
    pub activated: bool,
}

/// Apply a status assignment: by email in the actor's table first, then by
/// processor customer id.
pub async fn apply_update(state: &AppState, update: &SubscriptionUpdate) -> AppResult<Applied> {
    let status = update.status.as_str();
    let mut applied = false;
    let mut activated = false;

    if let Some(email) = &update.email {
        let previous = SubscriptionRepo::apply_by_email(
            &state.pool,
            update.actor,
            email,
            status,
            update.customer_id.as_deref(),
            update.subscription_id.as_deref(),
        )
        .await?;

        if let Some(previous) = previous {
            applied = true;
            activated = is_activation(update.status, &previous);
            if activated {
                notify_activated(state, update.actor, email).await;
            }
        }
    }

    if !applied {
        if let Some(customer_id) = &update.customer_id {
            applied = SubscriptionRepo::apply_by_customer_id(
                &state.pool,
                customer_id,
                status,
                update.subscription_id.as_deref(),
            )
            .await?;
        }
    }

    tracing::info!(
        email = update.email.as_deref().unwrap_or("-"),
        actor = %update.actor,
        status,
        applied,
        activated,
        "Subscription update processed"
    );
    Ok(Applied { applied, activated })
}

/// True when a write moves an account into `active` from any other status.
pub(crate) fn is_activation(new_status: SubscriptionStatus, previous: &str) -> bool {
    new_status == SubscriptionStatus::Active && previous != SubscriptionStatus::Active.as_str()
}

/// Best-effort "subscription active" email.
async fn notify_activated(state: &AppState, actor: ActorKind, email: &str) {
    let nombre = match actor {
        ActorKind::Mediador => MediadorRepo::find_by_email(&state.pool, email)
            .await
            .map(|m| m.map(|m| m.nombre)),
        ActorKind::Institucion => InstitucionRepo::find_by_email(&state.pool, email)
            .await
            .map(|i| i.map(|i| i.nombre)),
        ActorKind::Admin => Ok(None),
    };
    match nombre {
        Ok(Some(nombre)) => {
            state
                .send_email(email, templates::subscription_activated(&nombre))
                .await;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(email, error = %e, "Could not look up subscriber name"),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/payments/stripe/checkout
pub async fn checkout(
    RequireAccount(user): RequireAccount,
    State(state): State<AppState>,
) -> AppResult<Json<CheckoutResponse>> {
    let session = stripe(&state)?
        .create_checkout_session(&user.email, user.actor)
        .await?;
    let url = session
        .url
        .ok_or_else(|| AppError::Upstream(format!("Checkout session {} has no URL", session.id)))?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url,
    }))
}

/// POST /api/v1/payments/stripe/webhook
///
/// Verifies `Stripe-Signature` when a signing secret is configured. Unknown
/// event types are acknowledged without changes.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    match &state.config.stripe_webhook_secret {
        Some(secret) => {
            let signature = headers
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;
            verify_signature_now(&body, signature, secret).map_err(|e| {
                tracing::warn!(error = %e, "Rejected webhook signature");
                AppError::BadRequest(format!("Invalid webhook signature: {e}"))
            })?;
        }
        None => tracing::warn!("STRIPE_WEBHOOK_SECRET not set, accepting unverified webhook"),
    }

    let event = parse_event(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    tracing::info!(event_id = %event.id, event_type = %event.event_type, "Stripe event received");

    let update = update_from_event(&event)
        .map_err(|e| AppError::BadRequest(format!("Malformed {} object: {e}", event.event_type)))?;
    let outcome = match update {
        Some(update) => apply_update(&state, &update).await?,
        None => Applied::default(),
    };

    Ok(Json(WebhookAck {
        received: true,
        applied: outcome.applied,
        activated: outcome.activated,
    }))
}

/// GET /api/v1/payments/stripe/confirm?session_id=
///
/// Re-reads a session after the customer returns from checkout and applies
/// the same update a `checkout.session.completed` webhook would.
pub async fn confirm(
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> AppResult<Json<ConfirmResponse>> {
    let session_id = params.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::BadRequest("session_id is required".into()));
    }

    let session = stripe(&state)?
        .retrieve_checkout_session(session_id)
        .await?;

    let (outcome, status) = match update_from_session(&session) {
        Some(update) => {
            let outcome = apply_update(&state, &update).await?;
            let status = outcome
                .applied
                .then(|| update.status.as_str().to_string());
            (outcome, status)
        }
        None => {
            let (actor, email) = session_owner(&session);
            let status = match email {
                Some(email) => SubscriptionRepo::status_for_email(&state.pool, actor, &email).await?,
                None => None,
            };
            (Applied::default(), status)
        }
    };

    Ok(Json(ConfirmResponse {
        session_id: session.id,
        payment_status: session.payment_status,
        status,
        applied: outcome.applied,
        activated: outcome.activated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_change_into_active_is_an_activation() {
        assert!(is_activation(SubscriptionStatus::Active, "inactive"));
        assert!(is_activation(SubscriptionStatus::Active, "past_due"));
        assert!(!is_activation(SubscriptionStatus::Active, "active"));
        assert!(!is_activation(SubscriptionStatus::Canceled, "active"));
    }
}
