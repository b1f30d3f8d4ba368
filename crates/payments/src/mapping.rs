//! Pure derivation of the local subscription status from Stripe objects.

use std::collections::HashMap;

use mediar_core::actor::ActorKind;
use mediar_core::email::{looks_like_email, normalize_email};
use mediar_core::status::SubscriptionStatus;
use serde::Deserialize;

use crate::client::CheckoutSession;
use crate::webhook::StripeEvent;

/// A status assignment to apply to one actor row.
///
/// The row is located by `email` in the `actor` table; when that finds
/// nothing (or there is no email) it falls back to `customer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    pub email: Option<String>,
    pub actor: ActorKind,
    pub status: SubscriptionStatus,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionObject {
    id: String,
    customer: Option<String>,
    status: Option<String>,
    metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionDetails {
    metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct InvoiceObject {
    customer: Option<String>,
    customer_email: Option<String>,
    subscription: Option<String>,
    subscription_details: Option<SubscriptionDetails>,
}

/// Map a Stripe subscription status onto the local value set.
pub fn map_processor_status(status: &str) -> SubscriptionStatus {
    match status {
        "active" | "trialing" => SubscriptionStatus::Active,
        "past_due" | "unpaid" => SubscriptionStatus::PastDue,
        "canceled" | "incomplete_expired" => SubscriptionStatus::Canceled,
        _ => SubscriptionStatus::Inactive,
    }
}

/// Actor kind recorded in metadata; anything unusable means mediator.
fn actor_from(metadata: Option<&HashMap<String, String>>) -> ActorKind {
    metadata
        .and_then(|m| m.get("actor"))
        .and_then(|a| a.parse::<ActorKind>().ok())
        .filter(|kind| kind.owns_cases())
        .unwrap_or(ActorKind::Mediador)
}

fn email_from(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|e| normalize_email(e))
        .find(|e| looks_like_email(e))
}

/// The actor class and email a checkout session was opened for.
///
/// The email is looked up in the session metadata, then the prefilled
/// customer email, the details the customer typed, and the client reference.
pub fn session_owner(session: &CheckoutSession) -> (ActorKind, Option<String>) {
    let metadata = session.metadata.as_ref();
    let email = email_from(&[
        metadata.and_then(|m| m.get("email")).map(String::as_str),
        session.customer_email.as_deref(),
        session
            .customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref()),
        session.client_reference_id.as_deref(),
    ]);
    (actor_from(metadata), email)
}

/// Status implied by a checkout session. Only completed payments (or
/// sessions that need none) activate; anything else yields `None`.
pub fn update_from_session(session: &CheckoutSession) -> Option<SubscriptionUpdate> {
    let paid = matches!(
        session.payment_status.as_deref(),
        Some("paid") | Some("no_payment_required")
    );
    if !paid {
        return None;
    }

    let (actor, email) = session_owner(session);
    if email.is_none() && session.customer.is_none() {
        return None;
    }

    Some(SubscriptionUpdate {
        email,
        actor,
        status: SubscriptionStatus::Active,
        customer_id: session.customer.clone(),
        subscription_id: session.subscription.clone(),
    })
}

/// Status implied by a webhook event, or `None` for events that do not
/// touch subscriptions.
pub fn update_from_event(event: &StripeEvent) -> Result<Option<SubscriptionUpdate>, serde_json::Error> {
    let object = &event.data.object;
    let update = match event.event_type.as_str() {
        "checkout.session.completed" | "checkout.session.async_payment_succeeded" => {
            let session = CheckoutSession::deserialize(object)?;
            update_from_session(&session)
        }
        "customer.subscription.created"
        | "customer.subscription.updated"
        | "customer.subscription.deleted" => {
            let sub = SubscriptionObject::deserialize(object)?;
            let status = if event.event_type == "customer.subscription.deleted" {
                SubscriptionStatus::Canceled
            } else {
                map_processor_status(sub.status.as_deref().unwrap_or_default())
            };
            let metadata = sub.metadata.as_ref();
            Some(SubscriptionUpdate {
                email: email_from(&[metadata.and_then(|m| m.get("email")).map(String::as_str)]),
                actor: actor_from(metadata),
                status,
                customer_id: sub.customer,
                subscription_id: Some(sub.id),
            })
        }
        "invoice.paid" | "invoice.payment_failed" => {
            let invoice = InvoiceObject::deserialize(object)?;
            let status = if event.event_type == "invoice.paid" {
                SubscriptionStatus::Active
            } else {
                SubscriptionStatus::PastDue
            };
            let metadata = invoice
                .subscription_details
                .as_ref()
                .and_then(|d| d.metadata.as_ref());
            Some(SubscriptionUpdate {
                email: email_from(&[
                    metadata.and_then(|m| m.get("email")).map(String::as_str),
                    invoice.customer_email.as_deref(),
                ]),
                actor: actor_from(metadata),
                status,
                customer_id: invoice.customer,
                subscription_id: invoice.subscription,
            })
        }
        _ => None,
    };

    Ok(update.filter(|u| u.email.is_some() || u.customer_id.is_some()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::webhook::parse_event;

    fn event(event_type: &str, object: serde_json::Value) -> StripeEvent {
        let body = json!({ "id": "evt_1", "type": event_type, "data": { "object": object } });
        parse_event(body.to_string().as_bytes()).unwrap()
    }

    fn session_json(payment_status: &str) -> serde_json::Value {
        json!({
            "id": "cs_1",
            "object": "checkout.session",
            "payment_status": payment_status,
            "customer": "cus_1",
            "subscription": "sub_1",
            "customer_email": null,
            "customer_details": { "email": "Juzgado@Example.com" },
            "metadata": { "email": "juzgado@example.com", "actor": "institucion" }
        })
    }

    #[test]
    fn maps_processor_statuses() {
        assert_eq!(map_processor_status("trialing"), SubscriptionStatus::Active);
        assert_eq!(map_processor_status("unpaid"), SubscriptionStatus::PastDue);
        assert_eq!(map_processor_status("incomplete_expired"), SubscriptionStatus::Canceled);
        assert_eq!(map_processor_status("incomplete"), SubscriptionStatus::Inactive);
        assert_eq!(map_processor_status("paused"), SubscriptionStatus::Inactive);
    }

    #[test]
    fn completed_checkout_activates_metadata_actor() {
        let update = update_from_event(&event("checkout.session.completed", session_json("paid")))
            .unwrap()
            .unwrap();
        assert_eq!(update.status, SubscriptionStatus::Active);
        assert_eq!(update.actor, ActorKind::Institucion);
        assert_eq!(update.email.as_deref(), Some("juzgado@example.com"));
        assert_eq!(update.customer_id.as_deref(), Some("cus_1"));
        assert_eq!(update.subscription_id.as_deref(), Some("sub_1"));
    }

    #[test]
    fn unpaid_checkout_changes_nothing() {
        let update =
            update_from_event(&event("checkout.session.completed", session_json("unpaid"))).unwrap();
        assert!(update.is_none());
    }

    #[test]
    fn webhook_and_confirm_paths_converge() {
        let object = session_json("paid");
        let from_webhook = update_from_event(&event("checkout.session.completed", object.clone()))
            .unwrap()
            .unwrap();
        let session: CheckoutSession = serde_json::from_value(object).unwrap();
        let from_confirm = update_from_session(&session).unwrap();
        assert_eq!(from_webhook, from_confirm);
    }

    #[test]
    fn session_without_metadata_defaults_to_mediador() {
        let session = CheckoutSession {
            id: "cs_2".to_string(),
            payment_status: Some("no_payment_required".to_string()),
            customer_email: Some(" Ana@Example.com ".to_string()),
            ..Default::default()
        };
        let update = update_from_session(&session).unwrap();
        assert_eq!(update.actor, ActorKind::Mediador);
        assert_eq!(update.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn subscription_events_map_status_and_fall_back_to_customer() {
        let updated = update_from_event(&event(
            "customer.subscription.updated",
            json!({ "id": "sub_9", "customer": "cus_9", "status": "past_due", "metadata": {} }),
        ))
        .unwrap()
        .unwrap();
        assert_eq!(updated.status, SubscriptionStatus::PastDue);
        assert!(updated.email.is_none());
        assert_eq!(updated.customer_id.as_deref(), Some("cus_9"));

        let deleted = update_from_event(&event(
            "customer.subscription.deleted",
            json!({ "id": "sub_9", "customer": "cus_9", "status": "active" }),
        ))
        .unwrap()
        .unwrap();
        assert_eq!(deleted.status, SubscriptionStatus::Canceled);
    }

    #[test]
    fn invoice_events() {
        let failed = update_from_event(&event(
            "invoice.payment_failed",
            json!({ "customer": "cus_3", "customer_email": "ana@example.com", "subscription": "sub_3" }),
        ))
        .unwrap()
        .unwrap();
        assert_eq!(failed.status, SubscriptionStatus::PastDue);
        assert_eq!(failed.email.as_deref(), Some("ana@example.com"));

        let paid = update_from_event(&event("invoice.paid", json!({ "customer": "cus_3" })))
            .unwrap()
            .unwrap();
        assert_eq!(paid.status, SubscriptionStatus::Active);
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let update = update_from_event(&event("charge.refunded", json!({ "id": "ch_1" }))).unwrap();
        assert!(update.is_none());
    }

    #[test]
    fn untargetable_events_are_dropped() {
        let update = update_from_event(&event("invoice.paid", json!({}))).unwrap();
        assert!(update.is_none());
    }
}
