//! Subscription payments through Stripe.
//!
//! - [`client`]: checkout session creation and retrieval over the REST API.
//! - [`webhook`]: `Stripe-Signature` verification and event parsing.
//! - [`mapping`]: pure functions deriving the local subscription status from
//!   a checkout session or an event. The webhook and the post-checkout
//!   confirmation both go through [`mapping::update_from_session`], so they
//!   converge on the same status whichever arrives first.

pub mod client;
pub mod mapping;
pub mod webhook;

pub use client::{CheckoutSession, StripeClient, StripeConfig, StripeError};
pub use mapping::SubscriptionUpdate;
pub use webhook::{StripeEvent, WebhookError};
