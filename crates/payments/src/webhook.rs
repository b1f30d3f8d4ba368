//! Webhook signature verification and event parsing.
//!
//! The `Stripe-Signature` header looks like `t=<unix ts>,v1=<hex>[,v1=<hex>]`.
//! Each `v1` value is an HMAC-SHA256, keyed by the endpoint secret, over
//! `"{t}.{raw body}"`.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age (either direction) of a signed timestamp, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Malformed Stripe-Signature header")]
    MalformedHeader,

    #[error("Signature timestamp outside the {SIGNATURE_TOLERANCE_SECS}s tolerance")]
    Expired,

    #[error("No signature matches the payload")]
    SignatureMismatch,

    #[error("Invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// A webhook event envelope. `data.object` is decoded lazily by type.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

pub fn parse_event(payload: &[u8]) -> Result<StripeEvent, WebhookError> {
    Ok(serde_json::from_slice(payload)?)
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Verify a signature header against the raw request body at time `now`
/// (unix seconds). Comparison is constant-time.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MalformedHeader)?;
    let ts: i64 = timestamp.parse().map_err(|_| WebhookError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedHeader);
    }
    if (now - ts).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(WebhookError::Expired);
    }

    let matches = signatures.iter().any(|candidate| {
        let Some(expected) = hex::decode(candidate) else {
            return false;
        };
        signed_mac(secret, timestamp, payload)
            .verify_slice(&expected)
            .is_ok()
    });

    if matches {
        Ok(())
    } else {
        Err(WebhookError::SignatureMismatch)
    }
}

/// [`verify_signature`] against the current clock.
pub fn verify_signature_now(payload: &[u8], header: &str, secret: &str) -> Result<(), WebhookError> {
    verify_signature(payload, header, secret, chrono::Utc::now().timestamp())
}

/// Build a header value the way Stripe signs deliveries. Used by tests and
/// local tooling that replays events.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let ts = timestamp.to_string();
    let digest = signed_mac(secret, &ts, payload).finalize().into_bytes();
    format!("t={ts},v1={}", hex::encode(digest))
}

fn signed_mac(secret: &str, timestamp: &str, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

// ---------------------------------------------------------------------------
// Hex encoding
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or a non-hex digit.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"invoice.paid","data":{"object":{}}}"#;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn accepts_own_signature() {
        let header = sign_payload(BODY, SECRET, NOW);
        assert!(verify_signature(BODY, &header, SECRET, NOW + 10).is_ok());
    }

    #[test]
    fn accepts_any_of_several_v1_values() {
        let good = sign_payload(BODY, SECRET, NOW);
        let v1 = good.split_once(",v1=").unwrap().1;
        let header = format!("t={NOW},v1={},v1={v1}", "00".repeat(32));
        assert!(verify_signature(BODY, &header, SECRET, NOW).is_ok());
    }

    #[test]
    fn rejects_tampered_body_and_wrong_secret() {
        let header = sign_payload(BODY, SECRET, NOW);
        assert_matches!(
            verify_signature(b"{}", &header, SECRET, NOW),
            Err(WebhookError::SignatureMismatch)
        );
        assert_matches!(
            verify_signature(BODY, &header, "whsec_other", NOW),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn rejects_stale_and_future_timestamps() {
        let header = sign_payload(BODY, SECRET, NOW);
        assert_matches!(
            verify_signature(BODY, &header, SECRET, NOW + SIGNATURE_TOLERANCE_SECS + 1),
            Err(WebhookError::Expired)
        );
        assert_matches!(
            verify_signature(BODY, &header, SECRET, NOW - SIGNATURE_TOLERANCE_SECS - 1),
            Err(WebhookError::Expired)
        );
        assert!(verify_signature(BODY, &header, SECRET, NOW + SIGNATURE_TOLERANCE_SECS).is_ok());
    }

    #[test]
    fn rejects_malformed_headers() {
        let no_signature = format!("t={NOW}");
        for header in ["", "v1=abcd", "t=abc,v1=00", no_signature.as_str()] {
            assert_matches!(
                verify_signature(BODY, header, SECRET, NOW),
                Err(WebhookError::MalformedHeader),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn non_hex_signature_is_a_mismatch() {
        let header = format!("t={NOW},v1=zz");
        assert_matches!(
            verify_signature(BODY, &header, SECRET, NOW),
            Err(WebhookError::SignatureMismatch)
        );
    }

    #[test]
    fn parses_event_envelope() {
        let event = parse_event(BODY).unwrap();
        assert_eq!(event.event_type, "invoice.paid");
        assert!(parse_event(b"not json").is_err());
    }
}
