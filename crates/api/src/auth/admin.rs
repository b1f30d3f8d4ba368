use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Key for the comparison MAC; only equality of the two tags matters.
const COMPARISON_KEY: &[u8] = b"mediar-admin-token";

fn tag(value: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(COMPARISON_KEY).expect("HMAC accepts any key length");
    mac.update(value);
    mac
}

/// Compare a presented admin token with the configured one in constant time.
///
/// Both sides go through the same MAC so the comparison does not leak the
/// length of the configured token either.
pub fn admin_token_matches(presented: &str, configured: &str) -> bool {
    if configured.is_empty() {
        return false;
    }
    let expected = tag(configured.as_bytes()).finalize().into_bytes();
    tag(presented.as_bytes()).verify_slice(&expected).is_ok()
}
