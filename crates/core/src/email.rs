//! Email address normalisation.
//!
//! Emails are the ownership key for every owned row, so they are stored and
//! compared in a single canonical form.

/// Trim surrounding whitespace and lower-case the address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Cheap structural check used where full validation is not available
/// (e.g. addresses pulled out of inbound mail).
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Juan.Perez@Mail.COM "), "juan.perez@mail.com");
    }

    #[test]
    fn structural_check() {
        assert!(looks_like_email("a@b.ar"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.com"));
        assert!(!looks_like_email("a b@c.com"));
        assert!(!looks_like_email("no-at-sign"));
    }
}
