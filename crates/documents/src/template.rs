//! Bracketed placeholder substitution.
//!
//! A placeholder is an upper-case token such as `[NOMBRE_MEDIADOR]`. Word
//! frequently splits a token across several runs, so matching is done on the
//! concatenated text of each paragraph. A paragraph that changes has its
//! whole text written into its first run and its other runs blanked;
//! paragraphs without a filled token are left untouched.
//!
//! Substitution is single-pass: text inside a supplied value that looks like
//! a placeholder is never expanded.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::DocumentError;
use crate::package::DocxPackage;
use crate::xml::{paragraph_text, paragraphs, rewrite_paragraph_text, PARAGRAPH_RE};

/// Group 1 is the token name without brackets.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Z][A-Z0-9_]*)\]").expect("valid regex"));

/// Token name for a field key: `nombre_mediador`, `Nombre mediador` and
/// `[NOMBRE_MEDIADOR]` all become `NOMBRE_MEDIADOR`.
pub fn token_name(field: &str) -> String {
    let trimmed = field.trim().trim_start_matches('[').trim_end_matches(']');
    let mut name = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_uppercase());
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    name.trim_matches('_').to_string()
}

/// Build the value map from free-form field keys. Blank keys are dropped.
pub fn values_from_fields<'a>(
    fields: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> HashMap<String, String> {
    fields
        .into_iter()
        .map(|(k, v)| (token_name(k), v.clone()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Tokens (with brackets) present in a text.
fn tokens_in(text: &str) -> impl Iterator<Item = String> + '_ {
    TOKEN_RE.captures_iter(text).map(|c| c[0].to_string())
}

/// Every placeholder in the body, headers, and footers, sorted.
pub fn placeholders(package: &DocxPackage) -> Result<BTreeSet<String>, DocumentError> {
    let mut found = BTreeSet::new();
    for name in package.text_part_names() {
        for text in paragraphs(package.xml_part(&name)?) {
            found.extend(tokens_in(&text));
        }
    }
    Ok(found)
}

/// Fill one XML part.
pub fn fill_part(xml: &str, values: &HashMap<String, String>) -> String {
    PARAGRAPH_RE
        .replace_all(xml, |caps: &Captures| {
            let paragraph = &caps[0];
            let text = paragraph_text(paragraph);
            let filled = TOKEN_RE.replace_all(&text, |t: &Captures| match values.get(&t[1]) {
                Some(value) => value.clone(),
                None => t[0].to_string(),
            });
            if filled == text {
                paragraph.to_string()
            } else {
                rewrite_paragraph_text(paragraph, &filled)
            }
        })
        .into_owned()
}

/// Fill every text part of the package. Returns the placeholders that had
/// no value, sorted; those are left in the document as-is.
pub fn fill_package(
    package: &mut DocxPackage,
    values: &HashMap<String, String>,
) -> Result<Vec<String>, DocumentError> {
    let missing = placeholders(package)?
        .into_iter()
        .filter(|token| !values.contains_key(token.trim_matches(|c| c == '[' || c == ']')))
        .collect();

    for name in package.text_part_names() {
        let filled = fill_part(package.xml_part(&name)?, values);
        package.set_part(&name, filled.into_bytes());
    }
    Ok(missing)
}
