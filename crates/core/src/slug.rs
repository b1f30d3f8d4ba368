//! URL slugs for published posts.

/// Maximum slug length in characters (before any collision suffix).
pub const MAX_SLUG_LEN: usize = 80;

/// Fallback when the title has no usable characters.
const EMPTY_SLUG: &str = "voz";

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Build a slug from a title: accents folded, lower-case ASCII
/// alphanumerics, runs of anything else collapsed to a single `-`.
///
/// ```
/// use mediar_core::slug::slugify;
///
/// assert_eq!(slugify("¿Qué es la Mediación Prejudicial?"), "que-es-la-mediacion-prejudicial");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_ascii_alphanumeric() {
            let dash = pending_dash && !slug.is_empty();
            if slug.len() + usize::from(dash) + 1 > MAX_SLUG_LEN {
                break;
            }
            if dash {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Pick the first free slug given the slugs already taken that share the
/// base: `base`, then `base-2`, `base-3`, ...
pub fn first_free_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.iter().any(|s| s == candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_collapses_separators() {
        assert_eq!(slugify("  Ley 26.589 — Mediación  "), "ley-26-589-mediacion");
        assert_eq!(slugify("Niñez & Familia"), "ninez-familia");
    }

    #[test]
    fn empty_titles_get_a_fallback() {
        assert_eq!(slugify("¿¡!?"), "voz");
    }

    #[test]
    fn long_titles_are_capped() {
        let title = "palabra ".repeat(40);
        let slug = slugify(&title);
        assert!(slug.len() <= MAX_SLUG_LEN, "len {}", slug.len());
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn separator_at_the_limit_does_not_overflow() {
        // 79 chars, then a word that would need a dash plus one more char.
        let title = format!("{} b", "a".repeat(MAX_SLUG_LEN - 1));
        let slug = slugify(&title);
        assert_eq!(slug, "a".repeat(MAX_SLUG_LEN - 1));

        let exact = format!("{} b", "a".repeat(MAX_SLUG_LEN - 2));
        assert_eq!(slugify(&exact).len(), MAX_SLUG_LEN);
        assert!(slugify(&exact).ends_with("-b"));
    }

    #[test]
    fn collision_suffixes_increment() {
        let taken = vec!["acuerdo".to_string(), "acuerdo-2".to_string()];
        assert_eq!(first_free_slug("acuerdo", &taken), "acuerdo-3");
        assert_eq!(first_free_slug("nuevo", &taken), "nuevo");
    }
}
