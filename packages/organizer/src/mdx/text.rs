//! Text helpers shared by the extractors, the outline builder and the renderer.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex for slug generation - matches non-word characters.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Regex for slug generation - matches whitespace and dashes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SLUG_SPACE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Generate a filesystem-safe slug of at most `max_len` characters.
///
/// Accents are folded to ASCII, punctuation dropped and runs of spaces or
/// dashes collapsed to a single underscore.
///
/// # Examples
/// ```
/// use normas_organizer::mdx::slugify;
///
/// assert_eq!(slugify("Disposiciones Generales", 50), "disposiciones_generales");
/// assert_eq!(slugify("Visión de ciudad: Bogotá 2036", 50), "vision_de_ciudad_bogota_2036");
/// assert_eq!(slugify("20-1", 50), "20_1");
/// assert_eq!(slugify("Ordenamiento territorial", 12), "ordenamiento");
/// ```
#[must_use]
pub fn slugify(value: &str, max_len: usize) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let text = ascii.to_lowercase();
    let text = SLUG_NON_WORD.replace_all(&text, "");
    let text = SLUG_SPACE_DASH.replace_all(&text, "_");
    let slug: String = text.trim_matches('_').chars().take(max_len).collect();
    slug.trim_end_matches('_').to_string()
}

/// Cut `text` to `max_chars` characters, ending in "..." when shortened.
///
/// # Examples
/// ```
/// use normas_organizer::mdx::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("corto", 10), "corto");
/// assert_eq!(truncate_with_ellipsis("abcdefghijkl", 10), "abcdefg...");
/// ```
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Collapse every whitespace run (NBSP included) to one space and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the text has at least one letter and no lowercase letters.
#[must_use]
pub fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_folds_accents_and_punctuation() {
        assert_eq!(slugify("Título Único", 50), "titulo_unico");
        assert_eq!(slugify("  ¿Qué?  ", 50), "que");
        assert_eq!(slugify("15A", 50), "15a");
        assert_eq!(slugify("---", 50), "");
    }

    #[test]
    fn test_slugify_truncation_does_not_leave_trailing_underscore() {
        assert_eq!(slugify("plan de desarrollo", 8), "plan_de");
    }

    #[test]
    fn test_truncate_with_ellipsis_counts_characters() {
        let text = "á".repeat(120);
        let cut = truncate_with_ellipsis(&text, 100);
        assert_eq!(cut.chars().count(), 100);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\u{a0}\u{a0}b \n\t c "), "a b c");
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("DISPOSICIONES GENERALES"));
        assert!(is_all_caps("TÍTULO 1"));
        assert!(!is_all_caps("Disposiciones"));
        assert!(!is_all_caps("123"));
    }
}
