//! Heading classification of single blocks.
//!
//! Structural markers (PARTE, LIBRO, TÍTULO, CAPÍTULO) count only when the
//! block is emphasized or when it is an all-caps line holding nothing but the
//! marker. Body text quoting "el Título II" never opens a node.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::scheme::{ArticleHeadingMode, HierarchyScheme};
use crate::mdx::text::is_all_caps;
use crate::types::{Block, HeadingSignal, HeadingType};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PART_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?i:PARTE)\s+([IVXLCDM]+)\b").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BOOK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?i:LIBRO)\s+([IVXLCDM]+)\b").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:T[ÍI]TULO)\s+([IVXLCDM]+|\d+)\b").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHAPTER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:CAP[ÍI]TULO)\s+([IVXLCDM]+|\d+|(?i:[ÚU]NICO))\b").expect("valid regex")
});

/// Article heading at the start of a block: keyword, number, terminator.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_AT_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*ART[ÍI]CULO\s+(\d+[A-Z]?(?:-[A-Z\d]+)?)\s*[.:]").expect("valid regex")
});

/// Article keyword and number without a terminator, for anchored headings.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ANCHORED_ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*ART[ÍI]CULO\b(?:\s+(\d+[A-Z]?(?:-[A-Z\d]+)?))?").expect("valid regex")
});

/// A well-formed roman numeral, up to 3999. Matches the empty string too.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROMAN_NUMERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})$")
        .expect("valid regex")
});

/// Structural markers in precedence order.
static MARKERS: [(HeadingType, &LazyLock<Regex>); 4] = [
    (HeadingType::Part, &PART_MARKER),
    (HeadingType::Book, &BOOK_MARKER),
    (HeadingType::Title, &TITLE_MARKER),
    (HeadingType::Chapter, &CHAPTER_MARKER),
];

/// Stateless classifier; one instance per scheme.
#[derive(Debug, Clone, Copy)]
pub struct HeadingClassifier {
    article_headings: ArticleHeadingMode,
}

impl HeadingClassifier {
    #[must_use]
    pub fn new(article_headings: ArticleHeadingMode) -> Self {
        Self { article_headings }
    }

    #[must_use]
    pub fn for_scheme(scheme: &HierarchyScheme) -> Self {
        Self::new(scheme.article_headings)
    }

    /// Classify one block. Tables are never headings.
    #[must_use]
    pub fn classify(&self, block: &Block) -> HeadingSignal {
        let Some(text_block) = block.as_text() else {
            return HeadingSignal::none();
        };
        let text = text_block.text.as_str();

        for (kind, pattern) in MARKERS.iter() {
            if let Some(caps) = marker_captures(pattern, text) {
                let raw = caps.get(0).map_or("", |m| m.as_str());
                let gated = text_block.emphasized || is_isolated_marker(text, raw);
                if !gated {
                    return HeadingSignal::none();
                }
                return HeadingSignal {
                    kind: *kind,
                    identifier: caps.get(1).map_or("", |m| m.as_str()).to_uppercase(),
                    raw_text: raw.to_string(),
                };
            }
        }

        match self.article_headings {
            ArticleHeadingMode::Pattern => ARTICLE_AT_START
                .captures(text)
                .map_or_else(HeadingSignal::none, |caps| HeadingSignal {
                    kind: HeadingType::Article,
                    identifier: caps.get(1).map_or("", |m| m.as_str()).to_string(),
                    raw_text: caps.get(0).map_or("", |m| m.as_str()).to_string(),
                }),
            ArticleHeadingMode::Anchored => {
                let (Some(anchor), Some(caps)) =
                    (text_block.anchor.as_deref(), ANCHORED_ARTICLE.captures(text))
                else {
                    return HeadingSignal::none();
                };
                let identifier = caps.get(1).map_or(anchor, |m| m.as_str()).to_string();
                HeadingSignal {
                    kind: HeadingType::Article,
                    identifier,
                    raw_text: caps.get(0).map_or("", |m| m.as_str()).to_string(),
                }
            }
        }
    }
}

/// Marker match whose numeral is arabic, "ÚNICO" or a valid roman numeral,
/// so "TÍTULO CIVIL" is not read as a title numbered CIVIL.
fn marker_captures<'t>(pattern: &Regex, text: &'t str) -> Option<Captures<'t>> {
    let caps = pattern.captures(text)?;
    let numeral = caps.get(1)?.as_str();
    is_valid_numeral(numeral).then_some(caps)
}

fn is_valid_numeral(numeral: &str) -> bool {
    if numeral.is_empty() {
        return false;
    }
    if numeral.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    matches!(numeral.to_uppercase().as_str(), "ÚNICO" | "UNICO") || ROMAN_NUMERAL.is_match(numeral)
}

/// An all-caps line with nothing after the marker but a terminator.
fn is_isolated_marker(text: &str, raw: &str) -> bool {
    let rest = text[raw.len()..].trim();
    let rest = rest.trim_start_matches(['.', ':']).trim();
    rest.is_empty() && is_all_caps(text)
}

/// Text following the marker, without separators ("TÍTULO II. DEL SUELO" → "DEL SUELO").
#[must_use]
pub fn marker_remainder(text: &str, signal: &HeadingSignal) -> Option<String> {
    let rest = text.get(signal.raw_text.len()..)?;
    let rest = rest
        .trim()
        .trim_start_matches(['.', ':', '-', '–', '—', ','])
        .trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Whether a line would end title capture: any marker or article heading,
/// regardless of emphasis.
#[must_use]
pub fn is_stop_line(text: &str) -> bool {
    MARKERS
        .iter()
        .any(|(_, pattern)| marker_captures(pattern, text).is_some())
        || ARTICLE_AT_START.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(block: Block) -> HeadingSignal {
        HeadingClassifier::new(ArticleHeadingMode::Pattern).classify(&block)
    }

    #[test]
    fn test_emphasized_markers() {
        let signal = classify(Block::emphasized("PARTE IV"));
        assert_eq!(signal.kind, HeadingType::Part);
        assert_eq!(signal.identifier, "IV");

        let signal = classify(Block::emphasized("Libro II"));
        assert_eq!(signal.kind, HeadingType::Book);

        let signal = classify(Block::emphasized("TÍTULO 3"));
        assert_eq!(signal.kind, HeadingType::Title);
        assert_eq!(signal.identifier, "3");

        let signal = classify(Block::emphasized("CAPÍTULO ÚNICO"));
        assert_eq!(signal.kind, HeadingType::Chapter);
        assert_eq!(signal.identifier, "ÚNICO");

        let signal = classify(Block::emphasized("Capitulo unico"));
        assert_eq!(signal.kind, HeadingType::Chapter);
        assert_eq!(signal.identifier, "UNICO");
    }

    #[test]
    fn test_plain_body_mention_is_not_a_heading() {
        let signal = classify(Block::text("Título II de este Acuerdo regula la movilidad."));
        assert_eq!(signal.kind, HeadingType::None);
    }

    #[test]
    fn test_isolated_all_caps_marker_without_emphasis() {
        let signal = classify(Block::text("TÍTULO II"));
        assert_eq!(signal.kind, HeadingType::Title);
        assert_eq!(signal.identifier, "II");

        let signal = classify(Block::text("PARTE I."));
        assert_eq!(signal.kind, HeadingType::Part);

        // remainder text makes it prose unless emphasized
        let signal = classify(Block::text("TÍTULO II DEL SUELO"));
        assert_eq!(signal.kind, HeadingType::None);
    }

    #[test]
    fn test_numeral_must_end_at_word_boundary() {
        assert_eq!(classify(Block::emphasized("PARTE DE LA CIUDAD")).kind, HeadingType::None);
        assert_eq!(classify(Block::emphasized("TÍTULOS VALORES")).kind, HeadingType::None);
    }

    #[test]
    fn test_words_made_of_numeral_letters_are_not_numerals() {
        assert_eq!(classify(Block::emphasized("TÍTULO CIVIL")).kind, HeadingType::None);
        assert_eq!(classify(Block::emphasized("PARTE MIXDC")).kind, HeadingType::None);
        assert!(!is_stop_line("TÍTULO CIVIL"));

        let signal = classify(Block::emphasized("TÍTULO XLIV"));
        assert_eq!(signal.kind, HeadingType::Title);
        assert_eq!(signal.identifier, "XLIV");
        assert_eq!(classify(Block::emphasized("LIBRO MCMXC")).identifier, "MCMXC");
    }

    #[test]
    fn test_article_heading_pattern_mode() {
        let signal = classify(Block::text("Artículo 15A. Vigencia."));
        assert_eq!(signal.kind, HeadingType::Article);
        assert_eq!(signal.identifier, "15A");

        let signal = classify(Block::text("ARTICULO 20-1: Ajustes."));
        assert_eq!(signal.identifier, "20-1");

        assert_eq!(classify(Block::text("Artículo sin número.")).kind, HeadingType::None);
    }

    #[test]
    fn test_article_heading_requires_anchor_in_anchored_mode() {
        let classifier = HeadingClassifier::new(ArticleHeadingMode::Anchored);

        let signal = classifier.classify(&Block::text("Artículo 5. Alcance."));
        assert_eq!(signal.kind, HeadingType::None);

        let signal = classifier.classify(&Block::anchored("Artículo 5. Alcance.", "5"));
        assert_eq!(signal.kind, HeadingType::Article);
        assert_eq!(signal.identifier, "5");

        let signal = classifier.classify(&Block::anchored("ARTÍCULO. Transitorio", "321"));
        assert_eq!(signal.identifier, "321");
    }

    #[test]
    fn test_tables_are_never_headings() {
        let table = Block::table(vec![vec!["PARTE I".to_string()]]);
        assert!(!classify(table).is_heading());
    }

    #[test]
    fn test_marker_remainder() {
        let text = "TÍTULO II. DEL ORDENAMIENTO";
        let signal = classify(Block::emphasized(text));
        assert_eq!(marker_remainder(text, &signal).as_deref(), Some("DEL ORDENAMIENTO"));

        let signal = classify(Block::emphasized("PARTE I"));
        assert_eq!(marker_remainder("PARTE I", &signal), None);
    }

    #[test]
    fn test_stop_lines() {
        assert!(is_stop_line("CAPÍTULO 1"));
        assert!(is_stop_line("Artículo 4. Texto"));
        assert!(!is_stop_line("DISPOSICIONES GENERALES"));
    }
}
