//! Article partitioning of content runs.
//!
//! Article *i* spans from its heading to the heading of article *i+1*, or to
//! the end of the run. Text before the first heading belongs to no article.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::scheme::ArticleHeadingMode;
use super::types::ContentRun;
use crate::config::{ARTICLE_TITLE_MAX_CHARS, SNIPPET_MAX_CHARS};
use crate::mdx::text::{collapse_whitespace, truncate_with_ellipsis};
use crate::types::Article;

/// Article heading candidate inside a flattened run. Group 1 is the number.
/// Whether a candidate starts an article depends on the text before it, see
/// [`opens_article`].
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ART[ÍI]CULO\s+(\d+[A-Z]?(?:-[A-Z\d]+)?)\s*[.:]").expect("valid regex")
});

/// Heading prefix of an article body, optional parenthetical note included.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADING_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*ART[ÍI]CULO(?:\s+\d+[A-Z]?(?:-[A-Z\d]+)?)?\s*[.:]?(?:[ \t]*\([^\n)]*\))?")
        .expect("valid regex")
});

/// First sentence: up to the first period or line break.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FIRST_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^.\n]+(?:[.\n]|$)").expect("valid regex"));

/// Start of an article within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub start: usize,
    pub number: String,
}

/// Splits content runs into articles.
#[derive(Debug, Clone, Copy)]
pub struct ArticlePartitioner {
    mode: ArticleHeadingMode,
}

impl ArticlePartitioner {
    #[must_use]
    pub fn new(mode: ArticleHeadingMode) -> Self {
        Self { mode }
    }

    /// Article starts in document order.
    #[must_use]
    pub fn boundaries(&self, run: &ContentRun) -> Vec<Boundary> {
        match self.mode {
            ArticleHeadingMode::Pattern => {
                let text = run.text();
                ARTICLE_HEADING
                    .captures_iter(text)
                    .filter_map(|caps| {
                        let heading = caps.get(0)?;
                        let number = caps.get(1)?;
                        opens_article(text, heading.start()).then(|| Boundary {
                            start: heading.start(),
                            number: number.as_str().to_string(),
                        })
                    })
                    .collect()
            }
            ArticleHeadingMode::Anchored => run
                .anchors()
                .iter()
                .map(|anchor| Boundary {
                    start: anchor.offset,
                    number: anchor.number.clone(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn has_articles(&self, run: &ContentRun) -> bool {
        !self.boundaries(run).is_empty()
    }

    /// Cut a run into articles. `context` names the enclosing node in logs.
    #[must_use]
    pub fn partition(&self, run: &ContentRun, context: &str) -> Vec<Article> {
        let text = run.text();
        let boundaries = self.boundaries(run);
        if boundaries.is_empty() && !run.is_blank() {
            tracing::debug!(context, chars = text.len(), "No article headings in content run");
        }

        let mut articles = Vec::with_capacity(boundaries.len());
        for (i, boundary) in boundaries.iter().enumerate() {
            let end = boundaries.get(i + 1).map_or(text.len(), |next| next.start);
            let span: Range<usize> = boundary.start..end;
            let body = text[span.clone()].trim();
            if body.is_empty() {
                tracing::warn!(context, number = %boundary.number, "Dropping empty article");
                continue;
            }

            let rest = HEADING_PREFIX
                .find(body)
                .map_or(body, |m| &body[m.end()..])
                .trim();
            articles.push(Article {
                number: boundary.number.clone(),
                title: article_title(&boundary.number, rest),
                description_snippet: description_snippet(rest),
                body: body.to_string(),
                span,
            });
        }
        articles
    }
}

/// A heading candidate at `start` opens an article when it begins its line
/// or follows the end of a sentence, a clause or a closing parenthesis.
fn opens_article(text: &str, start: usize) -> bool {
    let line_start = text[..start].rfind('\n').map_or(0, |pos| pos + 1);
    let before = text[line_start..start].trim_end();
    before.is_empty()
        || (before.len() < start - line_start && before.ends_with(['.', ';', ':', ')']))
}

/// First sentence of the text after the heading, or its opening characters,
/// at most 100 characters with the ellipsis.
///
/// # Examples
/// ```
/// use normas_organizer::outline::description_snippet;
///
/// assert_eq!(description_snippet("Objeto. Este acuerdo adopta el plan."), "Objeto.");
/// assert_eq!(description_snippet(""), "");
/// ```
#[must_use]
pub fn description_snippet(rest: &str) -> String {
    let rest = rest.trim();
    let sentence = FIRST_SENTENCE
        .find(rest)
        .map(|m| collapse_whitespace(m.as_str()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| collapse_whitespace(rest));
    truncate_with_ellipsis(&sentence, SNIPPET_MAX_CHARS)
}

/// Caption of an article: its first sentence without the period, falling
/// back to "Artículo N".
fn article_title(number: &str, rest: &str) -> String {
    let first_line = rest.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return format!("Artículo {number}");
    }
    if let Some(end) = first_line.find('.') {
        let caption = first_line[..end].trim();
        if !caption.is_empty() && caption.chars().count() <= ARTICLE_TITLE_MAX_CHARS {
            return caption.to_string();
        }
    }
    cut_at_word(first_line, ARTICLE_TITLE_MAX_CHARS)
}

/// Shorten to `max_chars` with "...", breaking at the last space if any.
fn cut_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    let kept = match kept.rfind(' ') {
        Some(pos) if pos > 0 => kept[..pos].trim_end().to_string(),
        _ => kept,
    };
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pattern() -> ArticlePartitioner {
        ArticlePartitioner::new(ArticleHeadingMode::Pattern)
    }

    #[test]
    fn test_headings_mid_line() {
        let run = ContentRun::from_lines(["Artículo 3. Texto A. Artículo 4. Texto B."]);
        let articles = pattern().partition(&run, "test");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].number, "3");
        assert_eq!(articles[0].body, "Artículo 3. Texto A.");
        assert_eq!(articles[1].number, "4");
        assert_eq!(articles[1].body, "Artículo 4. Texto B.");
    }

    #[test]
    fn test_back_to_back_headings() {
        let run = ContentRun::from_lines(["Artículo 3. Artículo 4. Texto B."]);
        let articles = pattern().partition(&run, "test");
        let numbers: Vec<&str> = articles.iter().map(|a| a.number.as_str()).collect();
        assert_eq!(numbers, vec!["3", "4"]);
        assert_eq!(articles[0].body, "Artículo 3.");
        assert_eq!(articles[1].body, "Artículo 4. Texto B.");
    }

    #[test]
    fn test_heading_after_closing_parenthesis() {
        let run = ContentRun::from_lines([
            "Artículo 15. (Derogado por el Acuerdo 5 de 2020) Artículo 16. Vigencia.",
        ]);
        let articles = pattern().partition(&run, "test");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].body, "Artículo 15. (Derogado por el Acuerdo 5 de 2020)");
        assert_eq!(articles[1].number, "16");
        assert_eq!(articles[1].description_snippet, "Vigencia.");
    }

    #[test]
    fn test_heading_glued_to_previous_word_is_not_a_boundary() {
        let run = ContentRun::from_lines(["Artículo 1. Objeto.Artículo 2. Texto."]);
        assert_eq!(pattern().partition(&run, "test").len(), 1);
    }

    #[test]
    fn test_reference_in_prose_is_not_a_boundary() {
        let run = ContentRun::from_lines([
            "Artículo 1. Objeto. Se aplica lo dispuesto en el artículo 4. del Decreto.",
        ]);
        let articles = pattern().partition(&run, "test");
        assert_eq!(articles.len(), 1);
    }

    #[test]
    fn test_spans_cover_run_after_first_heading() {
        let run = ContentRun::from_lines([
            "Texto introductorio.",
            "Artículo 1. Objeto. Este acuerdo adopta el plan.",
            "Parágrafo. Aplica en todo el Distrito.",
            "Artículo 2. Alcance.",
            "| A | B |",
            "Artículo 2A. Transitorio.",
        ]);
        let articles = pattern().partition(&run, "test");
        let numbers: Vec<&str> = articles.iter().map(|a| a.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "2A"]);

        let text = run.text();
        assert_eq!(articles[0].span.start, text.find("Artículo 1").unwrap());
        for pair in articles.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
        assert_eq!(articles[2].span.end, text.len());
        assert!(articles[0].body.contains("Parágrafo."));
        assert!(articles[1].body.ends_with("| A | B |"));
    }

    #[test]
    fn test_snippet_and_title() {
        let run = ContentRun::from_lines(["Artículo 1. Objeto. Este título regula..."]);
        let article = &pattern().partition(&run, "test")[0];
        assert_eq!(article.title, "Objeto");
        assert_eq!(article.description_snippet, "Objeto.");
    }

    #[test]
    fn test_long_body_without_period() {
        let body = "a".repeat(300);
        let run = ContentRun::from_lines([format!("Artículo 7. {body}").as_str()]);
        let article = &pattern().partition(&run, "test")[0];
        assert_eq!(article.description_snippet, format!("{}...", "a".repeat(97)));
        assert_eq!(article.description_snippet.chars().count(), 100);
        assert!(article.title.chars().count() <= ARTICLE_TITLE_MAX_CHARS);
    }

    #[test]
    fn test_parenthetical_belongs_to_heading() {
        let run = ContentRun::from_lines([
            "Artículo 5. (Modificado por el Acuerdo 1 de 2025) Vigencia del plan.",
        ]);
        let article = &pattern().partition(&run, "test")[0];
        assert_eq!(article.description_snippet, "Vigencia del plan.");
    }

    #[test]
    fn test_heading_only_article() {
        let run = ContentRun::from_lines(["Artículo 9."]);
        let article = &pattern().partition(&run, "test")[0];
        assert_eq!(article.title, "Artículo 9");
        assert_eq!(article.description_snippet, "");
    }

    #[test]
    fn test_anchored_mode_uses_recorded_headings() {
        let mut run = ContentRun::new();
        run.push_line("CONSIDERANDO que el artículo 3. del Decreto...");
        run.push_heading("Artículo 1. Objeto.", "1");
        run.push_line("Texto del artículo 1.");
        run.push_heading("Artículo 2. Alcance.", "2");

        let partitioner = ArticlePartitioner::new(ArticleHeadingMode::Anchored);
        let articles = partitioner.partition(&run, "test");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].body, "Artículo 1. Objeto.\nTexto del artículo 1.");
        assert_eq!(articles[1].body, "Artículo 2. Alcance.");
    }

    #[test]
    fn test_empty_span_dropped() {
        let mut run = ContentRun::new();
        run.push_heading("", "1");
        run.push_heading("Artículo 2. Alcance.", "2");

        let partitioner = ArticlePartitioner::new(ArticleHeadingMode::Anchored);
        let articles = partitioner.partition(&run, "test");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].number, "2");
    }

    #[test]
    fn test_no_headings() {
        let run = ContentRun::from_lines(["Solo texto."]);
        assert!(pattern().partition(&run, "test").is_empty());
        assert!(!pattern().has_articles(&run));
    }
}
