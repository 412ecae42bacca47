//! Block extraction from HTML publication pages.
//!
//! Pages on the district portal come in two layouts: Word exports with a
//! `div.WordSection1` body, and older pages that wrap the norm in a centered
//! layout table. Both are reduced to the same flat [`Block`] sequence.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{OrganizerError, Result};
use crate::mdx::text::collapse_whitespace;
use crate::types::{Block, TextBlock};

/// Width declarations of the main content cell in layout-table pages.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTENT_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)width\s*:\s*(?:90|95|96|98|100)\s*%").expect("valid regex")
});

/// Pinpoint anchor ids are plain article numbers.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ANCHOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Elements whose content never belongs to the norm text.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "form", "input", "button", "select", "img", "iframe",
    "head", "meta", "link",
];

/// Elements that always form a text block of their own.
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "dt", "dd", "pre", "address",
];

/// Elements that start a new block when found inside a container.
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "dl", "div", "table", "section",
    "article", "center", "blockquote", "pre",
];

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| OrganizerError::InvalidSelector(css.to_string()))
}

/// Extract the block sequence of an HTML page.
///
/// # Errors
/// `MissingContent` when the page has no usable content container.
pub fn extract_html_blocks(html: &str) -> Result<Vec<Block>> {
    let document = Html::parse_document(html);
    let container = locate_main_content(&document)?;

    let mut blocks = Vec::new();
    let centered = is_centered(container);
    collect_blocks(container, centered, &mut blocks);
    tracing::debug!(blocks = blocks.len(), "Extracted HTML blocks");
    Ok(blocks)
}

/// Find the element holding the norm text.
///
/// Tried in order: `div.WordSection1`; a cell of a centered table declaring a
/// 90-100% width; a centered table with more than two rows; the first centered
/// table; `<body>`.
pub fn locate_main_content(document: &Html) -> Result<ElementRef<'_>> {
    let word_section = parse_selector("div.WordSection1")?;
    if let Some(section) = document.select(&word_section).next() {
        tracing::debug!("Main content: div.WordSection1");
        return Ok(section);
    }

    let tables = parse_selector("table")?;
    let cells = parse_selector("td")?;
    let rows = parse_selector("tr")?;
    let centered_tables: Vec<ElementRef<'_>> = document
        .select(&tables)
        .filter(|table| has_attr_value(*table, "align", "center"))
        .collect();

    for table in &centered_tables {
        let wide_cell = table.select(&cells).find(|cell| {
            let style_width = cell
                .value()
                .attr("style")
                .is_some_and(|style| CONTENT_WIDTH.is_match(style));
            let attr_width = cell.value().attr("width").is_some_and(|width| {
                matches!(width.trim(), "90%" | "95%" | "96%" | "98%" | "100%")
            });
            style_width || attr_width
        });
        if let Some(cell) = wide_cell {
            tracing::debug!("Main content: wide cell of centered table");
            return Ok(cell);
        }
    }

    if let Some(table) = centered_tables
        .iter()
        .find(|table| table.select(&rows).count() > 2)
    {
        tracing::debug!("Main content: centered table with rows");
        return Ok(*table);
    }

    if let Some(table) = centered_tables.first() {
        tracing::warn!("Main content: falling back to first centered table");
        return Ok(*table);
    }

    let body = parse_selector("body")?;
    if let Some(body) = document.select(&body).next() {
        tracing::warn!("No content container found, using <body>");
        return Ok(body);
    }

    Err(OrganizerError::MissingContent("HTML page".to_string()))
}

/// Inline content gathered between block-level elements.
#[derive(Default)]
struct InlineRun {
    text: String,
    bold: bool,
    anchor: Option<String>,
}

impl InlineRun {
    fn flush(&mut self, centered: bool, out: &mut Vec<Block>) {
        let run = std::mem::take(self);
        let text = collapse_whitespace(&run.text);
        if !text.is_empty() {
            out.push(Block::Text(TextBlock {
                text,
                emphasized: centered && run.bold,
                anchor: run.anchor,
            }));
        }
    }
}

fn collect_blocks(element: ElementRef<'_>, centered: bool, out: &mut Vec<Block>) {
    let mut inline = InlineRun::default();

    for child in element.children() {
        if let Node::Text(text) = child.value() {
            inline.text.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();

        if SKIPPED_TAGS.contains(&name) {
            continue;
        }
        if name == "br" {
            inline.text.push(' ');
            continue;
        }
        if !BLOCK_TAGS.contains(&name) && !has_block_descendant(child) {
            inline.text.push_str(&element_text(child));
            inline.bold |= is_bold(child);
            if inline.anchor.is_none() {
                inline.anchor = find_anchor(child);
            }
            continue;
        }

        inline.flush(centered, out);
        let child_centered = centered || is_centered(child);

        if name == "table" && !is_layout_table(child) {
            out.push(Block::table(table_grid(child)));
        } else if PARAGRAPH_TAGS.contains(&name) || !has_block_descendant(child) {
            let text = collapse_whitespace(&element_text(child));
            if text.is_empty() {
                continue;
            }
            let heading = matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6");
            out.push(Block::Text(TextBlock {
                text,
                emphasized: heading || (child_centered && is_bold(child)),
                anchor: find_anchor(child),
            }));
        } else {
            collect_blocks(child, child_centered, out);
        }
    }

    inline.flush(centered, out);
}

/// Text content with `<br>` turned into spaces.
fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push(' '),
            _ => {}
        }
    }
    text
}

fn has_attr_value(element: ElementRef<'_>, attr: &str, value: &str) -> bool {
    element
        .value()
        .attr(attr)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
}

fn style_declares(element: ElementRef<'_>, declarations: &[&str]) -> bool {
    element.value().attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        declarations.iter().any(|d| compact.contains(d))
    })
}

fn is_centered(element: ElementRef<'_>) -> bool {
    element.value().name() == "center"
        || has_attr_value(element, "align", "center")
        || style_declares(element, &["text-align:center"])
}

fn is_bold(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|e| {
            matches!(e.value().name(), "b" | "strong")
                || style_declares(e, &["font-weight:bold", "font-weight:700"])
        })
}

/// Id of a `span.ancla` whose id is an article number.
fn find_anchor(element: ElementRef<'_>) -> Option<String> {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "span" && e.value().classes().any(|c| c == "ancla"))
        .filter_map(|e| e.value().id())
        .find(|id| ANCHOR_ID.is_match(id))
        .map(str::to_string)
}

fn has_block_descendant(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| BLOCK_TAGS.contains(&e.value().name()))
}

/// A table used for page layout rather than data: it nests tables or
/// carries article anchors.
fn is_layout_table(table: ElementRef<'_>) -> bool {
    table
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|e| e.value().name() == "table")
        || find_anchor(table).is_some()
}

/// Rows of the table itself, nested tables excluded.
fn table_grid(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let owner = table.id();
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|a| a.value().name() == "table")
                .is_some_and(|a| a.id() == owner)
        })
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(cell_text)
                .collect()
        })
        .collect()
}

/// Cell text; separate paragraphs are kept on separate lines.
fn cell_text(cell: ElementRef<'_>) -> String {
    let paragraphs: Vec<String> = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "p")
        .map(|p| collapse_whitespace(&element_text(p)))
        .filter(|t| !t.is_empty())
        .collect();
    if paragraphs.is_empty() {
        collapse_whitespace(&element_text(cell))
    } else {
        paragraphs.join("\n")
    }
}
