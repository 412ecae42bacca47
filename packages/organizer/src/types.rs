//! Core data types for the organizer.
//!
//! A source document becomes a flat sequence of [`Block`]s, which the outline
//! builder turns into a [`Document`]: a forest of [`OutlineNode`]s whose
//! leaves hold [`Article`]s.

use std::ops::Range;

/// One structural unit of a source document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph-like run of text.
    Text(TextBlock),
    /// A table as a grid of cell texts.
    Table(TableBlock),
}

/// Text block with its formatting signals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBlock {
    pub text: String,
    /// Visually emphasized (centered and bold, or styled as a heading).
    pub emphasized: bool,
    /// Pinpoint anchor id carried by article headings in HTML publications.
    pub anchor: Option<String>,
}

/// Table block: rows of cell texts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableBlock {
    pub rows: Vec<Vec<String>>,
}

impl Block {
    /// Plain, non-emphasized text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextBlock {
            text: text.into(),
            ..TextBlock::default()
        })
    }

    /// Emphasized text block.
    pub fn emphasized(text: impl Into<String>) -> Self {
        Self::Text(TextBlock {
            text: text.into(),
            emphasized: true,
            anchor: None,
        })
    }

    /// Text block carrying a pinpoint anchor.
    pub fn anchored(text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self::Text(TextBlock {
            text: text.into(),
            emphasized: false,
            anchor: Some(anchor.into()),
        })
    }

    /// Table block from rows of cells.
    pub fn table(rows: Vec<Vec<String>>) -> Self {
        Self::Table(TableBlock { rows })
    }

    /// Text of a text block, `None` for tables.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Self::Text(text) => Some(text),
            Self::Table(_) => None,
        }
    }
}

/// Outcome of heading classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingType {
    Part,
    Book,
    Title,
    Chapter,
    Article,
    None,
}

/// A classified block: what kind of heading it is and its numeral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSignal {
    pub kind: HeadingType,
    /// Roman or arabic numeral, "ÚNICO", or the article number.
    pub identifier: String,
    /// The matched heading text.
    pub raw_text: String,
}

impl HeadingSignal {
    /// Signal for a block that is not a heading.
    #[must_use]
    pub fn none() -> Self {
        Self {
            kind: HeadingType::None,
            identifier: String::new(),
            raw_text: String::new(),
        }
    }

    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.kind != HeadingType::None
    }
}

/// Structural levels a hierarchy can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    Part,
    Book,
    Title,
    Chapter,
}

impl LevelKind {
    /// Folder name prefix.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Part => "parte",
            Self::Book => "libro",
            Self::Title => "titulo",
            Self::Chapter => "capitulo",
        }
    }

    /// Human readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Part => "Parte",
            Self::Book => "Libro",
            Self::Title => "Título",
            Self::Chapter => "Capítulo",
        }
    }

    /// "de la" / "del" contraction used in index titles.
    #[must_use]
    pub fn genitive(&self) -> &'static str {
        match self {
            Self::Part => "de la",
            Self::Book | Self::Title | Self::Chapter => "del",
        }
    }

    #[must_use]
    pub fn heading_type(&self) -> HeadingType {
        match self {
            Self::Part => HeadingType::Part,
            Self::Book => HeadingType::Book,
            Self::Title => HeadingType::Title,
            Self::Chapter => HeadingType::Chapter,
        }
    }
}

/// How a node came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrigin {
    /// Opened by a marker in the source.
    Explicit,
    /// Holds articles that precede every top-level marker.
    Preamble,
    /// Holds articles that precede the first explicit child of its parent.
    DirectSection,
    /// Stands in for a level the source skipped.
    Default,
}

/// What a node contains. A node has children or articles, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    Children(Vec<OutlineNode>),
    Articles(Vec<Article>),
}

/// A structural node of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub level: LevelKind,
    /// Numeral from the marker; absent for implicit nodes.
    pub identifier: Option<String>,
    /// Captured title line(s), or the derived name of an implicit node.
    pub title: Option<String>,
    pub origin: NodeOrigin,
    pub content: NodeContent,
}

impl OutlineNode {
    /// Name shown in indexes: the title, or "Parte IV" style fallback.
    #[must_use]
    pub fn display_name(&self) -> String {
        display_name(self.level, self.title.as_deref(), self.identifier.as_deref())
    }

    /// Child nodes, empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[OutlineNode] {
        match &self.content {
            NodeContent::Children(children) => children,
            NodeContent::Articles(_) => &[],
        }
    }

    /// Articles, empty for inner nodes.
    #[must_use]
    pub fn articles(&self) -> &[Article] {
        match &self.content {
            NodeContent::Children(_) => &[],
            NodeContent::Articles(articles) => articles,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, NodeContent::Articles(_))
    }

    /// Number of articles in this subtree.
    #[must_use]
    pub fn article_count(&self) -> usize {
        match &self.content {
            NodeContent::Children(children) => children.iter().map(Self::article_count).sum(),
            NodeContent::Articles(articles) => articles.len(),
        }
    }

    /// Depth of the leaves below this node (1 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        match &self.content {
            NodeContent::Children(children) => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
            NodeContent::Articles(_) => 1,
        }
    }
}

/// Title of a node, or "{Level} {identifier}" when no title line was found.
pub(crate) fn display_name(level: LevelKind, title: Option<&str>, identifier: Option<&str>) -> String {
    match (title, identifier) {
        (Some(title), _) => title.to_string(),
        (None, Some(id)) => format!("{} {id}", level.label()),
        (None, None) => level.label().to_string(),
    }
}

/// One article carved out of a content run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Article number as written ("15", "15A", "20-1").
    pub number: String,
    /// Caption from the heading line, or "Artículo N".
    pub title: String,
    /// Short summary, at most 100 characters.
    pub description_snippet: String,
    /// Full article text, heading included, trimmed.
    pub body: String,
    /// Byte range of the untrimmed article within its content run.
    pub span: Range<usize>,
}

/// The organized form of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub nodes: Vec<OutlineNode>,
}

impl Document {
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.nodes.iter().map(OutlineNode::article_count).sum()
    }

    /// All articles in document order.
    #[must_use]
    pub fn articles(&self) -> Vec<&Article> {
        fn collect<'a>(node: &'a OutlineNode, out: &mut Vec<&'a Article>) {
            match &node.content {
                NodeContent::Children(children) => {
                    for child in children {
                        collect(child, out);
                    }
                }
                NodeContent::Articles(articles) => out.extend(articles.iter()),
            }
        }

        let mut out = Vec::new();
        for node in &self.nodes {
            collect(node, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(title: &str, articles: usize) -> OutlineNode {
        OutlineNode {
            level: LevelKind::Title,
            identifier: None,
            title: Some(title.to_string()),
            origin: NodeOrigin::Default,
            content: NodeContent::Articles(
                (0..articles)
                    .map(|i| Article {
                        number: (i + 1).to_string(),
                        title: format!("Artículo {}", i + 1),
                        description_snippet: String::new(),
                        body: format!("Artículo {}.", i + 1),
                        span: 0..0,
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut node = leaf("Disposiciones", 0);
        assert_eq!(node.display_name(), "Disposiciones");

        node.title = None;
        node.identifier = Some("IV".to_string());
        assert_eq!(node.display_name(), "Título IV");
    }

    #[test]
    fn test_article_count_and_depth() {
        let part = OutlineNode {
            level: LevelKind::Part,
            identifier: Some("I".to_string()),
            title: None,
            origin: NodeOrigin::Explicit,
            content: NodeContent::Children(vec![leaf("a", 2), leaf("b", 3)]),
        };
        assert_eq!(part.article_count(), 5);
        assert_eq!(part.depth(), 2);
        assert!(!part.is_leaf());
        assert!(part.articles().is_empty());

        let document = Document { nodes: vec![part] };
        let numbers: Vec<&str> = document.articles().iter().map(|a| a.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "1", "2", "3"]);
    }
}
