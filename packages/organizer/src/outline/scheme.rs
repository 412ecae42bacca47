//! Hierarchy schemes of the supported document families.

use clap::ValueEnum;
use serde::Deserialize;

use crate::types::{HeadingType, LevelKind};

/// How many lines after a marker may form the node title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleLinePolicy {
    /// The first emphasized line only.
    Single,
    /// Every following title-like line until a stop line, joined with spaces.
    UntilBody,
}

/// How article headings are recognized inside content runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleHeadingMode {
    /// Keyword, number and terminator anywhere a heading may start.
    Pattern,
    /// Only blocks carrying a pinpoint anchor.
    Anchored,
}

/// Ordered structural levels of a document family plus parsing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyScheme {
    /// Levels from the top down; the last one holds articles.
    pub levels: Vec<LevelKind>,
    /// Keyword closing the preamble ("ACUERDA", "DECRETA").
    pub divider: Option<String>,
    /// Maximum length of title slugs in folder names.
    pub slug_max_len: usize,
    pub title_lines: TitleLinePolicy,
    pub article_headings: ArticleHeadingMode,
}

impl HierarchyScheme {
    /// Create a scheme; `levels` must not be empty.
    #[must_use]
    pub fn new(levels: impl IntoIterator<Item = LevelKind>) -> Self {
        let levels: Vec<LevelKind> = levels.into_iter().collect();
        debug_assert!(!levels.is_empty(), "a hierarchy needs at least one level");
        Self {
            levels,
            divider: None,
            slug_max_len: 50,
            title_lines: TitleLinePolicy::Single,
            article_headings: ArticleHeadingMode::Pattern,
        }
    }

    #[must_use]
    pub fn with_divider(mut self, keyword: impl Into<String>) -> Self {
        self.divider = Some(keyword.into());
        self
    }

    #[must_use]
    pub fn with_slug_max_len(mut self, max_len: usize) -> Self {
        self.slug_max_len = max_len;
        self
    }

    #[must_use]
    pub fn with_title_lines(mut self, policy: TitleLinePolicy) -> Self {
        self.title_lines = policy;
        self
    }

    #[must_use]
    pub fn with_article_headings(mut self, mode: ArticleHeadingMode) -> Self {
        self.article_headings = mode;
        self
    }

    /// Depth of the level a heading opens, if it is part of this scheme.
    #[must_use]
    pub fn depth_of(&self, heading: HeadingType) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.heading_type() == heading)
    }

    /// Depth of the article-holding level.
    #[must_use]
    pub fn leaf_depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    #[must_use]
    pub fn level(&self, depth: usize) -> LevelKind {
        self.levels
            .get(depth)
            .or(self.levels.last())
            .copied()
            .unwrap_or(LevelKind::Title)
    }
}

/// Development plan agreements: PARTE → TÍTULO, body after "ACUERDA:".
#[must_use]
pub fn create_plan_hierarchy() -> HierarchyScheme {
    HierarchyScheme::new([LevelKind::Part, LevelKind::Title])
        .with_divider("ACUERDA")
        .with_slug_max_len(35)
        .with_title_lines(TitleLinePolicy::UntilBody)
}

/// Land-use plan decrees: LIBRO → TÍTULO, body after "DECRETA:".
#[must_use]
pub fn create_pot_hierarchy() -> HierarchyScheme {
    HierarchyScheme::new([LevelKind::Book, LevelKind::Title])
        .with_divider("DECRETA")
        .with_slug_max_len(50)
        .with_title_lines(TitleLinePolicy::UntilBody)
}

/// Portal HTML publications: PARTE → TÍTULO → CAPÍTULO with anchored articles.
#[must_use]
pub fn create_html_hierarchy() -> HierarchyScheme {
    HierarchyScheme::new([LevelKind::Part, LevelKind::Title, LevelKind::Chapter])
        .with_slug_max_len(60)
        .with_article_headings(ArticleHeadingMode::Anchored)
}

/// Supported document families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFamily {
    /// Development plan agreement (DOCX).
    Plan,
    /// Land-use plan decree (DOCX).
    Pot,
    /// Portal publication page (HTML).
    Html,
}

impl DocumentFamily {
    #[must_use]
    pub fn scheme(&self) -> HierarchyScheme {
        match self {
            Self::Plan => create_plan_hierarchy(),
            Self::Pot => create_pot_hierarchy(),
            Self::Html => create_html_hierarchy(),
        }
    }

    /// Name used in article descriptions when none is configured.
    #[must_use]
    pub fn default_document_name(&self) -> &'static str {
        match self {
            Self::Plan => "Acuerdo 927 de 2024",
            Self::Pot => "Decreto 555 de 2021",
            Self::Html => "Acuerdo 927",
        }
    }

    /// Output directory used when none is given.
    #[must_use]
    pub fn default_output(&self) -> &'static str {
        match self {
            Self::Plan => "acuerdo_927_de_2024_plan_de_desarrollo_mdx_output",
            Self::Pot => "pot-bogota",
            Self::Html => crate::config::DEFAULT_HTML_OUTPUT,
        }
    }
}
