//! Rendering of an outline into folder names and MDX documents.
//!
//! Rendering is pure: it produces a [`RenderPlan`] of relative paths and file
//! contents, and the writer decides what reaches the disk. Index documents
//! are rendered from the plan after the article files were written, so a
//! failed write never leaves a dangling link.

use std::collections::HashSet;
use std::path::PathBuf;

use super::text::{slugify, truncate_with_ellipsis};
use crate::config::DESCRIPTION_MAX_CHARS;
use crate::outline::HierarchyScheme;
use crate::types::{Article, Document, NodeOrigin, OutlineNode};

/// Slug length used for article numbers in file names.
const NUMBER_SLUG_MAX_LEN: usize = 50;

/// One article file inside a leaf folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub number: String,
    pub file_name: String,
    pub snippet: String,
    pub contents: String,
}

/// A leaf folder and the article pages it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafFolder {
    /// Folder name relative to the indexed folder.
    pub name: String,
    pub display_name: String,
    pub pages: Vec<ArticlePage>,
}

/// A folder whose children are leaf folders; it receives the index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFolder {
    /// Path relative to the output root; empty for the root itself.
    pub path: PathBuf,
    /// Index heading, e.g. "Contenido de la Parte I".
    pub heading: String,
    pub leaves: Vec<LeafFolder>,
}

impl IndexedFolder {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.leaves.iter().map(|leaf| leaf.pages.len()).sum()
    }
}

/// Every folder and file of a rendered document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub folders: Vec<IndexedFolder>,
}

impl RenderPlan {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.folders.iter().map(IndexedFolder::page_count).sum()
    }
}

/// Hands out sibling names, suffixing repeats with `_2`, `_3`, ...
#[derive(Debug, Default)]
struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base}_{counter}");
            if self.taken.insert(candidate.clone()) {
                tracing::debug!(base, name = %candidate, "Disambiguated sibling name");
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Renders a [`Document`] for one hierarchy scheme.
#[derive(Debug, Clone, Copy)]
pub struct MdxRenderer<'a> {
    scheme: &'a HierarchyScheme,
    document_name: &'a str,
}

impl<'a> MdxRenderer<'a> {
    /// `document_name` appears in article descriptions ("Artículo 4 del {name}").
    #[must_use]
    pub fn new(scheme: &'a HierarchyScheme, document_name: &'a str) -> Self {
        Self {
            scheme,
            document_name,
        }
    }

    #[must_use]
    pub fn render(&self, document: &Document) -> RenderPlan {
        let mut plan = RenderPlan::default();
        let heading = format!("Contenido del {}", self.document_name);
        self.collect(&document.nodes, None, PathBuf::new(), heading, &mut plan);
        plan
    }

    /// Folder name of `node` among its siblings, before disambiguation.
    #[must_use]
    pub fn folder_name(&self, node: &OutlineNode, parent: Option<&OutlineNode>) -> String {
        let prefix = node.level.prefix();
        let max_len = self.scheme.slug_max_len;
        let title_slug = node
            .title
            .as_deref()
            .map(|title| slugify(title, max_len))
            .unwrap_or_default();

        match (node.origin, node.identifier.as_deref()) {
            (NodeOrigin::Explicit, Some(id)) => {
                let id = slugify(id, max_len);
                if title_slug.is_empty() {
                    format!("{prefix}_{id}")
                } else {
                    format!("{prefix}_{id}_{title_slug}")
                }
            }
            (NodeOrigin::Preamble, _) => {
                format!("{prefix}_{}", slugify(&node.display_name(), max_len))
            }
            _ => {
                if title_slug.is_empty() {
                    default_folder_name(prefix, parent)
                } else {
                    title_slug
                }
            }
        }
    }

    fn collect(
        &self,
        nodes: &[OutlineNode],
        parent: Option<&OutlineNode>,
        path: PathBuf,
        heading: String,
        plan: &mut RenderPlan,
    ) {
        let mut names = NameAllocator::default();
        let mut leaves = Vec::new();

        for node in nodes {
            let name = names.allocate(&self.folder_name(node, parent));
            if node.is_leaf() {
                leaves.push(LeafFolder {
                    name,
                    display_name: node.display_name(),
                    pages: self.pages(node.articles()),
                });
            } else {
                let heading = format!(
                    "Contenido {} {}",
                    node.level.genitive(),
                    node.display_name()
                );
                self.collect(node.children(), Some(node), path.join(name), heading, plan);
            }
        }

        if !leaves.is_empty() {
            plan.folders.push(IndexedFolder {
                path,
                heading,
                leaves,
            });
        }
    }

    fn pages(&self, articles: &[Article]) -> Vec<ArticlePage> {
        let mut names = NameAllocator::default();
        articles
            .iter()
            .map(|article| {
                let base = format!(
                    "articulo_{}",
                    slugify(&article.number, NUMBER_SLUG_MAX_LEN)
                );
                ArticlePage {
                    number: article.number.clone(),
                    file_name: format!("{}.mdx", names.allocate(&base)),
                    snippet: article.description_snippet.clone(),
                    contents: render_article(article, self.document_name),
                }
            })
            .collect()
    }
}

/// Fallback folder name for an implicit node with no usable title.
fn default_folder_name(prefix: &str, parent: Option<&OutlineNode>) -> String {
    let Some(parent) = parent else {
        return format!("{prefix}_predeterminado");
    };
    match parent.identifier.as_deref() {
        Some(id) => format!(
            "{prefix}_predeterminado_{}_{}",
            parent.level.prefix(),
            slugify(id, NUMBER_SLUG_MAX_LEN)
        ),
        None => format!("{prefix}_predeterminado_{}", parent.level.prefix()),
    }
}

/// Frontmatter description: "Artículo N del {document}. {snippet}".
#[must_use]
pub fn article_description(article: &Article, document_name: &str) -> String {
    let lead = if document_name.is_empty() {
        format!("Artículo {}.", article.number)
    } else {
        format!("Artículo {} del {document_name}.", article.number)
    };
    let description = format!("{lead} {}", article.description_snippet);
    truncate_with_ellipsis(description.trim(), DESCRIPTION_MAX_CHARS).replace('"', "'")
}

/// Article file contents: frontmatter, blank line, body.
#[must_use]
pub fn render_article(article: &Article, document_name: &str) -> String {
    format!(
        "---\ntitle: \"Artículo {}\"\ndescription: \"{}\"\n---\n\n{}\n",
        article.number,
        article_description(article, document_name),
        article.body
    )
}

/// Index document for a folder, or `None` when it lists no article.
#[must_use]
pub fn render_index(folder: &IndexedFolder) -> Option<String> {
    if folder.page_count() == 0 {
        return None;
    }

    let heading = folder.heading.replace('"', "'");
    let mut out = format!("---\ntitle: \"{heading}\"\n---\n\n# {}\n\n", folder.heading);
    for leaf in folder.leaves.iter().filter(|leaf| !leaf.pages.is_empty()) {
        out.push_str(&format!("## {}\n\n", leaf.display_name));
        for page in &leaf.pages {
            let label = if page.snippet.is_empty() {
                format!("Artículo {}", page.number)
            } else {
                page.snippet.clone()
            };
            out.push_str(&format!(
                "- [Artículo {}: {label}]({}/{})\n",
                page.number, leaf.name, page.file_name
            ));
        }
        out.push('\n');
    }
    Some(out)
}
