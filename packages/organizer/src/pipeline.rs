//! End-to-end runs: source to blocks, blocks to outline, outline to files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DocumentProfile, DocumentSource};
use crate::error::{OrganizerError, Result};
use crate::extract::{extract_docx_blocks, extract_html_blocks, render_table};
use crate::fetch::fetch_document;
use crate::http::create_client;
use crate::mdx::{prepare_output_dir, write_atomic, write_plan, MdxRenderer, WriteReport};
use crate::outline::{build_outline, DocumentFamily, HierarchyScheme};
use crate::types::Block;

/// Outcome of organizing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeReport {
    pub output: PathBuf,
    /// Blocks fed to the outline builder.
    pub blocks: usize,
    /// Top-level outline nodes.
    pub top_level_nodes: usize,
    pub articles_found: usize,
    pub write: WriteReport,
}

/// Outcome of flattening a publication into one Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenReport {
    pub output: PathBuf,
    pub paragraphs: usize,
    pub tables: usize,
}

/// Blocks after the block that ends with the scheme's divider keyword.
///
/// Without a divider keyword, or when no block carries it, every block is
/// kept.
#[must_use]
pub fn select_content_region<'b>(blocks: &'b [Block], scheme: &HierarchyScheme) -> &'b [Block] {
    let Some(keyword) = scheme.divider.as_deref() else {
        return blocks;
    };

    let divider = blocks.iter().position(|block| {
        block
            .as_text()
            .is_some_and(|text| ends_with_keyword(&text.text, keyword))
    });
    match divider {
        Some(index) => {
            tracing::info!(keyword, block = index, "Found section divider");
            &blocks[index + 1..]
        }
        None => {
            tracing::warn!(keyword, "Section divider not found, processing entire document");
            blocks
        }
    }
}

/// "... ACUERDA:" style line ending.
fn ends_with_keyword(text: &str, keyword: &str) -> bool {
    let line = text.trim_end().trim_end_matches(':').trim_end().to_uppercase();
    line.strip_suffix(&keyword.to_uppercase())
        .is_some_and(|head| !head.ends_with(char::is_alphanumeric))
}

/// Organize an extracted block sequence into `output`, replacing whatever
/// the directory held.
///
/// # Errors
/// `MissingContent` when no article heading is found; `output` is left as it
/// was.
pub fn organize_blocks(
    blocks: &[Block],
    scheme: &HierarchyScheme,
    output: &Path,
    document_name: &str,
) -> Result<OrganizeReport> {
    let region = select_content_region(blocks, scheme);
    let document = build_outline(region, scheme);
    if document.article_count() == 0 {
        tracing::warn!(
            blocks = region.len(),
            output = %output.display(),
            "No articles found, leaving output untouched"
        );
        return Err(OrganizerError::MissingContent(format!(
            "{document_name} (no article headings in {} blocks)",
            region.len()
        )));
    }

    let plan = MdxRenderer::new(scheme, document_name).render(&document);

    prepare_output_dir(output)?;
    let write = write_plan(&plan, output)?;
    tracing::info!(
        output = %output.display(),
        articles = write.articles_written,
        skipped = write.articles_skipped,
        "Organized document"
    );

    Ok(OrganizeReport {
        output: output.to_path_buf(),
        blocks: region.len(),
        top_level_nodes: document.nodes.len(),
        articles_found: document.article_count(),
        write,
    })
}

/// Organize an HTML publication already in memory.
pub fn organize_html_str(html: &str, output: &Path, document_name: &str) -> Result<OrganizeReport> {
    let blocks = extract_html_blocks(html)?;
    organize_blocks(&blocks, &DocumentFamily::Html.scheme(), output, document_name)
}

/// Fetch and organize a portal publication.
///
/// Nothing under `output` is touched when the fetch or the extraction fails.
pub fn organize_html(url: &str, output: &Path, document_name: &str) -> Result<OrganizeReport> {
    let client = create_client()?;
    let html = fetch_document(&client, url)?;
    organize_html_str(&html, output, document_name)
}

/// Organize a DOCX decree of the given family.
pub fn organize_docx(
    path: &Path,
    family: DocumentFamily,
    output: &Path,
    document_name: &str,
) -> Result<OrganizeReport> {
    let blocks = extract_docx_blocks(path)?;
    organize_blocks(&blocks, &family.scheme(), output, document_name)
}

/// Organize one document of a batch profile.
pub fn organize_profile_document(document: &DocumentProfile) -> Result<OrganizeReport> {
    let name = document.document_name();
    match document.source()? {
        DocumentSource::Url(url) => {
            let client = create_client()?;
            let html = fetch_document(&client, &url)?;
            let blocks = extract_html_blocks(&html)?;
            organize_blocks(&blocks, &document.family.scheme(), &document.output, &name)
        }
        DocumentSource::Docx(path) => {
            let blocks = extract_docx_blocks(&path)?;
            organize_blocks(&blocks, &document.family.scheme(), &document.output, &name)
        }
    }
}

/// Whole publication as Markdown: paragraphs and tables between blank lines.
#[must_use]
pub fn flatten_blocks(blocks: &[Block]) -> String {
    let parts: Vec<String> = blocks
        .iter()
        .filter_map(|block| match block {
            Block::Text(text) => {
                let text = text.text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Block::Table(table) => Some(render_table(&table.rows).trim_end().to_string()),
        })
        .collect();

    if parts.is_empty() {
        return String::new();
    }
    format!("{}\n", parts.join("\n\n"))
}

/// Fetch a publication and write it as one Markdown file.
pub fn flatten_html(url: &str, output_file: &Path) -> Result<FlattenReport> {
    let client = create_client()?;
    let html = fetch_document(&client, url)?;
    flatten_html_str(&html, output_file)
}

/// Write an in-memory publication as one Markdown file.
pub fn flatten_html_str(html: &str, output_file: &Path) -> Result<FlattenReport> {
    let blocks = extract_html_blocks(html)?;
    let markdown = flatten_blocks(&blocks);

    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_atomic(output_file, &markdown)?;

    let tables = blocks
        .iter()
        .filter(|block| matches!(block, Block::Table(_)))
        .count();
    Ok(FlattenReport {
        output: output_file.to_path_buf(),
        paragraphs: blocks.len() - tables,
        tables,
    })
}
