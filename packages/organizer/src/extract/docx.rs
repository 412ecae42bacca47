//! Block extraction from DOCX files.
//!
//! Only the main document part (`word/document.xml`) is read. Paragraphs and
//! tables are emitted in body order.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use roxmltree::{Document, Node};
use zip::result::ZipError;
use zip::ZipArchive;

use super::xml::{find_by_path, find_children, get_attribute, get_tag_name, has_tag, is_toggle_on};
use crate::error::{OrganizerError, Result};
use crate::mdx::text::is_all_caps;
use crate::types::{Block, TextBlock};

/// Archive path of the main document part.
const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the block sequence of a DOCX file on disk.
pub fn extract_docx_blocks(path: &Path) -> Result<Vec<Block>> {
    let file = File::open(path)?;
    let xml = read_document_part(file, &path.display().to_string())?;
    parse_document_xml(&xml)
}

/// Extract the block sequence of an in-memory DOCX file.
pub fn extract_docx_bytes(bytes: &[u8]) -> Result<Vec<Block>> {
    let xml = read_document_part(Cursor::new(bytes), "in-memory DOCX")?;
    parse_document_xml(&xml)
}

fn read_document_part<R: Read + Seek>(reader: R, context: &str) -> Result<String> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entry = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
        ZipError::FileNotFound => OrganizerError::MissingElement {
            element: DOCUMENT_PART.to_string(),
            context: context.to_string(),
        },
        other => OrganizerError::Archive(other),
    })?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Convert the XML of `word/document.xml` into blocks.
pub fn parse_document_xml(xml: &str) -> Result<Vec<Block>> {
    let doc = Document::parse(xml)?;
    let body = doc
        .descendants()
        .find(|n| has_tag(*n, "body"))
        .ok_or_else(|| OrganizerError::MissingElement {
            element: "w:body".to_string(),
            context: DOCUMENT_PART.to_string(),
        })?;

    let mut blocks = Vec::new();
    collect_body(body, &mut blocks);
    tracing::debug!(blocks = blocks.len(), "Extracted DOCX blocks");
    Ok(blocks)
}

fn collect_body(container: Node<'_, '_>, out: &mut Vec<Block>) {
    for child in container.children().filter(Node::is_element) {
        match get_tag_name(child) {
            "p" => out.push(paragraph_block(child)),
            "tbl" => out.push(Block::table(table_grid(child))),
            // content controls wrap ordinary body content
            "sdt" => {
                if let Some(content) = find_by_path(child, "sdtContent") {
                    collect_body(content, out);
                }
            }
            _ => {}
        }
    }
}

fn paragraph_block(paragraph: Node<'_, '_>) -> Block {
    let text = paragraph_text(paragraph);
    let emphasized = !text.is_empty()
        && (is_centered(paragraph)
            || has_heading_style(paragraph)
            || all_runs_bold(paragraph)
            || is_all_caps(&text));
    Block::Text(TextBlock {
        text,
        emphasized,
        anchor: None,
    })
}

/// Paragraph text with tabs as spaces and line breaks kept, each line trimmed.
fn paragraph_text(paragraph: Node<'_, '_>) -> String {
    let mut text = String::new();
    for node in paragraph.descendants().filter(Node::is_element) {
        match get_tag_name(node) {
            "t" => text.push_str(node.text().unwrap_or_default()),
            "tab" => text.push(' '),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn is_centered(paragraph: Node<'_, '_>) -> bool {
    find_by_path(paragraph, "pPr/jc")
        .and_then(|jc| get_attribute(jc, "val"))
        .is_some_and(|val| val == "center")
}

/// Heading and title paragraph styles ("Heading1", "Ttulo2", "Title").
fn has_heading_style(paragraph: Node<'_, '_>) -> bool {
    find_by_path(paragraph, "pPr/pStyle")
        .and_then(|style| get_attribute(style, "val"))
        .is_some_and(|val| {
            let val = val.to_lowercase();
            val.starts_with("heading")
                || val.starts_with("ttulo")
                || val.starts_with("titulo")
                || val == "title"
        })
}

/// Every run that carries text is bold.
fn all_runs_bold(paragraph: Node<'_, '_>) -> bool {
    let mut text_runs = paragraph
        .descendants()
        .filter(|n| has_tag(*n, "r"))
        .filter(|run| {
            find_children(*run, "t").any(|t| !t.text().unwrap_or_default().trim().is_empty())
        })
        .peekable();

    if text_runs.peek().is_none() {
        return false;
    }
    text_runs.all(|run| find_by_path(run, "rPr/b").is_some_and(is_toggle_on))
}

fn table_grid(table: Node<'_, '_>) -> Vec<Vec<String>> {
    find_children(table, "tr")
        .map(|row| {
            find_children(row, "tc")
                .map(|cell| {
                    find_children(cell, "p")
                        .map(paragraph_text)
                        .filter(|t| !t.is_empty())
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect()
        })
        .collect()
}
