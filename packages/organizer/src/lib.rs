//! Normas Organizer - Turn Bogotá legal publications into MDX article trees.
//!
//! Publication pages from the district legal portal and DOCX decrees are
//! reduced to a flat sequence of blocks, rebuilt into their legal outline
//! (Part → Title → Chapter, or Book → Title) and written as one `.mdx` file
//! per article with an `_index.mdx` per section.
//!
//! # Example
//!
//! ```
//! use normas_organizer::outline::{build_outline, create_plan_hierarchy};
//! use normas_organizer::types::Block;
//!
//! let blocks = vec![
//!     Block::emphasized("PARTE I"),
//!     Block::emphasized("DE LAS DISPOSICIONES GENERALES"),
//!     Block::text("Artículo 1. Objeto. Este título regula..."),
//! ];
//! let document = build_outline(&blocks, &create_plan_hierarchy());
//! assert_eq!(document.nodes[0].display_name(), "DE LAS DISPOSICIONES GENERALES");
//! assert_eq!(document.article_count(), 1);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, validation and batch profiles
//! - [`types`]: Blocks, outline nodes and articles
//! - [`error`]: Error types and Result alias
//! - [`http`] / [`fetch`]: Downloading publication pages
//! - [`extract`]: HTML and DOCX block extraction, table rendering
//! - [`outline`]: Heading classification, outline builder, article partitioning
//! - [`mdx`]: Folder names, article and index documents, file writing
//! - [`pipeline`]: End-to-end runs
//! - [`scaffold`]: Numbered stubs and folders
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod mdx;
pub mod outline;
pub mod pipeline;
pub mod scaffold;
pub mod types;

// Re-export commonly used items
pub use error::{OrganizerError, Result};
pub use outline::{build_outline, DocumentFamily, HierarchyScheme};
pub use pipeline::{organize_blocks, organize_docx, organize_html, OrganizeReport};
pub use types::{Article, Block, Document, OutlineNode};
