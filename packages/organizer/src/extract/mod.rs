//! Block extraction: source documents to a flat [`Block`](crate::types::Block) sequence.
//!
//! - [`html`]: publication pages from the legal portal
//! - [`docx`]: Word decrees
//! - [`table`]: Markdown rendering of table blocks

pub mod docx;
pub mod html;
pub mod table;
pub mod xml;

pub use docx::{extract_docx_blocks, extract_docx_bytes};
pub use html::extract_html_blocks;
pub use table::render_table;
