//! MDX output: slugs, folder layout, article and index documents.

pub mod render;
pub mod text;
pub mod writer;

pub use render::{render_article, render_index, MdxRenderer, RenderPlan};
pub use text::{slugify, truncate_with_ellipsis};
pub use writer::{prepare_output_dir, write_atomic, write_plan, WriteReport};
