//! Placeholder files and folders for hand-edited document trees.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::validate_range;
use crate::error::Result;
use crate::mdx::write_atomic;

/// Description suffix of article stubs when none is given.
pub const DEFAULT_STUB_DESCRIPTION: &str = "de la Constitución Política de Colombia";

/// Create `{series}_{n}.mdx` stubs for `first..=last` in `dir`.
///
/// Returns the page list: each file path without its extension, in order.
pub fn create_article_stubs(
    dir: &Path,
    first: u32,
    last: u32,
    series: &str,
    description: &str,
) -> Result<Vec<String>> {
    validate_range(first, last)?;
    fs::create_dir_all(dir)?;

    let mut pages = Vec::new();
    for number in first..=last {
        let stem = dir.join(format!("{series}_{number}"));
        let contents = format!(
            "---\ntitle: \"Artículo {number}\"\ndescription: \"Artículo {number} {}\"\n---\n",
            description.replace('"', "'")
        );
        write_atomic(&stem.with_extension("mdx"), &contents)?;
        pages.push(stem.display().to_string());
    }

    tracing::info!(dir = %dir.display(), count = pages.len(), "Created article stubs");
    Ok(pages)
}

/// Page list as a JSON array.
pub fn pages_json(pages: &[String]) -> Result<String> {
    Ok(serde_json::to_string(pages)?)
}

/// Create `{series}_{n}` folders for `first..=last` in `dir`.
pub fn create_numbered_folders(
    dir: &Path,
    first: u32,
    last: u32,
    series: &str,
) -> Result<Vec<PathBuf>> {
    validate_range(first, last)?;

    let mut folders = Vec::new();
    for number in first..=last {
        let folder = dir.join(format!("{series}_{number}"));
        fs::create_dir_all(&folder)?;
        folders.push(folder);
    }
    Ok(folders)
}
