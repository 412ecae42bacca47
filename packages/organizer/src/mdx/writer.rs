//! Filesystem sink for rendered documents.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::render::{render_index, IndexedFolder, LeafFolder, RenderPlan};
use crate::config::INDEX_FILE_NAME;
use crate::error::Result;

/// What a write pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub articles_written: usize,
    pub articles_skipped: usize,
    pub indexes_written: usize,
    /// Leaf folders created, relative to the output root.
    pub folders: Vec<PathBuf>,
}

/// Delete `path` if it exists and recreate it empty.
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        tracing::info!(path = %path.display(), "Removing previous output");
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Write `contents` to `path` through a temporary sibling file.
///
/// The data is synced before the rename, so a crash leaves either the old
/// file or the new one, never a partial write.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    Ok(())
}

/// Write every folder, article file and index of `plan` below `output`.
///
/// A failing article write is logged and left out of its index. Folder
/// creation and index writes are fatal.
pub fn write_plan(plan: &RenderPlan, output: &Path) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for folder in &plan.folders {
        let base = output.join(&folder.path);
        let mut written = IndexedFolder {
            path: folder.path.clone(),
            heading: folder.heading.clone(),
            leaves: Vec::with_capacity(folder.leaves.len()),
        };

        for leaf in &folder.leaves {
            let dir = base.join(&leaf.name);
            fs::create_dir_all(&dir)?;
            report.folders.push(folder.path.join(&leaf.name));

            let mut kept = LeafFolder {
                name: leaf.name.clone(),
                display_name: leaf.display_name.clone(),
                pages: Vec::with_capacity(leaf.pages.len()),
            };
            for page in &leaf.pages {
                let path = dir.join(&page.file_name);
                match write_atomic(&path, &page.contents) {
                    Ok(()) => {
                        report.articles_written += 1;
                        kept.pages.push(page.clone());
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping article");
                        report.articles_skipped += 1;
                    }
                }
            }
            written.leaves.push(kept);
        }

        if let Some(index) = render_index(&written) {
            write_atomic(&base.join(INDEX_FILE_NAME), &index)?;
            report.indexes_written += 1;
        }
    }

    Ok(report)
}
