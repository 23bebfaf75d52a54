//! Data tree traversal and per-file dispatch.

use crate::warehouse::{LoadTransaction, Warehouse};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Extension of the data files picked up under a data root.
pub const DATA_FILE_EXTENSION: &str = "json";

/// Outcome of dispatching one data tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub found: usize,
    pub processed: usize,
}

fn is_data_file(path: &Path) -> bool {
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    // Dot-files are not matched by `*.json`
    !file_name.starts_with('.')
        && path.extension().and_then(|e| e.to_str()) == Some(DATA_FILE_EXTENSION)
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    Ok(cwd.join(path))
}

/// Collect the absolute paths of every data file below `root`, at any depth.
///
/// A missing root yields no files. Unreadable entries below the root are
/// skipped with a warning.
pub fn collect_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    let root = absolute_path(root)?;
    if !root.exists() {
        warn!("Data directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) => {
                // Symlinked files count, symlinked directories are not descended
                if entry.path().is_file() && is_data_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!("Error accessing entry under {}: {}", root.display(), e),
        }
    }
    Ok(files)
}

/// Run `handler` on every data file under `root`, committing after each file.
///
/// A handler error aborts the run; files committed before it stay committed,
/// the failing file's writes are rolled back.
pub fn process_data<F>(
    warehouse: &mut Warehouse,
    root: &Path,
    mut handler: F,
) -> Result<LoadSummary>
where
    F: FnMut(&LoadTransaction<'_>, &Path) -> Result<()>,
{
    let files = collect_json_files(root)?;
    let found = files.len();
    info!("{} files found in {}", found, root.display());

    let mut summary = LoadSummary {
        found,
        processed: 0,
    };
    for (index, data_file) in files.iter().enumerate() {
        let tx = warehouse.transaction()?;
        handler(&tx, data_file)
            .with_context(|| format!("Failed to process {}", data_file.display()))?;
        tx.commit()
            .with_context(|| format!("Failed to commit {}", data_file.display()))?;
        summary.processed = index + 1;
        info!("{}/{} files processed.", summary.processed, found);
    }
    Ok(summary)
}
