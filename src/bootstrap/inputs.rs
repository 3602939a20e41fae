use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// All non-directory entries directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. Failing to read `dir` at all is
/// an error; the caller treats it as fatal.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.context(format!("failed to list input directory {:?}", dir))?;
        if !entry.file_type().is_dir() {
            files.push(entry.into_path());
        }
    }
    info!("Found {} input files in {:?}", files.len(), dir);
    Ok(files)
}
