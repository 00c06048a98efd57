use crate::error::{SubcueError, SubcueResult};
use std::path::{Path, PathBuf};

/// List the files directly inside `dir` whose name ends in `.{extension}`
/// (case-insensitive), sorted by path. Subdirectories are not searched.
pub fn find_files(dir: &Path, extension: &str) -> SubcueResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SubcueError::InputNotFound(dir.to_path_buf()));
    }
    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_lowercase().ends_with(&suffix));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A single file is taken as-is; a folder expands to its matching files.
pub fn resolve_inputs(input: &Path, extension: &str) -> SubcueResult<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.exists() {
        return Err(SubcueError::InputNotFound(input.to_path_buf()));
    }
    let files = find_files(input, extension)?;
    if files.is_empty() {
        return Err(SubcueError::NoInputs {
            path: input.to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        });
    }
    Ok(files)
}
