use crate::config::{self, SegmentationConfig, SegmentationOverrides};
use crate::error::{SubcueError, SubcueResult};
use crate::subtitle::check::{check_blocks, CueIssue};
use crate::subtitle::srt::parse_srt;
use colored::*;
use std::path::Path;

/// Parse an SRT file and check it against the segmentation limits.
pub fn check_file(
    path: &Path,
    config: &SegmentationConfig,
) -> SubcueResult<(usize, Vec<CueIssue>)> {
    if !path.is_file() {
        return Err(SubcueError::InputNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let blocks = parse_srt(&content)?;
    Ok((blocks.len(), check_blocks(&blocks, config)))
}

/// CLI entry point: print every issue and fail if any were found.
pub fn run(
    path: &Path,
    config_path: Option<&Path>,
    overrides: &SegmentationOverrides,
) -> SubcueResult<()> {
    let mut segmentation = config::load_config(config_path)?.segmentation;
    overrides.apply(&mut segmentation);
    segmentation.validate()?;

    let (cues, issues) = check_file(path, &segmentation)?;
    for issue in &issues {
        eprintln!("  {} {}", "x".red(), issue);
    }

    if !issues.is_empty() {
        return Err(SubcueError::CheckFailed(issues.len()));
    }
    eprintln!(
        "{} {} ({} cues within limits)",
        "ok:".green().bold(),
        path.display(),
        cues
    );
    Ok(())
}
