use crate::config::{self, SegmentationConfig, SegmentationOverrides};
use crate::error::{SubcueError, SubcueResult};
use crate::files;
use crate::subtitle::{self, srt};
use crate::transcript;
use colored::*;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Options for a generate run, after CLI parsing.
#[derive(Debug, Default)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub overrides: SegmentationOverrides,
    pub parallel: Option<usize>,
}

/// Structured result for one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub words: usize,
    pub cues: usize,
    /// Average recognizer confidence, when the transcript carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_probability: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Convert one recognizer dump into `<output_dir>/<stem>.srt`.
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    config: &SegmentationConfig,
) -> SubcueResult<FileReport> {
    let words = transcript::load_words(input)?;
    let cues = subtitle::build_cues(&words, config)?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("subtitles");
    let srt_path = output_dir.join(format!("{stem}.srt"));

    // Serialize in memory first so a bad timestamp leaves no half-written
    // track behind.
    let mut buf = Vec::new();
    srt::write_srt(&mut buf, &cues)?;
    std::fs::write(&srt_path, buf)?;

    debug!(
        "{}: {} words -> {} cues -> {}",
        input.display(),
        words.len(),
        cues.len(),
        srt_path.display()
    );

    Ok(FileReport {
        input: input.display().to_string(),
        output: Some(srt_path.display().to_string()),
        words: words.len(),
        cues: cues.len(),
        mean_probability: transcript::mean_probability(&words),
        error: None,
    })
}

/// Programmatic entry point: process every input, at most `parallel` at a
/// time, and return one report per input in input order. Per-file failures
/// are recorded in the reports rather than aborting the batch.
pub async fn generate(options: GenerateOptions) -> SubcueResult<Vec<FileReport>> {
    let cfg = config::load_config(options.config.as_deref())?;
    let mut segmentation = cfg.segmentation;
    options.overrides.apply(&mut segmentation);
    segmentation.validate()?;

    let inputs = files::resolve_inputs(&options.input, &cfg.input.extension)?;
    let output_dir = options
        .output
        .unwrap_or_else(|| PathBuf::from(&cfg.output.directory));
    std::fs::create_dir_all(&output_dir)?;

    let parallel = options.parallel.unwrap_or(cfg.input.parallel).max(1);
    if parallel > 1 && inputs.len() > 1 {
        eprintln!(
            "{} {} file(s), up to {} at a time",
            "generate:".cyan().bold(),
            inputs.len(),
            parallel,
        );
    }

    let segmentation = Arc::new(segmentation);
    let output_dir = Arc::new(output_dir);

    let mut results: Vec<(usize, FileReport)> = stream::iter(inputs.into_iter().enumerate())
        .map(|(i, input)| {
            let segmentation = Arc::clone(&segmentation);
            let output_dir = Arc::clone(&output_dir);
            async move {
                let started = Instant::now();
                let worker_input = input.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    process_file(&worker_input, &output_dir, &segmentation)
                })
                .await
                .unwrap_or_else(|e| Err(SubcueError::Other(format!("worker failed: {e}"))));

                let report = match outcome {
                    Ok(report) => {
                        eprintln!(
                            "{} {} ({} cues in {:.1?})",
                            "done:".green().bold(),
                            report.output.as_deref().unwrap_or_default(),
                            report.cues,
                            started.elapsed(),
                        );
                        report
                    }
                    Err(e) => {
                        eprintln!("{} {}: {}", "failed:".red().bold(), input.display(), e);
                        FileReport {
                            input: input.display().to_string(),
                            output: None,
                            words: 0,
                            cues: 0,
                            mean_probability: None,
                            error: Some(e.to_string()),
                        }
                    }
                };
                (i, report)
            }
        })
        .buffer_unordered(parallel)
        .collect()
        .await;

    results.sort_by_key(|(i, _)| *i);
    Ok(results.into_iter().map(|(_, r)| r).collect())
}

/// CLI entry point, delegates to `generate()`.
pub async fn run(options: GenerateOptions, json: bool) -> SubcueResult<()> {
    let started = Instant::now();
    let reports = generate(options).await?;

    if json {
        let out = serde_json::to_string_pretty(&reports)
            .map_err(|e| SubcueError::Other(e.to_string()))?;
        println!("{out}");
    }

    let total = reports.len();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    eprintln!(
        "{} {} of {} file(s) converted in {:.1?}",
        "generate:".cyan().bold(),
        total - failed,
        total,
        started.elapsed(),
    );

    if failed > 0 {
        return Err(SubcueError::BatchFailed { failed, total });
    }
    Ok(())
}
