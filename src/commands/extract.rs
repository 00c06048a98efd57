use crate::config::{self, ExtractConfig};
use crate::error::{SubcueError, SubcueResult};
use crate::files;
use colored::*;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::debug;

/// FFmpeg arguments that pull the audio track out of `video` into a WAV file.
fn ffmpeg_args(video: &Path, audio: &Path, cfg: &ExtractConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), video.as_os_str().to_owned()];
    args.extend(
        [
            "-acodec",
            cfg.codec.as_str(),
            "-ac",
            &cfg.channels.to_string(),
            "-y", // Overwrite output
        ]
        .iter()
        .map(OsString::from),
    );
    args.push(audio.as_os_str().to_owned());
    args
}

/// Name of the WAV file extracted from `video`: `<stem><suffix>.wav`.
pub fn audio_path_for(video: &Path, output_dir: &Path, cfg: &ExtractConfig) -> PathBuf {
    let stem = video
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    output_dir.join(format!("{stem}{}.wav", cfg.suffix))
}

/// Extract the audio track of one video via an external `ffmpeg` process.
pub fn extract_audio(video: &Path, audio: &Path, cfg: &ExtractConfig) -> SubcueResult<()> {
    let args = ffmpeg_args(video, audio, cfg);
    debug!("Spawning ffmpeg {:?}", args);

    let output = Command::new("ffmpeg")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| SubcueError::Ffmpeg(format!("Failed to spawn ffmpeg: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SubcueError::Ffmpeg(format!(
            "Audio extraction from {} failed: {}",
            video.display(),
            stderr.lines().last().unwrap_or("unknown error")
        )));
    }
    Ok(())
}

/// CLI entry point: extract audio from one video or every video in a folder.
pub fn run(input: &Path, output_dir: &Path, config_path: Option<&Path>) -> SubcueResult<()> {
    let cfg = config::load_config(config_path)?.extract;
    let videos = files::resolve_inputs(input, &cfg.extension)?;
    std::fs::create_dir_all(output_dir)?;

    eprintln!(
        "{} Extracting audio from {} file(s)...",
        "extract:".cyan().bold(),
        videos.len()
    );
    let started = Instant::now();

    let mut failed = 0;
    for video in &videos {
        let audio = audio_path_for(video, output_dir, &cfg);
        match extract_audio(video, &audio, &cfg) {
            Ok(()) => eprintln!("{} {}", "done:".green().bold(), audio.display()),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}", "failed:".red().bold(), e);
            }
        }
    }

    eprintln!(
        "{} Finished in {:.1?}",
        "extract:".cyan().bold(),
        started.elapsed()
    );
    if failed > 0 {
        return Err(SubcueError::BatchFailed {
            failed,
            total: videos.len(),
        });
    }
    Ok(())
}
