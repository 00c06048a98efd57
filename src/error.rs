use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubcueError {
    #[error("Invalid timestamp: {0} (must be a finite, non-negative number of seconds)")]
    InvalidTimestamp(f64),

    #[error("Cannot parse timestamp: {0}")]
    TimestampParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("No .{extension} files found in {path}")]
    NoInputs { path: PathBuf, extension: String },

    #[error("Transcript error in {path}: {message}")]
    TranscriptParse { path: PathBuf, message: String },

    #[error("SRT parse error at line {line}: {message}")]
    SrtParse { line: usize, message: String },

    #[error("Subtitle check found {0} issue(s)")]
    CheckFailed(usize),

    #[error("{failed} of {total} file(s) failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("Already initialized: {0} already exists")]
    AlreadyInitialized(PathBuf),

    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SubcueError {
    /// Return an actionable hint for the user, if applicable.
    pub fn hint(&self) -> Option<String> {
        match self {
            SubcueError::InvalidTimestamp(_) => Some(
                "The transcript contains a negative or non-numeric time. Check the recognizer output for this file.".into(),
            ),
            SubcueError::InvalidConfiguration(msg) => {
                if msg.contains("min_std_time") || msg.contains("max_std_time") {
                    Some("min_std_time must be positive and not larger than max_std_time (defaults: 2 and 5 seconds).".into())
                } else {
                    Some("Check the [segmentation] section of subcue.toml and any command-line overrides.".into())
                }
            }
            SubcueError::ConfigNotFound(_) => Some(
                "Run 'subcue init' to write a starter subcue.toml, or drop --config to use the defaults.".into(),
            ),
            SubcueError::ConfigParse(_) => Some(
                "Check subcue.toml syntax. Run 'subcue init <path>' to generate a valid example config.".into(),
            ),
            SubcueError::NoInputs { extension, .. } => Some(format!(
                "Point the command at a single file, or at a folder containing .{extension} files."
            )),
            SubcueError::TranscriptParse { .. } => Some(
                "Expected a JSON array of {\"text\", \"start\", \"end\"} words, or an object with segments[].words[].".into(),
            ),
            SubcueError::CheckFailed(_) => Some(
                "Regenerate the file with 'subcue generate', or relax the limits in subcue.toml.".into(),
            ),
            SubcueError::BatchFailed { .. } => Some(
                "Run with RUST_LOG=subcue=debug for details on the failing files.".into(),
            ),
            SubcueError::AlreadyInitialized(_) => Some(
                "Use a different path, or delete the existing subcue.toml first.".into(),
            ),
            SubcueError::Ffmpeg(_) => Some(
                "Ensure FFmpeg is installed and on your PATH. Install via: brew install ffmpeg (macOS) or apt install ffmpeg (Linux).".into(),
            ),
            _ => None,
        }
    }
}

pub type SubcueResult<T> = Result<T, SubcueError>;
