use crate::error::{SubcueError, SubcueResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "subcue.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubcueConfig {
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Limits and heuristics consumed by every stage of the cue pipeline.
///
/// Validate once with [`SegmentationConfig::validate`] before handing it to
/// the engine; the stages themselves never re-check it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SegmentationConfig {
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(default = "default_max_chars_line")]
    pub max_chars_line: usize,
    /// Minimum on-screen time in seconds.
    #[serde(default = "default_min_std_time")]
    pub min_std_time: f64,
    /// Maximum on-screen time in seconds.
    #[serde(default = "default_max_std_time")]
    pub max_std_time: f64,
    /// Silence between two words (seconds) that forces a sentence break.
    #[serde(default = "default_pause_threshold")]
    pub pause_threshold: f64,
    /// Gap inserted between cues that would otherwise touch, one frame at
    /// 24 fps by default. 0 disables it.
    #[serde(default = "default_frame_gap")]
    pub frame_gap: f64,
    #[serde(default = "default_terminal_punctuation")]
    pub terminal_punctuation: String,
    /// Words ending in a period that do not close a sentence.
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<String>,
    /// Write German `-Innen` plurals in gender-star form (`Lehrer*innen`).
    #[serde(default)]
    pub gender_star: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_input_extension")]
    pub extension: String,
    #[serde(default = "default_parallel")]
    pub parallel: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractConfig {
    #[serde(default = "default_video_extension")]
    pub extension: String,
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default = "default_channels")]
    pub channels: u32,
    /// Appended to the video stem to name the extracted WAV file.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

// Defaults
fn default_max_lines() -> usize {
    2
}
fn default_max_chars_line() -> usize {
    40
}
fn default_min_std_time() -> f64 {
    2.0
}
fn default_max_std_time() -> f64 {
    5.0
}
fn default_pause_threshold() -> f64 {
    1.5
}
fn default_frame_gap() -> f64 {
    0.042
}
fn default_terminal_punctuation() -> String {
    ".!?…。！？".into()
}
fn default_abbreviations() -> Vec<String> {
    [
        "z.B.", "u.a.", "d.h.", "bzw.", "etc.", "usw.", "e.g.", "i.e.", "Mr.", "Mrs.", "Dr.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_input_extension() -> String {
    "json".into()
}
fn default_parallel() -> usize {
    4
}
fn default_output_dir() -> String {
    "subtitles".into()
}
fn default_video_extension() -> String {
    "mp4".into()
}
fn default_codec() -> String {
    "pcm_s32le".into()
}
fn default_channels() -> u32 {
    2
}
fn default_suffix() -> String {
    "_audio".into()
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            max_chars_line: default_max_chars_line(),
            min_std_time: default_min_std_time(),
            max_std_time: default_max_std_time(),
            pause_threshold: default_pause_threshold(),
            frame_gap: default_frame_gap(),
            terminal_punctuation: default_terminal_punctuation(),
            abbreviations: default_abbreviations(),
            gender_star: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: default_input_extension(),
            parallel: default_parallel(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            extension: default_video_extension(),
            codec: default_codec(),
            channels: default_channels(),
            suffix: default_suffix(),
        }
    }
}

impl SegmentationConfig {
    /// Reject limits the pipeline cannot honor.
    pub fn validate(&self) -> SubcueResult<()> {
        let invalid = |msg: String| Err(SubcueError::InvalidConfiguration(msg));

        if self.max_lines == 0 {
            return invalid("max_lines must be at least 1".into());
        }
        if self.max_chars_line == 0 {
            return invalid("max_chars_line must be at least 1".into());
        }
        if !self.min_std_time.is_finite() || self.min_std_time <= 0.0 {
            return invalid(format!(
                "min_std_time must be positive, got {}",
                self.min_std_time
            ));
        }
        if !self.max_std_time.is_finite() || self.max_std_time < self.min_std_time {
            return invalid(format!(
                "max_std_time ({}) must be at least min_std_time ({})",
                self.max_std_time, self.min_std_time
            ));
        }
        if !self.pause_threshold.is_finite() || self.pause_threshold <= 0.0 {
            return invalid(format!(
                "pause_threshold must be positive, got {}",
                self.pause_threshold
            ));
        }
        if !self.frame_gap.is_finite()
            || self.frame_gap < 0.0
            || self.frame_gap >= self.min_std_time
        {
            return invalid(format!(
                "frame_gap must be in [0, min_std_time), got {}",
                self.frame_gap
            ));
        }
        if self.terminal_punctuation.trim().is_empty() {
            return invalid("terminal_punctuation must contain at least one character".into());
        }
        Ok(())
    }
}

/// All-optional struct for command-line overrides of the segmentation limits.
#[derive(Debug, Default)]
pub struct SegmentationOverrides {
    pub max_lines: Option<usize>,
    pub max_chars_line: Option<usize>,
    pub min_std_time: Option<f64>,
    pub max_std_time: Option<f64>,
    pub pause_threshold: Option<f64>,
}

impl SegmentationOverrides {
    pub fn apply(&self, config: &mut SegmentationConfig) {
        if let Some(max_lines) = self.max_lines {
            config.max_lines = max_lines;
        }
        if let Some(max_chars_line) = self.max_chars_line {
            config.max_chars_line = max_chars_line;
        }
        if let Some(min) = self.min_std_time {
            config.min_std_time = min;
        }
        if let Some(max) = self.max_std_time {
            config.max_std_time = max;
        }
        if let Some(pause) = self.pause_threshold {
            config.pause_threshold = pause;
        }
    }
}

/// Save a `SubcueConfig` as pretty TOML.
pub fn save_config(path: &Path, config: &SubcueConfig) -> SubcueResult<()> {
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| SubcueError::ConfigParse(e.to_string()))?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

pub fn load_config_file(path: &Path) -> SubcueResult<SubcueConfig> {
    if !path.exists() {
        return Err(SubcueError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| SubcueError::ConfigParse(e.to_string()))
}

/// Resolve the effective config: an explicit path must exist, otherwise
/// `./subcue.toml` is used when present, otherwise the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> SubcueResult<SubcueConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if !local.exists() {
                tracing::debug!("No {CONFIG_FILE_NAME} in working directory, using defaults");
                return Ok(SubcueConfig::default());
            }
            local
        }
    };
    tracing::debug!("Loading config from {}", path.display());
    load_config_file(&path)
}
