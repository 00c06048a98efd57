use crate::config::SegmentationOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "subcue",
    about = "Turn word-level speech recognition output into readable SRT subtitles",
    version,
    after_help = "\x1b[1mExamples:\x1b[0m
  subcue init                           Write a default subcue.toml here
  subcue generate talk.json             Segment one transcript into subtitles/talk.srt
  subcue generate ./words -o ./srt --parallel 8   Convert a whole folder
  subcue generate talk.json --max-lines 1 --max-chars-line 32   Single-line captions
  subcue extract ./videos -o ./audio    Pull WAV audio out of every MP4 for transcription
  subcue check subtitles/talk.srt       Verify a track against the limits"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Segmentation limits that override the `[segmentation]` config section.
#[derive(Args, Debug, Default)]
pub struct LimitArgs {
    /// Maximum lines per cue
    #[arg(long)]
    pub max_lines: Option<usize>,

    /// Maximum characters per line
    #[arg(long)]
    pub max_chars_line: Option<usize>,

    /// Minimum on-screen time in seconds
    #[arg(long)]
    pub min_std_time: Option<f64>,

    /// Maximum on-screen time in seconds
    #[arg(long)]
    pub max_std_time: Option<f64>,

    /// Silence in seconds that starts a new sentence
    #[arg(long)]
    pub pause_threshold: Option<f64>,
}

impl From<LimitArgs> for SegmentationOverrides {
    fn from(args: LimitArgs) -> Self {
        Self {
            max_lines: args.max_lines,
            max_chars_line: args.max_chars_line,
            min_std_time: args.min_std_time,
            max_std_time: args.max_std_time,
            pause_threshold: args.pause_threshold,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a subcue.toml populated with the default settings
    Init {
        /// Folder to write subcue.toml into, or the config file path itself
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Build SRT subtitles from word-timed transcripts
    #[command(alias = "gen")]
    Generate {
        /// Transcript JSON file, or a folder of them
        input: PathBuf,

        /// Output folder for the .srt files (overrides [output] directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Config file (default: ./subcue.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,

        /// Maximum number of files to process in parallel (default: 4)
        #[arg(long)]
        parallel: Option<usize>,

        /// Print a JSON report of every file to stdout
        #[arg(long)]
        json: bool,
    },
    /// Extract audio tracks from videos with FFmpeg, ready for transcription
    Extract {
        /// Video file, or a folder of them
        input: PathBuf,

        /// Output folder for the WAV files
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Config file (default: ./subcue.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
    /// Check an SRT file against the segmentation limits
    Check {
        /// Path to the .srt file
        path: PathBuf,

        /// Config file (default: ./subcue.toml if present)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        #[command(flatten)]
        limits: LimitArgs,
    },
}
