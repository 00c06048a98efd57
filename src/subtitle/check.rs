//! Verify a subtitle track against the segmentation limits.
//!
//! Checks run on [`SrtBlock`]s so that generated cues and SRT files read
//! back from disk go through the same rules. The best-effort exceptions of
//! the duration adjuster are honored: the final cue may be short, a short
//! cue that runs up to its successor is accepted, and a single-line cue may
//! stay on screen longer than the maximum.

use crate::config::SegmentationConfig;
use crate::subtitle::srt::SrtBlock;
use std::fmt;

/// SRT timestamps carry milliseconds only.
const TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    IndexOutOfSequence { expected: usize },
    InvertedRange,
    OverlapsPrevious { overlap_ms: u64 },
    TooManyLines { lines: usize, max_lines: usize },
    LineTooLong { line: usize, chars: usize, max_chars: usize },
    TooShort { duration: f64, min: f64 },
    TooLong { duration: f64, max: f64 },
}

/// A rule violation found in one block.
#[derive(Debug, Clone, PartialEq)]
pub struct CueIssue {
    /// The block's own index as written in the file.
    pub index: usize,
    pub kind: IssueKind,
}

impl fmt::Display for CueIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cue {}: ", self.index)?;
        match &self.kind {
            IssueKind::IndexOutOfSequence { expected } => {
                write!(f, "out of sequence (expected {expected})")
            }
            IssueKind::InvertedRange => write!(f, "ends before it starts"),
            IssueKind::OverlapsPrevious { overlap_ms } => {
                write!(f, "overlaps the previous cue by {overlap_ms}ms")
            }
            IssueKind::TooManyLines { lines, max_lines } => {
                write!(f, "{lines} lines (max {max_lines})")
            }
            IssueKind::LineTooLong {
                line,
                chars,
                max_chars,
            } => write!(f, "line {line} has {chars} characters (max {max_chars})"),
            IssueKind::TooShort { duration, min } => {
                write!(f, "shown for {duration:.3}s (min {min}s)")
            }
            IssueKind::TooLong { duration, max } => {
                write!(f, "shown for {duration:.3}s (max {max}s)")
            }
        }
    }
}

/// Check every block and return all issues in file order.
pub fn check_blocks(blocks: &[SrtBlock], config: &SegmentationConfig) -> Vec<CueIssue> {
    let mut issues = Vec::new();
    let mut push = |index: usize, kind: IssueKind| issues.push(CueIssue { index, kind });

    for (i, block) in blocks.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &blocks[p]);
        let next = blocks.get(i + 1);

        if block.index != i + 1 {
            push(block.index, IssueKind::IndexOutOfSequence { expected: i + 1 });
        }

        if block.end < block.start {
            push(block.index, IssueKind::InvertedRange);
        }

        if let Some(prev) = prev {
            if prev.end > block.start + TOLERANCE {
                let overlap_ms = ((prev.end - block.start) * 1000.0).round() as u64;
                push(block.index, IssueKind::OverlapsPrevious { overlap_ms });
            }
        }

        if block.lines.len() > config.max_lines {
            push(
                block.index,
                IssueKind::TooManyLines {
                    lines: block.lines.len(),
                    max_lines: config.max_lines,
                },
            );
        }

        for (n, line) in block.lines.iter().enumerate() {
            let chars = line.chars().count();
            let single_word = !line.trim().contains(char::is_whitespace);
            if chars > config.max_chars_line && !single_word {
                push(
                    block.index,
                    IssueKind::LineTooLong {
                        line: n + 1,
                        chars,
                        max_chars: config.max_chars_line,
                    },
                );
            }
        }

        let duration = block.end - block.start;
        if duration + TOLERANCE < config.min_std_time {
            let runs_into_next = next.is_some_and(|n| {
                n.start - block.end <= config.frame_gap + TOLERANCE
            });
            if next.is_some() && !runs_into_next {
                push(
                    block.index,
                    IssueKind::TooShort {
                        duration,
                        min: config.min_std_time,
                    },
                );
            }
        }
        if duration > config.max_std_time + TOLERANCE && block.lines.len() > 1 {
            push(
                block.index,
                IssueKind::TooLong {
                    duration,
                    max: config.max_std_time,
                },
            );
        }
    }

    issues
}
