use crate::config::SegmentationConfig;
use crate::subtitle::sentence::Span;
use crate::subtitle::{Cue, Line};
use crate::transcript::Word;
use std::mem;

/// Greedily pack a span's words into lines of at most `max_chars_line`
/// characters, and the lines into cues of at most `max_lines` lines.
///
/// A word longer than the line limit gets a line of its own and is never
/// cut. Every word lands in exactly one cue; a non-empty span always yields
/// at least one cue.
pub fn wrap_span(span: &Span<'_>, config: &SegmentationConfig) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Word> = Vec::new();
    let mut current_len = 0;

    for word in span.words {
        let len = word.char_len();
        if !current.is_empty() && current_len + 1 + len > config.max_chars_line {
            lines.push(Line {
                words: mem::take(&mut current),
            });
            if lines.len() == config.max_lines {
                cues.push(Cue::from_lines(mem::take(&mut lines)));
            }
        }
        current_len = if current.is_empty() {
            len
        } else {
            current_len + 1 + len
        };
        current.push(word.clone());
    }

    if !current.is_empty() {
        lines.push(Line { words: current });
    }
    if !lines.is_empty() {
        cues.push(Cue::from_lines(lines));
    }
    cues
}
