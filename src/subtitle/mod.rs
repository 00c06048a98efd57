//! Word stream to subtitle cues.
//!
//! The pipeline runs one way: sentence spans ([`sentence`]), greedy line
//! wrapping into cues ([`wrap`]), duration adjustment ([`duration`]), and
//! finally SRT serialization ([`srt`]). Every stage takes borrowed input and
//! returns new values.

pub mod check;
pub mod duration;
pub mod sentence;
pub mod srt;
pub mod timestamp;
pub mod wrap;

use crate::config::SegmentationConfig;
use crate::error::SubcueResult;
use crate::transcript::{clamp_timestamps, star_gender_suffix, Word};
use tracing::debug;

/// One line of a cue, keeping the words it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Rendered length in characters, including the separating spaces.
    pub fn char_len(&self) -> usize {
        let letters: usize = self.words.iter().map(Word::char_len).sum();
        letters + self.words.len().saturating_sub(1)
    }
}

/// A timed subtitle display unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// 1-based position in the final track; 0 until assigned.
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub lines: Vec<Line>,
}

impl Cue {
    /// Build an unindexed cue spanning its first to last word.
    pub(crate) fn from_lines(lines: Vec<Line>) -> Self {
        let start = lines
            .first()
            .and_then(|l| l.words.first())
            .map_or(0.0, |w| w.start);
        let end = lines
            .last()
            .and_then(|l| l.words.last())
            .map_or(start, |w| w.end);
        Self {
            index: 0,
            start,
            end,
            lines,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(Line::text).collect()
    }

    pub fn char_count(&self) -> usize {
        self.lines.iter().map(Line::char_len).sum()
    }

    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.lines.iter().flat_map(|l| l.words.iter())
    }
}

/// Turn a recognizer word stream into an indexed, non-overlapping cue track.
///
/// The configuration is validated here, once; the stages below trust it.
/// Timestamp inversions in `words` are clamped rather than rejected.
pub fn build_cues(words: &[Word], config: &SegmentationConfig) -> SubcueResult<Vec<Cue>> {
    config.validate()?;
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut words = clamp_timestamps(words);
    if config.gender_star {
        star_gender_suffix(&mut words);
    }

    let mut cues = Vec::new();
    let mut span_count = 0;
    for span in sentence::spans(&words, config) {
        span_count += 1;
        debug!(
            "span {:.3}..{:.3}: {}",
            span.start(),
            span.end(),
            span.text()
        );
        cues.extend(wrap::wrap_span(&span, config));
    }
    debug!(
        "{} words -> {} spans -> {} wrapped cues",
        words.len(),
        span_count,
        cues.len()
    );

    let cues = duration::adjust_durations(cues, config);
    let mut cues = separate_touching(cues, config);
    for (i, cue) in cues.iter_mut().enumerate() {
        cue.index = i + 1;
    }
    Ok(cues)
}

/// Push the start of a cue that touches its predecessor forward by
/// `frame_gap`, as long as the shifted cue still meets `min_std_time`.
fn separate_touching(cues: Vec<Cue>, config: &SegmentationConfig) -> Vec<Cue> {
    if config.frame_gap <= 0.0 {
        return cues;
    }
    let mut out: Vec<Cue> = Vec::with_capacity(cues.len());
    for mut cue in cues {
        if let Some(prev) = out.last() {
            let shifted = cue.start + config.frame_gap;
            if prev.end >= cue.start && cue.end - shifted >= config.min_std_time {
                cue.start = shifted;
            }
        }
        out.push(cue);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::SubcueError;

    const EPS: f64 = 1e-9;

    fn assert_track_invariants(input: &[Word], cues: &[Cue], config: &SegmentationConfig) {
        // Coverage: every word exactly once, in order
        let covered: Vec<&str> = cues.iter().flat_map(|c| c.words()).map(|w| w.text.as_str()).collect();
        let expected: Vec<&str> = input.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(covered, expected);

        for (i, cue) in cues.iter().enumerate() {
            assert_eq!(cue.index, i + 1);
            assert!(cue.start <= cue.end);
            assert!(cue.lines.len() <= config.max_lines);
            for line in &cue.lines {
                assert!(
                    line.char_len() <= config.max_chars_line || line.words.len() == 1,
                    "line too long: {:?}",
                    line.text()
                );
            }
        }
        for pair in cues.windows(2) {
            assert!(pair[0].start <= pair[1].start);
            assert!(pair[0].end <= pair[1].start + EPS, "overlap {pair:?}");
        }
    }

    #[test]
    fn test_hello_world_extended_to_minimum() {
        let input = words(&[("Hello", 0.0, 0.5), ("world.", 0.5, 1.0)]);
        let config = SegmentationConfig::default();
        let cues = build_cues(&input, &config).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].index, 1);
        assert!(cues[0].start.abs() < EPS);
        assert!((cues[0].end - 2.0).abs() < EPS);
        assert_eq!(cues[0].text_lines(), vec!["Hello world."]);
    }

    #[test]
    fn test_empty_input_yields_no_cues() {
        let cues = build_cues(&[], &SegmentationConfig::default()).unwrap();
        assert!(cues.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_before_processing() {
        let config = SegmentationConfig {
            min_std_time: 5.0,
            max_std_time: 2.0,
            ..Default::default()
        };
        // Rejected even for empty input
        assert!(matches!(
            build_cues(&[], &config),
            Err(SubcueError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_noisy_timestamps_are_clamped() {
        let input = words(&[("one", 0.0, 0.6), ("two", 0.4, 0.3), ("three.", 0.9, 1.2)]);
        let cues = build_cues(&input, &SegmentationConfig::default()).unwrap();
        assert_eq!(cues.len(), 1);
        let w: Vec<&Word> = cues[0].words().collect();
        assert!((w[1].start - 0.6).abs() < EPS);
        assert!((w[1].end - 0.6).abs() < EPS);
    }

    #[test]
    fn test_sentences_become_separate_cues() {
        let input = words(&[
            ("First", 0.0, 0.6),
            ("sentence", 0.6, 1.4),
            ("here.", 1.4, 2.2),
            ("Second", 2.3, 2.9),
            ("one", 2.9, 3.5),
            ("follows.", 3.5, 4.6),
        ]);
        let cues = build_cues(&input, &SegmentationConfig::default()).unwrap();
        // Both sentences already last at least min_std_time, so none merge.
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].text_lines(), vec!["First sentence here."]);
        assert_eq!(cues[1].text_lines(), vec!["Second one follows."]);
        assert_track_invariants(&input, &cues, &SegmentationConfig::default());
    }

    #[test]
    fn test_long_monologue_respects_all_bounds() {
        let text = "the quick brown fox jumps over the lazy dog while everyone watches \
                    closely and nobody says a single word about it until the very end";
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let input = steady_words(&tokens, 0.35);
        let config = SegmentationConfig::default();
        let cues = build_cues(&input, &config).unwrap();
        assert_track_invariants(&input, &cues, &config);

        let last = cues.len() - 1;
        for (i, cue) in cues.iter().enumerate() {
            if cue.lines.len() > 1 {
                assert!(cue.duration() <= config.max_std_time + EPS, "{cue:?}");
            }
            let runs_into_next = cues
                .get(i + 1)
                .is_some_and(|n| n.start - cue.end <= config.frame_gap + EPS);
            if i != last && !runs_into_next {
                assert!(cue.duration() >= config.min_std_time - EPS, "{cue:?}");
            }
        }
    }

    #[test]
    fn test_pause_splits_and_short_cues_extend() {
        let input = words(&[
            ("okay", 0.0, 0.4),
            ("then", 10.0, 10.3),
            ("bye", 20.0, 20.2),
        ]);
        let config = SegmentationConfig::default();
        let cues = build_cues(&input, &config).unwrap();
        assert_eq!(cues.len(), 3);
        for cue in &cues {
            assert!((cue.duration() - 2.0).abs() < EPS);
        }
        assert_track_invariants(&input, &cues, &config);
    }

    #[test]
    fn test_oversized_word_kept_whole() {
        let input = words(&[("Donaudampfschifffahrtsgesellschaft.", 0.0, 2.5)]);
        let config = SegmentationConfig {
            max_chars_line: 10,
            ..Default::default()
        };
        let cues = build_cues(&input, &config).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(
            cues[0].text_lines(),
            vec!["Donaudampfschifffahrtsgesellschaft."]
        );
    }

    #[test]
    fn test_frame_gap_separates_touching_cues() {
        let input = words(&[
            ("Alpha", 0.0, 1.0),
            ("beta.", 1.0, 2.5),
            ("Gamma", 2.5, 4.0),
            ("delta.", 4.0, 5.0),
        ]);
        let config = SegmentationConfig {
            max_lines: 1,
            max_chars_line: 12,
            frame_gap: 0.042,
            ..Default::default()
        };
        let cues = build_cues(&input, &config).unwrap();
        assert_eq!(cues.len(), 2);
        assert!((cues[0].end - 2.5).abs() < EPS);
        assert!((cues[1].start - 2.542).abs() < EPS);
    }

    #[test]
    fn test_frame_gap_skipped_when_it_would_shorten_below_minimum() {
        let cues = vec![
            Cue::from_lines(vec![line(&[("a", 0.0, 2.0)])]),
            Cue::from_lines(vec![line(&[("b", 2.0, 4.0)])]),
        ];
        let config = SegmentationConfig {
            frame_gap: 0.042,
            ..Default::default()
        };
        let out = separate_touching(cues, &config);
        assert!((out[1].start - 2.0).abs() < EPS);
    }

    #[test]
    fn test_equal_min_and_max_terminates() {
        let text = "so we start here and then we keep on talking until the end of it. \
                    short one. and a final stretch of words to wrap up";
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let config = SegmentationConfig {
            max_lines: 3,
            max_chars_line: 21,
            min_std_time: 2.0,
            max_std_time: 2.0,
            ..Default::default()
        };
        for step in [0.124, 0.173, 0.211, 0.377] {
            for offset in [0.0, 6.734, 1234.567] {
                let input: Vec<Word> = steady_words(&tokens, step)
                    .into_iter()
                    .map(|w| Word::new(w.text, w.start + offset, w.end + offset))
                    .collect();
                let cues = build_cues(&input, &config).unwrap();
                assert_track_invariants(&input, &cues, &config);
                for cue in cues.iter().filter(|c| c.lines.len() > 1) {
                    assert!(cue.duration() <= config.max_std_time + 1e-6, "{cue:?}");
                }
            }
        }
    }

    #[test]
    fn test_huge_char_limit_merges() {
        let input = words(&[("Hi.", 0.0, 0.5), ("Yes.", 0.6, 1.0)]);
        let config = SegmentationConfig {
            max_chars_line: usize::MAX,
            ..Default::default()
        };
        let cues = build_cues(&input, &config).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text_lines(), vec!["Hi.", "Yes."]);
    }

    #[test]
    fn test_gender_star_opt_in() {
        let input = words(&[("Liebe", 0.0, 0.4), ("StudentInnen", 0.4, 1.2)]);
        let plain = build_cues(&input, &SegmentationConfig::default()).unwrap();
        assert_eq!(plain[0].text_lines(), vec!["Liebe StudentInnen"]);

        let config = SegmentationConfig {
            gender_star: true,
            ..Default::default()
        };
        let starred = build_cues(&input, &config).unwrap();
        assert_eq!(starred[0].text_lines(), vec!["Liebe Student*innen"]);
    }

    #[test]
    fn test_line_char_len_counts_spaces_and_unicode() {
        let l = line(&[("Grüße", 0.0, 0.1), ("an", 0.1, 0.2), ("alle", 0.2, 0.3)]);
        assert_eq!(l.text(), "Grüße an alle");
        assert_eq!(l.char_len(), 13);
    }
}
