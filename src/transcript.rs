use crate::error::{SubcueError, SubcueResult};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A recognized word with its position in the audio, in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Word {
    #[serde(alias = "word")]
    pub text: String,
    pub start: f64,
    pub end: f64,
    /// Recognizer confidence, when the engine reports one.
    #[serde(default, alias = "confidence")]
    pub probability: Option<f32>,
}

impl Word {
    #[cfg(test)]
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            probability: None,
        }
    }

    /// Length in characters, as counted against `max_chars_line`.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// The two shapes a recognizer dump may take: a flat word list, or
/// Whisper-style segments each carrying their own words.
#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Words(Vec<Word>),
    Segments { segments: Vec<Segment> },
}

#[derive(Deserialize)]
struct Segment {
    #[serde(default)]
    words: Vec<Word>,
}

/// Parse recognizer JSON into a flat, trimmed word list.
pub fn parse_words(json: &str) -> Result<Vec<Word>, serde_json::Error> {
    let words = match serde_json::from_str::<TranscriptFile>(json)? {
        TranscriptFile::Words(words) => words,
        TranscriptFile::Segments { segments } => {
            segments.into_iter().flat_map(|s| s.words).collect()
        }
    };

    // Whisper prefixes most words with a space; blank tokens carry no text.
    Ok(words
        .into_iter()
        .filter_map(|mut w| {
            let trimmed = w.text.trim();
            if trimmed.is_empty() {
                debug!("Skipping blank word at {:.3}s", w.start);
                return None;
            }
            if trimmed.len() != w.text.len() {
                w.text = trimmed.to_string();
            }
            Some(w)
        })
        .collect())
}

/// Load a word list from a JSON file on disk.
pub fn load_words(path: &Path) -> SubcueResult<Vec<Word>> {
    let content = std::fs::read_to_string(path)?;
    parse_words(&content).map_err(|e| SubcueError::TranscriptParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Repair timestamp inversions instead of rejecting them: a word ending
/// before it starts is stretched to zero length, and a word starting before
/// its predecessor ended is pushed forward to that end.
pub fn clamp_timestamps(words: &[Word]) -> Vec<Word> {
    let mut out: Vec<Word> = Vec::with_capacity(words.len());
    for word in words {
        let mut w = word.clone();
        if let Some(prev) = out.last() {
            if w.start < prev.end {
                debug!(
                    "Clamping start of {:?} from {:.3}s to {:.3}s",
                    w.text, w.start, prev.end
                );
                w.start = prev.end;
            }
        }
        if w.end < w.start {
            debug!(
                "Clamping end of {:?} from {:.3}s to {:.3}s",
                w.text, w.end, w.start
            );
            w.end = w.start;
        }
        out.push(w);
    }
    out
}

/// Rewrite the German `-Innen` plural ending to the gender-star form
/// (`LehrerInnen` becomes `Lehrer*innen`).
pub fn star_gender_suffix(words: &mut [Word]) {
    for word in words {
        if let Some(stem) = word.text.strip_suffix("Innen") {
            word.text = format!("{stem}*innen");
        }
    }
}

/// Average recognizer confidence over the words that report one.
pub fn mean_probability(words: &[Word]) -> Option<f32> {
    let scores: Vec<f32> = words.iter().filter_map(|w| w.probability).collect();
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f32>() / scores.len() as f32)
}
