use crate::config::SegmentationConfig;
use crate::transcript::Word;

/// Closing quotes and brackets that may trail a sentence-ending mark.
const CLOSERS: &[char] = &['”', '"', '\'', '»', '›', ')', ']'];

/// A contiguous run of words forming a candidate sentence. Never empty.
#[derive(Debug, Clone, Copy)]
pub struct Span<'a> {
    pub words: &'a [Word],
}

impl Span<'_> {
    pub fn start(&self) -> f64 {
        self.words.first().map_or(0.0, |w| w.start)
    }

    pub fn end(&self) -> f64 {
        self.words.last().map_or(0.0, |w| w.end)
    }

    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Forward-only iterator over the sentence spans of a word stream.
pub struct Spans<'a> {
    words: &'a [Word],
    config: &'a SegmentationConfig,
    pos: usize,
}

/// Split `words` into spans after sentence-ending punctuation, or before a
/// word that follows a pause longer than `pause_threshold`.
pub fn spans<'a>(words: &'a [Word], config: &'a SegmentationConfig) -> Spans<'a> {
    Spans {
        words,
        config,
        pos: 0,
    }
}

impl<'a> Iterator for Spans<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        if self.pos >= self.words.len() {
            return None;
        }
        let begin = self.pos;
        let mut end = self.words.len();
        for i in begin..self.words.len() {
            if i > begin && self.words[i].start - self.words[i - 1].end > self.config.pause_threshold
            {
                end = i;
                break;
            }
            if is_sentence_end(&self.words[i].text, self.config) {
                end = i + 1;
                break;
            }
        }
        self.pos = end;
        Some(Span {
            words: &self.words[begin..end],
        })
    }
}

/// Whether `word` closes a sentence: it ends in terminal punctuation
/// (ignoring trailing quotes/brackets) and is not a known abbreviation.
pub fn is_sentence_end(word: &str, config: &SegmentationConfig) -> bool {
    let word = word.trim();
    if config.abbreviations.iter().any(|a| a == word) {
        return false;
    }
    word.trim_end_matches(CLOSERS)
        .chars()
        .next_back()
        .is_some_and(|c| config.terminal_punctuation.contains(c))
}
