//! Sentence segmentation.
//!
//! The primary tokenizer uses UAX #29 sentence boundaries and then repairs
//! splits made after common abbreviations and initials. When the primary is
//! not compiled in, or fails on a given text, the segmenter falls back to a
//! punctuation splitter and marks the result as degraded. Segmentation itself
//! never returns an error.

use crate::errors::SegmentError;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub sentences: Vec<Sentence>,
    /// True when the heuristic splitter produced `sentences`.
    pub degraded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmenterMode {
    /// Primary tokenizer, heuristic splitter on failure.
    #[default]
    Auto,
    /// Always use the heuristic splitter.
    Heuristic,
}

pub trait SentenceTokenizer: Send + Sync {
    fn split(&self, text: &str) -> Result<Vec<String>, SegmentError>;
}

#[derive(Debug, Default)]
pub struct UnicodeSentenceTokenizer;

#[cfg(feature = "segmenter-unicode")]
mod abbreviations {
    use crate::summarize::stopwords::StopwordSet;
    use once_cell::sync::Lazy;
    use regex::Regex;

    static TRAILING_ABBREVIATION: Lazy<Option<Regex>> = Lazy::new(|| {
        Regex::new(r#"(?:^|[\s(\["'])(?i:mr|mrs|ms|dr|prof|sr|jr|st|vs|inc|ltd|co|fig|e\.g|i\.e)\.$"#)
            .map_err(|e| tracing::warn!(error=%e, "abbreviation pattern failed to compile"))
            .ok()
    });

    static TRAILING_INITIAL: Lazy<Option<Regex>> = Lazy::new(|| {
        Regex::new(r#"(?:^|[\s(\["'])\p{Lu}\.$"#)
            .map_err(|e| tracing::warn!(error=%e, "initial pattern failed to compile"))
            .ok()
    });

    static SENTENCE_OPENERS: Lazy<StopwordSet> = Lazy::new(StopwordSet::english);

    fn matches(re: &Lazy<Option<Regex>>, fragment: &str) -> bool {
        re.as_ref().is_some_and(|re| re.is_match(fragment))
    }

    /// An initial continues only into another initial or a capitalized
    /// word that is not a function word ("J. R. Tolkien", not "plan B. It").
    fn continues_name(next: &str) -> bool {
        let next = next.trim_start();
        let mut chars = next.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_uppercase() {
            return false;
        }
        if chars.next() == Some('.') {
            return true;
        }
        let word: String = next
            .chars()
            .take_while(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        !SENTENCE_OPENERS.contains(&word)
    }

    /// True when the boundary after `fragment` is not a sentence end.
    pub fn joins_next(fragment: &str, next: Option<&str>) -> bool {
        if matches(&TRAILING_ABBREVIATION, fragment) {
            return true;
        }
        matches(&TRAILING_INITIAL, fragment) && next.is_some_and(continues_name)
    }
}

impl SentenceTokenizer for UnicodeSentenceTokenizer {
    #[cfg(feature = "segmenter-unicode")]
    fn split(&self, text: &str) -> Result<Vec<String>, SegmentError> {
        use unicode_segmentation::UnicodeSegmentation;

        let pieces: Vec<&str> = text.split_sentence_bounds().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut end = 0usize;
        for (i, piece) in pieces.iter().enumerate() {
            end += piece.len();
            let candidate = text[start..end].trim();
            if candidate.is_empty() {
                start = end;
                continue;
            }
            if abbreviations::joins_next(candidate, pieces.get(i + 1).copied()) {
                continue;
            }
            sentences.push(candidate.to_string());
            start = end;
        }
        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        if sentences.is_empty() && !text.trim().is_empty() {
            return Err(SegmentError::NoBoundaries);
        }
        Ok(sentences)
    }

    #[cfg(not(feature = "segmenter-unicode"))]
    fn split(&self, _text: &str) -> Result<Vec<String>, SegmentError> {
        Err(SegmentError::Unavailable)
    }
}

pub fn primary_available() -> bool {
    cfg!(feature = "segmenter-unicode")
}

/// Run-on fragment accumulator: `?` and `!` count as `.`, and consecutive
/// non-empty fragments are emitted in pairs.
pub fn heuristic_split(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut pending: Option<&str> = None;
    for fragment in text
        .split(['.', '?', '!'])
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        match pending.take() {
            None => pending = Some(fragment),
            Some(first) => sentences.push(format!("{first} {fragment}")),
        }
    }
    if let Some(last) = pending {
        sentences.push(last.to_string());
    }
    sentences
}

#[derive(Clone)]
pub struct Segmenter {
    mode: SegmenterMode,
    primary: Arc<dyn SentenceTokenizer>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmenterMode::Auto)
    }
}

impl Segmenter {
    pub fn new(mode: SegmenterMode) -> Self {
        Self {
            mode,
            primary: Arc::new(UnicodeSentenceTokenizer),
        }
    }

    #[cfg(test)]
    pub fn with_primary(mut self, primary: Arc<dyn SentenceTokenizer>) -> Self {
        self.primary = primary;
        self
    }

    pub fn segment(&self, text: &str) -> Segmentation {
        if text.trim().is_empty() {
            return Segmentation::default();
        }

        let (raw, degraded) = match self.mode {
            SegmenterMode::Heuristic => (heuristic_split(text), true),
            SegmenterMode::Auto => match self.primary.split(text) {
                Ok(sentences) => (sentences, false),
                Err(e) => {
                    tracing::debug!(error=%e, "primary sentence tokenizer failed, using heuristic splitter");
                    (heuristic_split(text), true)
                }
            },
        };

        Segmentation {
            sentences: raw
                .into_iter()
                .enumerate()
                .map(|(index, text)| Sentence { index, text })
                .collect(),
            degraded,
        }
    }
}
