use super::frequency::FrequencyTable;
use super::segment::Sentence;
use super::tokenize::{is_alphanumeric, tokenize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceScore {
    pub index: usize,
    /// Accumulated term frequency divided by the sentence's word count.
    pub score: f64,
    /// Raw accumulated frequency before normalization.
    pub raw: usize,
}

/// Scores each sentence independently by position. Sentences without any
/// alphanumeric word are left out and can never be selected.
pub fn score(sentences: &[Sentence], table: &FrequencyTable) -> Vec<SentenceScore> {
    sentences
        .iter()
        .filter_map(|sentence| {
            let tokens = tokenize(&sentence.text);
            let word_count = tokens.iter().filter(|t| is_alphanumeric(t)).count();
            if word_count == 0 {
                return None;
            }
            let raw: usize = tokens.iter().filter_map(|t| table.get(t)).sum();
            Some(SentenceScore {
                index: sentence.index,
                score: raw as f64 / word_count as f64,
                raw,
            })
        })
        .collect()
}
