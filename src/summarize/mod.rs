use crate::errors::SummarizeError;
use serde::{Deserialize, Serialize};

/// Target summary length. `num_sentences` takes precedence; with neither set
/// the ratio defaults to 0.3. A ratio shadowed by `num_sentences` is not
/// checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub num_sentences: Option<usize>,
    pub ratio: Option<f64>,
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<(), SummarizeError> {
        if self.num_sentences == Some(0) {
            return Err(SummarizeError::InvalidConfig(
                "num_sentences must be > 0".into(),
            ));
        }
        if let (None, Some(ratio)) = (self.num_sentences, self.ratio) {
            if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
                return Err(SummarizeError::InvalidConfig(format!(
                    "ratio must be in (0, 1], got {ratio}"
                )));
            }
        }
        Ok(())
    }
}

/// Soft failures that lower summary quality without aborting the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    SegmentationFallback,
    NoSentences,
    NoScorableSentences,
    StopwordsUnavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResult {
    pub summary: String,
    pub sentences_total: usize,
    pub sentences_selected: usize,
    pub degradations: Vec<Degradation>,
    pub backend: String,
}

impl SummarizeResult {
    /// True when the input came back as-is because nothing could be selected.
    pub fn is_unchanged(&self) -> bool {
        self.degradations.iter().any(|d| {
            matches!(
                d,
                Degradation::NoSentences | Degradation::NoScorableSentences
            )
        })
    }
}

pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str, config: &SummaryConfig)
        -> Result<SummarizeResult, SummarizeError>;
}

mod extractive;
mod frequency;
mod scorer;
pub mod segment;
mod selector;
pub mod stopwords;
mod tokenize;

pub use extractive::FrequencySummarizer;
pub use segment::SegmenterMode;
pub use stopwords::StopwordSet;

use std::sync::Arc;

pub fn build_summarizer(mode: SegmenterMode, stopwords: Arc<StopwordSet>) -> Arc<dyn Summarizer> {
    Arc::new(FrequencySummarizer::new(segment::Segmenter::new(mode), stopwords))
}
