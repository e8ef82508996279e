use super::frequency::FrequencyTable;
use super::segment::Segmenter;
use super::stopwords::StopwordSet;
use super::tokenize::tokenize;
use super::{scorer, selector};
use super::{Degradation, SummarizeResult, Summarizer, SummaryConfig};
use crate::errors::SummarizeError;
use std::sync::Arc;

pub const BACKEND: &str = "frequency";

/// Frequency-scored extractive summarizer. Holds no per-call state, so one
/// instance can serve concurrent callers.
#[derive(Clone)]
pub struct FrequencySummarizer {
    segmenter: Segmenter,
    stopwords: Arc<StopwordSet>,
}

impl FrequencySummarizer {
    pub fn new(segmenter: Segmenter, stopwords: Arc<StopwordSet>) -> Self {
        Self {
            segmenter,
            stopwords,
        }
    }

    fn unchanged(
        text: &str,
        sentences_total: usize,
        degradations: Vec<Degradation>,
    ) -> SummarizeResult {
        SummarizeResult {
            summary: text.to_string(),
            sentences_total,
            sentences_selected: sentences_total,
            degradations,
            backend: BACKEND.into(),
        }
    }
}

impl Summarizer for FrequencySummarizer {
    fn summarize(
        &self,
        text: &str,
        config: &SummaryConfig,
    ) -> Result<SummarizeResult, SummarizeError> {
        if text.is_empty() {
            return Err(SummarizeError::InvalidInput(
                "input must be a non-empty string".into(),
            ));
        }
        config.validate()?;

        let mut degradations = Vec::new();
        if self.stopwords.is_degraded() {
            degradations.push(Degradation::StopwordsUnavailable);
        }

        let segmentation = self.segmenter.segment(text);
        if segmentation.degraded {
            degradations.push(Degradation::SegmentationFallback);
        }
        let sentences = segmentation.sentences;
        if sentences.is_empty() {
            tracing::debug!("no sentences found, returning input unchanged");
            degradations.push(Degradation::NoSentences);
            return Ok(Self::unchanged(text, 0, degradations));
        }

        let count = selector::target_count(config, sentences.len())?;
        let table = FrequencyTable::build(&tokenize(text), &self.stopwords);
        let scores = scorer::score(&sentences, &table);
        if table.is_empty() || scores.iter().all(|s| s.raw == 0) {
            tracing::debug!(
                sentences = sentences.len(),
                "no content words to score, returning input unchanged"
            );
            degradations.push(Degradation::NoScorableSentences);
            return Ok(Self::unchanged(text, sentences.len(), degradations));
        }

        let chosen = selector::select(&sentences, &scores, count);
        let summary = chosen
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(
            sentences_total = sentences.len(),
            sentences_selected = chosen.len(),
            vocabulary = table.len(),
            degraded = !degradations.is_empty(),
            "summary built"
        );

        Ok(SummarizeResult {
            summary,
            sentences_total: sentences.len(),
            sentences_selected: chosen.len(),
            degradations,
            backend: BACKEND.into(),
        })
    }
}
