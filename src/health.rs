use crate::summarize::segment::{primary_available, Segmenter, SegmenterMode};
use crate::summarize::StopwordSet;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub primary_segmenter_ok: bool,
    pub segmenter_mode: String,
    pub stopwords: usize,
    pub stopwords_ok: bool,
}

/// Runs the primary sentence tokenizer on a fixed two-sentence text.
pub fn check_segmenter() -> bool {
    if !primary_available() {
        return false;
    }
    let seg = Segmenter::new(SegmenterMode::Auto).segment("Check one. Check two.");
    !seg.degraded && seg.sentences.len() == 2
}

pub fn check_stopwords(stopwords: &StopwordSet) -> bool {
    !stopwords.is_degraded() && !stopwords.is_empty()
}

pub fn report(mode: SegmenterMode, stopwords: &StopwordSet) -> HealthReport {
    HealthReport {
        primary_segmenter_ok: check_segmenter(),
        segmenter_mode: format!("{mode:?}").to_lowercase(),
        stopwords: stopwords.len(),
        stopwords_ok: check_stopwords(stopwords),
    }
}
