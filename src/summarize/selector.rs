use super::scorer::SentenceScore;
use super::segment::Sentence;
use super::SummaryConfig;
use crate::errors::SummarizeError;

pub const DEFAULT_RATIO: f64 = 0.3;

/// Resolves the summary length once per call; `num_sentences` wins over `ratio`.
pub fn target_count(config: &SummaryConfig, total: usize) -> Result<usize, SummarizeError> {
    config.validate()?;
    Ok(match config.num_sentences {
        Some(n) => n.min(total),
        None => {
            let ratio = config.ratio.unwrap_or(DEFAULT_RATIO);
            ((total as f64 * ratio).floor() as usize).max(1)
        }
    })
}

/// Picks the `count` best scores, ties going to the earlier sentence, and
/// returns the chosen sentences in document order.
pub fn select<'a>(
    sentences: &'a [Sentence],
    scores: &[SentenceScore],
    count: usize,
) -> Vec<&'a Sentence> {
    let mut ranked: Vec<&SentenceScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));

    let mut chosen: Vec<usize> = ranked.into_iter().take(count).map(|s| s.index).collect();
    chosen.sort_unstable();
    chosen
        .into_iter()
        .filter_map(|i| sentences.get(i))
        .collect()
}
