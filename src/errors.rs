use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Raised by a sentence tokenizer; never escapes the segmenter.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("sentence tokenizer unavailable")]
    #[cfg_attr(feature = "segmenter-unicode", allow(dead_code))]
    Unavailable,
    #[error("no sentence boundaries found in non-blank text")]
    NoBoundaries,
}

#[derive(Debug, Error)]
pub enum StopwordError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("csv line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}
