//! Process-wide stopword set.
//!
//! Loaded once at startup and shared read-only by every summarization call.
//! If an override file cannot be read the set is empty and flagged degraded,
//! which disables stopword filtering instead of failing summarization.

use crate::errors::StopwordError;
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static GLOBAL: OnceCell<Arc<StopwordSet>> = OnceCell::new();

#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
    degraded: bool,
}

impl StopwordSet {
    pub fn english() -> Self {
        Self::from_words(ENGLISH.iter().copied())
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
            degraded: false,
        }
    }

    /// Empty set standing in for a list that failed to load.
    pub fn unavailable() -> Self {
        Self {
            words: HashSet::new(),
            degraded: true,
        }
    }

    /// One word per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self, StopwordError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_words(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        ))
    }

    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::english();
        };
        match Self::from_file(path) {
            Ok(set) => {
                tracing::debug!(path=%path.display(), words=set.len(), "loaded stopword file");
                set
            }
            Err(e) => {
                tracing::warn!(path=%path.display(), error=%e, "stopword list unavailable, filtering disabled");
                Self::unavailable()
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Install the process-wide set. Later calls keep the first set installed.
pub fn init(path: Option<&Path>) -> Arc<StopwordSet> {
    GLOBAL
        .get_or_init(|| Arc::new(StopwordSet::load_or_empty(path)))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn english_list_covers_common_function_words() {
        let set = StopwordSet::english();
        for w in ["the", "and", "are", "can", "too", "in"] {
            assert!(set.contains(w), "{w} should be a stopword");
        }
        assert!(!set.contains("great"));
        assert!(!set.is_degraded());
    }

    #[test]
    fn file_override_skips_comments_and_lowercases() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# custom list\nFoo\n\n  bar  ").unwrap();
        let set = StopwordSet::from_file(f.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("foo"));
        assert!(set.contains("bar"));
    }

    #[test]
    fn missing_file_degrades_to_empty_set() {
        let set = StopwordSet::load_or_empty(Some(Path::new("/nonexistent/stopwords.txt")));
        assert!(set.is_empty());
        assert!(set.is_degraded());
    }

    #[test]
    fn no_path_means_builtin_english() {
        let set = StopwordSet::load_or_empty(None);
        assert_eq!(set.len(), ENGLISH.len());
    }
}
