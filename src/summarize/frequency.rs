use super::stopwords::StopwordSet;
use super::tokenize::is_content;
use std::collections::HashMap;

/// Single-document term frequency over content tokens.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn build(tokens: &[String], stopwords: &StopwordSet) -> Self {
        let mut counts = HashMap::new();
        for token in tokens.iter().filter(|t| is_content(t, stopwords)) {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.counts.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::tokenize::tokenize;

    #[test]
    fn counts_content_tokens_only() {
        let tokens = tokenize("Cats are great. Dogs are great too. Birds can fly high in the sky.");
        let table = FrequencyTable::build(&tokens, &StopwordSet::english());
        assert_eq!(table.get("great"), Some(2));
        for w in ["cats", "dogs", "birds", "fly", "high", "sky"] {
            assert_eq!(table.get(w), Some(1), "{w}");
        }
        assert_eq!(table.get("are"), None);
        assert_eq!(table.get("too"), None);
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn possessive_stem_is_counted() {
        let tokens = tokenize("Alice's cat sleeps. Alice's dog barks. Bob runs.");
        let table = FrequencyTable::build(&tokens, &StopwordSet::english());
        assert_eq!(table.get("alice"), Some(2));
        assert_eq!(table.get("'s"), None);
    }

    #[test]
    fn all_stopwords_gives_empty_table() {
        let tokens = tokenize("It is what it is, and so it was.");
        assert!(FrequencyTable::build(&tokens, &StopwordSet::english()).is_empty());
    }
}
