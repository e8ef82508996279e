use super::stopwords::StopwordSet;
use unicode_segmentation::UnicodeSegmentation;

const CLITICS: &[&str] = &["n't", "'s", "'re", "'ll", "'ve", "'d", "'m"];

/// Lowercased Unicode words with trailing clitics split off, so
/// "Alice's" yields `alice` and `'s`. Punctuation never forms a token.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text.unicode_words() {
        let word = word.to_lowercase().replace('\u{2019}', "'");
        match CLITICS
            .iter()
            .find(|c| word.len() > c.len() && word.ends_with(*c))
        {
            Some(clitic) => {
                let stem = &word[..word.len() - clitic.len()];
                tokens.push(stem.to_string());
                tokens.push(clitic.to_string());
            }
            None => tokens.push(word),
        }
    }
    tokens
}

pub fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

pub fn is_content(token: &str, stopwords: &StopwordSet) -> bool {
    is_alphanumeric(token) && !stopwords.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("Cats are GREAT. Really?"),
            vec!["cats", "are", "great", "really"]
        );
    }

    #[test]
    fn clitics_split_from_their_stem() {
        assert_eq!(
            tokenize("Alice's cat sleeps. Alice\u{2019}s dog barks."),
            vec!["alice", "'s", "cat", "sleeps", "alice", "'s", "dog", "barks"]
        );
        assert_eq!(
            tokenize("Don't pay 3.50 now, we'll see"),
            vec!["do", "n't", "pay", "3.50", "now", "we", "'ll", "see"]
        );
    }

    #[test]
    fn clitics_and_decimals_are_not_alphanumeric() {
        assert!(!is_alphanumeric("n't"));
        assert!(!is_alphanumeric("'s"));
        assert!(!is_alphanumeric("3.50"));
        assert!(is_alphanumeric("pay"));
        assert!(is_alphanumeric("café"));
        assert!(!is_alphanumeric(""));
    }

    #[test]
    fn content_excludes_stopwords() {
        let stop = StopwordSet::english();
        assert!(is_content("birds", &stop));
        assert!(!is_content("the", &stop));
        assert!(is_content("the", &StopwordSet::default()));
    }
}
