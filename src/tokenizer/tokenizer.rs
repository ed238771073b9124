use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

use crate::config::TokenizerConfig;

/// Text tokenizer: splits on runs of non-alphanumeric characters and case-folds.
///
/// The same instance (or one built from the same config) must be used for
/// indexing and for querying.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Create a new tokenizer from configuration
    pub fn new(config: &TokenizerConfig) -> Self {
        let stemmer = if config.stem {
            Some(Stemmer::create(Algorithm::English))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(LANGUAGE::English)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Self {
            config: config.clone(),
            stemmer,
            stopwords,
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize text into a vector of terms, in source order
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        self.scan(text, &mut current, &mut tokens);
        self.flush(&mut current, &mut tokens);
        tokens
    }

    /// Get unique terms from text
    pub fn unique_terms(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }

    fn scan(&self, text: &str, current: &mut String, tokens: &mut Vec<String>) {
        for c in text.chars() {
            if c.is_alphanumeric() {
                current.extend(c.to_lowercase());
            } else {
                self.flush(current, tokens);
            }
        }
    }

    fn flush(&self, current: &mut String, tokens: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }
        let token = std::mem::take(current);

        let too_long = self
            .config
            .max_token_length
            .is_some_and(|max| token.len() > max);
        if too_long || token.len() < self.config.min_token_length || self.stopwords.contains(&token)
        {
            return;
        }

        match &self.stemmer {
            Some(stemmer) => tokens.push(stemmer.stem(&token).into_owned()),
            None => tokens.push(token),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&TokenizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Tokenizer {
        Tokenizer::default()
    }

    #[test]
    fn test_basic_tokenization() {
        let tokens = plain().tokenize("Hello World! This is a test.");
        assert_eq!(tokens, vec!["hello", "world", "this", "is", "a", "test"]);
    }

    #[test]
    fn test_case_variants_tokenize_identically() {
        let tokenizer = plain();
        assert_eq!(tokenizer.tokenize("Cat"), tokenizer.tokenize("cat"));
        assert_eq!(tokenizer.tokenize("CAT"), vec!["cat"]);
    }

    #[test]
    fn test_consecutive_delimiters_produce_no_empty_tokens() {
        let tokens = plain().tokenize("  --wild,,,  cat!!  ");
        assert_eq!(tokens, vec!["wild", "cat"]);
        assert!(plain().tokenize("?!. ,;").is_empty());
        assert!(plain().tokenize("").is_empty());
    }

    #[test]
    fn test_digits_and_unicode_are_alphanumeric() {
        let tokens = plain().tokenize("Apollo 11 landed; Ärger über Straße");
        assert_eq!(tokens, vec!["apollo", "11", "landed", "ärger", "über", "straße"]);
    }

    #[test]
    fn test_preserves_source_order_and_duplicates() {
        let tokens = plain().tokenize("dog cat dog");
        assert_eq!(tokens, vec!["dog", "cat", "dog"]);
        assert_eq!(plain().unique_terms("dog cat dog").len(), 2);
    }

    #[test]
    fn test_long_runs_are_kept_by_default() {
        let long = "a".repeat(100);
        assert_eq!(plain().tokenize(&long), vec![long.clone()]);

        // One unbroken run of CJK text is a single token of 69 bytes
        let cjk = "维基百科是一个自由内容的多语言网络百科全书项目";
        assert_eq!(plain().tokenize(cjk), vec![cjk.to_string()]);

        let chemical = format!("Methionyl{}serine", "threonyl".repeat(6));
        assert_eq!(plain().tokenize(&chemical), vec![chemical.to_lowercase()]);
    }

    #[test]
    fn test_stopword_removal() {
        let config = TokenizerConfig {
            remove_stopwords: true,
            ..Default::default()
        };
        let tokens = Tokenizer::new(&config).tokenize("The cat and the dog");

        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"and".to_string()));
        assert!(tokens.contains(&"cat".to_string()));
        assert!(tokens.contains(&"dog".to_string()));
    }

    #[test]
    fn test_stemming() {
        let config = TokenizerConfig {
            stem: true,
            ..Default::default()
        };
        let tokens = Tokenizer::new(&config).tokenize("running runs");

        assert!(tokens.iter().all(|t| t == "run"));
    }

    #[test]
    fn test_min_max_token_length() {
        let config = TokenizerConfig {
            min_token_length: 3,
            max_token_length: Some(5),
            ..Default::default()
        };
        let tokens = Tokenizer::new(&config).tokenize("a ab abc abcd abcde abcdef");

        assert_eq!(tokens, vec!["abc", "abcd", "abcde"]);
    }
}
