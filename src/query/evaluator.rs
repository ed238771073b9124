use std::collections::HashSet;

use crate::cancel::{CancelToken, Interrupt};
use crate::config::{MatchMode, QueryConfig};
use crate::error::{Result, WikidexError};
use crate::index::InvertedIndex;
use crate::models::DocumentId;
use crate::tokenizer::Tokenizer;

use super::set_ops::{intersect_sorted, union_sorted};

/// Resolves free-text queries against a built index.
///
/// Borrows the tokenizer so that queries are normalized exactly as the
/// indexed documents were.
pub struct QueryEvaluator<'a> {
    tokenizer: &'a Tokenizer,
    config: QueryConfig,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(tokenizer: &'a Tokenizer, config: QueryConfig) -> Self {
        Self { tokenizer, config }
    }

    /// Evaluate without a cancellation signal
    pub fn search(&self, query: &str, index: &InvertedIndex) -> Result<Vec<DocumentId>> {
        self.evaluate(query, index, &CancelToken::new())
    }

    /// Evaluate `query`, returning ascending, duplicate-free ids.
    ///
    /// A query with no tokens yields an empty result, not an error.
    pub fn evaluate(
        &self,
        query: &str,
        index: &InvertedIndex,
        cancel: &CancelToken,
    ) -> Result<Vec<DocumentId>> {
        poll(cancel)?;

        let terms = self.query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        match self.config.mode {
            MatchMode::All => match_all(&terms, index, cancel),
            MatchMode::Any => match_any(&terms, index, cancel),
        }
    }

    /// Normalized query terms, in query order
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        let mut terms = self.tokenizer.tokenize(query);
        if self.config.dedup_terms {
            let mut seen = HashSet::with_capacity(terms.len());
            terms.retain(|term| seen.insert(term.clone()));
        }
        terms
    }
}

fn match_all(
    terms: &[String],
    index: &InvertedIndex,
    cancel: &CancelToken,
) -> Result<Vec<DocumentId>> {
    let mut lists: Vec<&[DocumentId]> = Vec::with_capacity(terms.len());
    for term in terms {
        match index.get(term) {
            Some(list) if !list.is_empty() => lists.push(list.as_slice()),
            // One missing term empties an AND: skip the remaining lookups
            _ => return Ok(Vec::new()),
        }
    }

    lists.sort_by_key(|list| list.len());
    let Some((shortest, rest)) = lists.split_first() else {
        return Ok(Vec::new());
    };
    let mut result = shortest.to_vec();

    for list in rest {
        poll(cancel)?;
        result = intersect_sorted(&result, list);
        if result.is_empty() {
            break;
        }
    }

    Ok(result)
}

fn match_any(
    terms: &[String],
    index: &InvertedIndex,
    cancel: &CancelToken,
) -> Result<Vec<DocumentId>> {
    let lists: Vec<&[DocumentId]> = terms
        .iter()
        .filter_map(|term| index.get(term))
        .map(|list| list.as_slice())
        .collect();
    poll(cancel)?;
    Ok(union_sorted(&lists))
}

fn poll(cancel: &CancelToken) -> Result<()> {
    match cancel.check() {
        None => Ok(()),
        Some(Interrupt::Cancelled) => Err(WikidexError::SearchCancelled),
        Some(Interrupt::DeadlineExceeded) => Err(WikidexError::DeadlineExceeded),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::config::BuildConfig;
    use crate::index::IndexBuilder;
    use crate::models::Document;

    fn fixture(tokenizer: &Tokenizer) -> InvertedIndex {
        let docs = vec![
            Document::new(0, "Small wild cat"),
            Document::new(1, "Large wild dog"),
            Document::new(2, "Small domestic dog"),
        ];
        IndexBuilder::new(tokenizer, BuildConfig::default())
            .build(&docs)
            .unwrap()
    }

    #[test]
    fn test_and_semantics() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let evaluator = QueryEvaluator::new(&tokenizer, QueryConfig::default());

        assert_eq!(evaluator.search("wild", &index).unwrap(), vec![0, 1]);
        assert_eq!(evaluator.search("small", &index).unwrap(), vec![0, 2]);
        assert_eq!(evaluator.search("small wild", &index).unwrap(), vec![0]);
        assert_eq!(evaluator.search("wild cat", &index).unwrap(), vec![0]);
        assert!(evaluator.search("elephant", &index).unwrap().is_empty());
    }

    #[test]
    fn test_missing_term_empties_and() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let evaluator = QueryEvaluator::new(&tokenizer, QueryConfig::default());

        assert!(evaluator.search("wild elephant", &index).unwrap().is_empty());
        assert!(evaluator.search("elephant wild", &index).unwrap().is_empty());
    }

    #[test]
    fn test_empty_query() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let evaluator = QueryEvaluator::new(&tokenizer, QueryConfig::default());

        assert!(evaluator.search("", &index).unwrap().is_empty());
        assert!(evaluator.search("  ?!  ", &index).unwrap().is_empty());
    }

    #[test]
    fn test_query_normalization_matches_index() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let evaluator = QueryEvaluator::new(&tokenizer, QueryConfig::default());

        assert_eq!(evaluator.search("SMALL,  Wild!!", &index).unwrap(), vec![0]);
    }

    #[test]
    fn test_duplicate_terms() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);

        let dedup = QueryEvaluator::new(&tokenizer, QueryConfig::default());
        assert_eq!(dedup.query_terms("dog Dog dog small"), vec!["dog", "small"]);

        let keep = QueryEvaluator::new(
            &tokenizer,
            QueryConfig {
                dedup_terms: false,
                ..Default::default()
            },
        );
        assert_eq!(keep.query_terms("dog dog").len(), 2);
        assert_eq!(
            keep.search("dog dog small", &index).unwrap(),
            dedup.search("dog dog small", &index).unwrap()
        );
    }

    #[test]
    fn test_or_mode() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let evaluator = QueryEvaluator::new(
            &tokenizer,
            QueryConfig {
                mode: MatchMode::Any,
                ..Default::default()
            },
        );

        assert_eq!(evaluator.search("cat dog", &index).unwrap(), vec![0, 1, 2]);
        assert_eq!(evaluator.search("cat elephant", &index).unwrap(), vec![0]);
        assert!(evaluator.search("elephant", &index).unwrap().is_empty());
    }

    #[test]
    fn test_cancelled_search() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let evaluator = QueryEvaluator::new(&tokenizer, QueryConfig::default());

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = evaluator.evaluate("wild", &index, &cancel).unwrap_err();
        assert!(matches!(err, WikidexError::SearchCancelled));

        let expired = CancelToken::new().with_deadline(Instant::now() - Duration::from_millis(1));
        let err = evaluator.evaluate("wild", &index, &expired).unwrap_err();
        assert!(matches!(err, WikidexError::DeadlineExceeded));
    }

    #[test]
    fn test_deadline_checked_between_intersections() {
        let tokenizer = Tokenizer::default();
        let index = fixture(&tokenizer);
        let expired = CancelToken::new().with_deadline(Instant::now());

        // Entered past the up-front poll: the intersection loop must notice
        let terms = vec!["small".to_string(), "wild".to_string(), "cat".to_string()];
        let err = match_all(&terms, &index, &expired).unwrap_err();
        assert!(matches!(err, WikidexError::DeadlineExceeded));

        // One term has no intersection step to interrupt
        let single = vec!["wild".to_string()];
        assert_eq!(match_all(&single, &index, &expired).unwrap(), vec![0, 1]);

        // A miss short-circuits before any intersection
        let miss = vec!["wild".to_string(), "elephant".to_string()];
        assert!(match_all(&miss, &index, &expired).unwrap().is_empty());
    }
}
