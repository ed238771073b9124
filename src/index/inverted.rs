use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::PostingList;
use crate::Result;

/// Term → posting list mapping.
///
/// Terms are kept in lexicographic order so two indexes over the same corpus
/// serialize to the same bytes. A term is present iff at least one document
/// contains it; there are no empty posting lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: BTreeMap<String, PostingList>,
    document_count: usize,
    posting_count: usize,
}

impl InvertedIndex {
    /// Index over an empty corpus
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_postings(
        postings: BTreeMap<String, PostingList>,
        document_count: usize,
    ) -> Self {
        let posting_count = postings.values().map(PostingList::len).sum();
        Self {
            postings,
            document_count,
            posting_count,
        }
    }

    /// Posting list for an already-normalized term
    pub fn get(&self, term: &str) -> Option<&PostingList> {
        self.postings.get(term)
    }

    /// Iterate terms and their posting lists in term order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.postings.iter().map(|(term, list)| (term.as_str(), list))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Number of distinct terms
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Total number of (term, document) entries
    pub fn posting_count(&self) -> usize {
        self.posting_count
    }

    /// Number of documents the index was built from
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Canonical binary encoding, used to compare builds byte for byte
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvertedIndex {
        let mut postings = BTreeMap::new();
        postings.insert("wild".to_string(), PostingList::from_unsorted(vec![1, 0]));
        postings.insert("cat".to_string(), PostingList::from_unsorted(vec![0]));
        InvertedIndex::from_postings(postings, 2)
    }

    #[test]
    fn test_counts() {
        let index = sample();
        assert_eq!(index.term_count(), 2);
        assert_eq!(index.posting_count(), 3);
        assert_eq!(index.document_count(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_lookup() {
        let index = sample();
        assert_eq!(index.get("wild").unwrap().as_slice(), &[0, 1]);
        assert!(index.get("dog").is_none());
    }

    #[test]
    fn test_terms_are_ordered() {
        let index = sample();
        let terms: Vec<&str> = index.terms().collect();
        assert_eq!(terms, vec!["cat", "wild"]);
    }

    #[test]
    fn test_empty_index() {
        let index = InvertedIndex::empty();
        assert!(index.is_empty());
        assert_eq!(index.posting_count(), 0);
        assert_eq!(index.to_bytes().unwrap(), InvertedIndex::empty().to_bytes().unwrap());
    }
}
