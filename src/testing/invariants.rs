//! Invariant checking framework for built indexes
//!
//! This module provides the trait and concrete implementations for
//! checking structural invariants of an `InvertedIndex` against the
//! corpus it was built from.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::index::InvertedIndex;
use crate::models::{Document, DocumentId};
use crate::tokenizer::Tokenizer;

/// A violation of an invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub invariant: String,
    pub description: String,
    pub context: HashMap<String, String>,
}

impl Violation {
    fn new(invariant: &str, description: impl Into<String>) -> Self {
        Self {
            invariant: invariant.to_string(),
            description: description.into(),
            context: HashMap::new(),
        }
    }

    fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INVARIANT VIOLATION: {}", self.invariant)?;
        writeln!(f, "  Description: {}", self.description)?;
        if !self.context.is_empty() {
            writeln!(f, "  Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "    {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// An index together with the corpus and tokenizer that produced it
pub struct IndexUnderTest<'a> {
    pub index: &'a InvertedIndex,
    pub documents: &'a [Document],
    pub tokenizer: &'a Tokenizer,
}

impl<'a> IndexUnderTest<'a> {
    pub fn new(index: &'a InvertedIndex, documents: &'a [Document], tokenizer: &'a Tokenizer) -> Self {
        Self {
            index,
            documents,
            tokenizer,
        }
    }
}

/// Trait for invariant checkers
pub trait Invariant: Send + Sync {
    /// Name of the invariant
    fn name(&self) -> &str;

    /// Check the invariant against a built index
    fn check(&self, target: &IndexUnderTest<'_>) -> Result<(), Violation>;

    /// Human-readable description
    fn description(&self) -> &str {
        "No description provided"
    }
}

/// Check all invariants and return violations
pub fn check_all_invariants(
    target: &IndexUnderTest<'_>,
    invariants: &[Box<dyn Invariant>],
) -> Vec<Violation> {
    invariants
        .iter()
        .filter_map(|invariant| invariant.check(target).err())
        .collect()
}

/// All invariants below
pub fn default_invariants() -> Vec<Box<dyn Invariant>> {
    vec![
        Box::new(PostingsStrictlyAscending),
        Box::new(PostingsReferenceStore),
        Box::new(NoEmptyPostings),
        Box::new(EveryTokenFindable),
        Box::new(DocumentCountMatches),
    ]
}

// ============================================================================
// CONCRETE INVARIANTS
// ============================================================================

/// Invariant: posting lists are strictly ascending
pub struct PostingsStrictlyAscending;

impl Invariant for PostingsStrictlyAscending {
    fn name(&self) -> &str {
        "PostingsStrictlyAscending"
    }

    fn description(&self) -> &str {
        "Every posting list is sorted ascending and duplicate-free"
    }

    fn check(&self, target: &IndexUnderTest<'_>) -> Result<(), Violation> {
        for (term, list) in target.index.iter() {
            if let Some(pair) = list.as_slice().windows(2).find(|pair| pair[0] >= pair[1]) {
                return Err(Violation::new(self.name(), "posting list out of order")
                    .with("term", term)
                    .with("pair", format!("{:?}", pair)));
            }
        }
        Ok(())
    }
}

/// Invariant: every posted id names a corpus document
pub struct PostingsReferenceStore;

impl Invariant for PostingsReferenceStore {
    fn name(&self) -> &str {
        "PostingsReferenceStore"
    }

    fn description(&self) -> &str {
        "Every document id in a posting list refers to a document in the store"
    }

    fn check(&self, target: &IndexUnderTest<'_>) -> Result<(), Violation> {
        let ids: HashSet<DocumentId> = target.documents.iter().map(|doc| doc.id).collect();
        for (term, list) in target.index.iter() {
            if let Some(id) = list.as_slice().iter().find(|id| !ids.contains(*id)) {
                return Err(Violation::new(self.name(), "posting refers to unknown document")
                    .with("term", term)
                    .with("doc_id", id));
            }
        }
        Ok(())
    }
}

/// Invariant: no term maps to an empty list
pub struct NoEmptyPostings;

impl Invariant for NoEmptyPostings {
    fn name(&self) -> &str {
        "NoEmptyPostings"
    }

    fn description(&self) -> &str {
        "A term is present only if at least one document contains it"
    }

    fn check(&self, target: &IndexUnderTest<'_>) -> Result<(), Violation> {
        match target.index.iter().find(|(_, list)| list.is_empty()) {
            Some((term, _)) => Err(Violation::new(self.name(), "empty posting list").with("term", term)),
            None => Ok(()),
        }
    }
}

/// Invariant: each document is posted under each of its tokens
pub struct EveryTokenFindable;

impl Invariant for EveryTokenFindable {
    fn name(&self) -> &str {
        "EveryTokenFindable"
    }

    fn description(&self) -> &str {
        "For every document d and token t of d, the posting list of t contains d"
    }

    fn check(&self, target: &IndexUnderTest<'_>) -> Result<(), Violation> {
        for doc in target.documents {
            for term in target.tokenizer.tokenize(&doc.text) {
                let posted = target
                    .index
                    .get(&term)
                    .is_some_and(|list| list.contains(doc.id));
                if !posted {
                    return Err(Violation::new(self.name(), "token not posted for its document")
                        .with("term", term)
                        .with("doc_id", doc.id));
                }
            }
        }
        Ok(())
    }
}

/// Invariant: the index reports the corpus size
pub struct DocumentCountMatches;

impl Invariant for DocumentCountMatches {
    fn name(&self) -> &str {
        "DocumentCountMatches"
    }

    fn description(&self) -> &str {
        "The index document count equals the corpus size"
    }

    fn check(&self, target: &IndexUnderTest<'_>) -> Result<(), Violation> {
        if target.index.document_count() == target.documents.len() {
            Ok(())
        } else {
            Err(Violation::new(self.name(), "document count mismatch")
                .with("index", target.index.document_count())
                .with("corpus", target.documents.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::index::IndexBuilder;

    #[test]
    fn test_built_index_satisfies_invariants() {
        let tokenizer = Tokenizer::default();
        let docs = crate::testing::synthetic_corpus(100, 11);
        let index = IndexBuilder::new(&tokenizer, BuildConfig::default())
            .build(&docs)
            .unwrap();

        let violations =
            check_all_invariants(&IndexUnderTest::new(&index, &docs, &tokenizer), &default_invariants());
        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn test_violation_detection() {
        let tokenizer = Tokenizer::default();
        let built_from = vec![Document::new(0, "cat"), Document::new(1, "dog")];
        let index = IndexBuilder::new(&tokenizer, BuildConfig::default())
            .build(&built_from)
            .unwrap();

        // Checked against a different corpus: doc 1 is unknown, "bird" is missing
        let other = vec![Document::new(0, "cat bird")];
        let target = IndexUnderTest::new(&index, &other, &tokenizer);

        let violations = check_all_invariants(&target, &default_invariants());
        let names: Vec<&str> = violations.iter().map(|v| v.invariant.as_str()).collect();
        assert!(names.contains(&"PostingsReferenceStore"));
        assert!(names.contains(&"EveryTokenFindable"));
        assert!(names.contains(&"DocumentCountMatches"));
        assert!(!names.contains(&"PostingsStrictlyAscending"));

        let rendered = violations[0].to_string();
        assert!(rendered.starts_with("INVARIANT VIOLATION"));
    }
}
