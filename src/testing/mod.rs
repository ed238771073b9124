//! Testing infrastructure for correctness verification
//!
//! This module provides:
//! - A naive reference evaluator that scans every document
//! - A deterministic synthetic corpus generator
//! - Invariant checks over a built index
//!
//! # Quick Start
//!
//! ```rust
//! use wikidex::testing::prelude::*;
//! use wikidex::{SearchEngine, Tokenizer};
//!
//! let docs = synthetic_corpus(200, 7);
//! let engine = SearchEngine::default();
//! engine.build(docs.clone()).unwrap();
//!
//! let tokenizer = Tokenizer::default();
//! let violations = engine
//!     .with_index(|index| {
//!         check_all_invariants(&IndexUnderTest::new(index, &docs, &tokenizer), &default_invariants())
//!     })
//!     .unwrap();
//! assert!(violations.is_empty());
//!
//! assert_eq!(
//!     engine.search("river stone").unwrap(),
//!     reference_search(&docs, &tokenizer, "river stone")
//! );
//! ```
//!
//! # Invariants
//!
//! - **PostingsStrictlyAscending**: every posting list is sorted with no duplicates
//! - **PostingsReferenceStore**: every posted id names a document in the corpus
//! - **NoEmptyPostings**: a term is present only if some document contains it
//! - **EveryTokenFindable**: each token of each document posts that document
//! - **DocumentCountMatches**: the index counts exactly the corpus documents

pub mod invariants;
pub mod reference;

pub use invariants::{
    check_all_invariants, default_invariants, DocumentCountMatches, EveryTokenFindable,
    IndexUnderTest, Invariant, NoEmptyPostings, PostingsReferenceStore,
    PostingsStrictlyAscending, Violation,
};
pub use reference::{reference_search, synthetic_corpus, VOCABULARY};

/// Prelude for easy imports
pub mod prelude {
    pub use super::invariants::{
        check_all_invariants, default_invariants, IndexUnderTest, Invariant, Violation,
    };
    pub use super::reference::{reference_search, synthetic_corpus};
}
