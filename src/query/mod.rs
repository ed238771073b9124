//! Free-text query evaluation
//!
//! A query string is tokenized with the index's tokenizer and resolved to an
//! ascending, duplicate-free list of document ids:
//! - `MatchMode::All` (default): documents containing every term, computed as a
//!   shortest-first k-way intersection of posting lists
//! - `MatchMode::Any`: documents containing at least one term (k-way union)
//!
//! # Example
//!
//! ```
//! use wikidex::config::{BuildConfig, QueryConfig};
//! use wikidex::index::IndexBuilder;
//! use wikidex::models::Document;
//! use wikidex::query::QueryEvaluator;
//! use wikidex::Tokenizer;
//!
//! let tokenizer = Tokenizer::default();
//! let docs = vec![Document::new(0, "Small wild cat"), Document::new(1, "Large wild dog")];
//! let index = IndexBuilder::new(&tokenizer, BuildConfig::default()).build(&docs).unwrap();
//!
//! let evaluator = QueryEvaluator::new(&tokenizer, QueryConfig::default());
//! assert_eq!(evaluator.search("wild", &index).unwrap(), vec![0, 1]);
//! assert_eq!(evaluator.search("WILD cat", &index).unwrap(), vec![0]);
//! ```

pub mod evaluator;
pub mod set_ops;

pub use evaluator::QueryEvaluator;
pub use set_ops::{intersect_sorted, union_sorted};
