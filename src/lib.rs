//! # wikidex
//!
//! Boolean keyword search over a corpus of short documents (encyclopedia
//! abstracts). The corpus is indexed once into an immutable in-memory
//! inverted index; afterwards any number of threads can query it without
//! locking.
//!
//! ```
//! use wikidex::{Document, SearchEngine};
//!
//! let engine = SearchEngine::default();
//! engine
//!     .build(vec![
//!         Document::new(0, "Small wild cat"),
//!         Document::new(1, "Large wild dog"),
//!         Document::new(2, "Small domestic dog"),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(engine.search("small wild").unwrap(), vec![0]);
//! ```

pub mod api;
pub mod cancel;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod query;
pub mod testing;
pub mod tokenizer;

pub use api::{create_router, AppState};
pub use cancel::CancelToken;
pub use config::{BuildConfig, BuildPolicy, EngineConfig, MatchMode, QueryConfig, ServerConfig, TokenizerConfig};
pub use engine::{EngineState, SearchEngine};
pub use error::{Result, WikidexError};
pub use metrics::SearchMetrics;
pub use models::*;
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
