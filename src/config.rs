use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration: how documents are tokenized, indexed and queried
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tokenizer: TokenizerConfig,
    pub query: QueryConfig,
    pub build: BuildConfig,
}

impl EngineConfig {
    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    pub fn with_build(mut self, build: BuildConfig) -> Self {
        self.build = build;
        self
    }

    /// Set the number of build workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.build.workers = workers;
        self
    }

    /// Set the rebuild policy
    pub fn with_policy(mut self, policy: BuildPolicy) -> Self {
        self.build.policy = policy;
        self
    }
}

/// Tokenizer configuration
///
/// Lowercasing is not configurable: indexing and querying must agree on
/// case-folding or matching silently breaks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub remove_stopwords: bool,
    pub stem: bool,
    pub min_token_length: usize,
    /// Drop tokens longer than this many bytes; unbounded when `None`
    #[serde(default)]
    pub max_token_length: Option<usize>,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            remove_stopwords: false,
            stem: false,
            min_token_length: 1,
            max_token_length: None,
        }
    }
}

/// How multiple query terms combine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Every term must be present (boolean AND)
    #[default]
    All,
    /// At least one term must be present (boolean OR)
    Any,
}

/// Query evaluation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    pub mode: MatchMode,
    /// Collapse repeated query terms before lookup
    pub dedup_terms: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::All,
            dedup_terms: true,
        }
    }
}

/// What a second build does once the engine is ready
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildPolicy {
    /// Reject with `AlreadyBuilt`
    #[default]
    RejectRebuild,
    /// Build a fresh index and atomically replace the published one
    SwapOnRebuild,
}

/// Index build configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Upper bound on tokenizer workers
    pub workers: usize,
    pub policy: BuildPolicy,
    /// Documents processed per worker between cancellation checks
    pub cancel_check_interval: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            policy: BuildPolicy::RejectRebuild,
            cancel_check_interval: 1024,
        }
    }
}

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub corpus_path: PathBuf,
    pub search_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            corpus_path: PathBuf::from("enwiki-latest-abstract1.xml.gz"),
            search_timeout_ms: 5_000,
        }
    }
}

impl ServerConfig {
    pub fn new(port: u16, corpus_path: PathBuf) -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{}", port),
            corpus_path,
            ..Default::default()
        }
    }

    /// Set the per-query deadline
    pub fn with_search_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.search_timeout_ms = timeout_ms;
        self
    }

    pub fn search_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_timeout_ms)
    }
}
