//! Search engine facade
//!
//! `SearchEngine` owns the document store and the inverted index and moves
//! through two states: `Empty` until a build succeeds, `Ready` afterwards.
//! The ready snapshot is published with a single atomic pointer store, so a
//! query either sees no index (`NotReady`) or a complete one. Queries load the
//! snapshot without locking; builds are serialized by a mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::{BuildPolicy, EngineConfig};
use crate::error::{Result, WikidexError};
use crate::index::{IndexBuilder, InvertedIndex};
use crate::models::{Document, DocumentId, IndexStats, SearchHit};
use crate::query::QueryEvaluator;
use crate::tokenizer::Tokenizer;

/// Observable lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No index published yet
    Empty,
    /// First build in progress; queries still get `NotReady`
    Building,
    /// An index is published and serving queries
    Ready,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Empty => "empty",
            EngineState::Building => "building",
            EngineState::Ready => "ready",
        }
    }
}

/// Immutable published state: documents sorted by id plus their index
struct Snapshot {
    documents: Vec<Document>,
    index: InvertedIndex,
    stats: IndexStats,
}

impl Snapshot {
    fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents
            .binary_search_by_key(&id, |doc| doc.id)
            .ok()
            .map(|pos| &self.documents[pos])
    }

    fn hits(&self, ids: &[DocumentId]) -> Vec<SearchHit> {
        ids.iter()
            .filter_map(|&id| self.document(id))
            .map(SearchHit::from)
            .collect()
    }
}

/// Clears the building flag when a build attempt ends, however it ends
struct BuildingGuard<'a>(&'a AtomicBool);

impl<'a> BuildingGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for BuildingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owned, shareable search engine. Wrap in `Arc` to share across threads.
pub struct SearchEngine {
    config: EngineConfig,
    tokenizer: Tokenizer,
    ready: ArcSwapOption<Snapshot>,
    build_lock: Mutex<()>,
    building: AtomicBool,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        let tokenizer = Tokenizer::new(&config.tokenizer);
        Self {
            config,
            tokenizer,
            ready: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
            building: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        if self.ready.load().is_some() {
            EngineState::Ready
        } else if self.building.load(Ordering::Acquire) {
            EngineState::Building
        } else {
            EngineState::Empty
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == EngineState::Ready
    }

    /// Build the index from the full corpus
    pub fn build(&self, documents: impl IntoIterator<Item = Document>) -> Result<IndexStats> {
        self.build_with(documents, &CancelToken::new())
    }

    /// Build the index, honoring `cancel` until the moment of publication.
    ///
    /// On any error the engine's published state is unchanged: `Empty` stays
    /// `Empty`, and under `SwapOnRebuild` the previous index keeps serving.
    pub fn build_with(
        &self,
        documents: impl IntoIterator<Item = Document>,
        cancel: &CancelToken,
    ) -> Result<IndexStats> {
        let _lock = self.build_lock.lock();

        if self.config.build.policy == BuildPolicy::RejectRebuild && self.ready.load().is_some() {
            warn!("rejecting rebuild of an already published index");
            return Err(WikidexError::AlreadyBuilt);
        }

        let _building = BuildingGuard::set(&self.building);
        let start = Instant::now();

        let mut documents: Vec<Document> = documents.into_iter().collect();
        info!(
            documents = documents.len(),
            workers = self.config.build.workers,
            "building index"
        );

        let index = IndexBuilder::new(&self.tokenizer, self.config.build.clone())
            .build_with(&documents, cancel)
            .inspect_err(|e| warn!(error = %e, "index build aborted"))?;

        documents.sort_unstable_by_key(|doc| doc.id);
        let stats = IndexStats {
            documents: documents.len(),
            terms: index.term_count(),
            postings: index.posting_count(),
            build_ms: start.elapsed().as_millis() as u64,
        };

        // Last chance to back out before the index becomes visible
        if cancel.check().is_some() {
            warn!("index build cancelled before publish");
            return Err(WikidexError::BuildCancelled);
        }

        self.ready.store(Some(Arc::new(Snapshot {
            documents,
            index,
            stats: stats.clone(),
        })));

        info!(
            documents = stats.documents,
            terms = stats.terms,
            postings = stats.postings,
            elapsed_ms = stats.build_ms,
            "index ready"
        );
        Ok(stats)
    }

    /// Ids of documents matching `query`, ascending
    pub fn search(&self, query: &str) -> Result<Vec<DocumentId>> {
        self.search_with(query, &CancelToken::new())
    }

    pub fn search_with(&self, query: &str, cancel: &CancelToken) -> Result<Vec<DocumentId>> {
        let snapshot = self.snapshot()?;
        self.evaluate(&snapshot, query, cancel)
    }

    /// Search and resolve ids to result rows against the same snapshot
    pub fn search_hits(&self, query: &str, cancel: &CancelToken) -> Result<Vec<SearchHit>> {
        let snapshot = self.snapshot()?;
        let ids = self.evaluate(&snapshot, query, cancel)?;
        Ok(snapshot.hits(&ids))
    }

    /// Resolve ids to result rows; unknown ids are skipped
    pub fn hits(&self, ids: &[DocumentId]) -> Result<Vec<SearchHit>> {
        Ok(self.snapshot()?.hits(ids))
    }

    pub fn document(&self, id: DocumentId) -> Result<Option<Document>> {
        Ok(self.snapshot()?.document(id).cloned())
    }

    /// Statistics of the published index, if any
    pub fn stats(&self) -> Option<IndexStats> {
        self.ready.load_full().map(|snapshot| snapshot.stats.clone())
    }

    /// Run `f` against the published index
    pub fn with_index<R>(&self, f: impl FnOnce(&InvertedIndex) -> R) -> Result<R> {
        Ok(f(&self.snapshot()?.index))
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.ready.load_full().ok_or(WikidexError::NotReady)
    }

    fn evaluate(
        &self,
        snapshot: &Snapshot,
        query: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<DocumentId>> {
        let start = Instant::now();
        let ids = QueryEvaluator::new(&self.tokenizer, self.config.query.clone()).evaluate(
            query,
            &snapshot.index,
            cancel,
        )?;
        debug!(
            query,
            hits = ids.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );
        Ok(ids)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
