use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::inverted::InvertedIndex;
use crate::cancel::CancelToken;
use crate::config::BuildConfig;
use crate::error::{Result, WikidexError};
use crate::models::{Document, DocumentId, PostingList};
use crate::tokenizer::Tokenizer;

/// Postings accumulated by one worker over one contiguous chunk
type PartialIndex = HashMap<String, Vec<DocumentId>>;

/// One-shot inverted index builder.
///
/// Each worker tokenizes a contiguous chunk of the corpus into a private
/// partial index; partials are merged and every posting list is sorted and
/// deduplicated on finalize. The result does not depend on the worker count.
pub struct IndexBuilder<'a> {
    tokenizer: &'a Tokenizer,
    config: BuildConfig,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(tokenizer: &'a Tokenizer, config: BuildConfig) -> Self {
        Self { tokenizer, config }
    }

    /// Build without a cancellation signal
    pub fn build(&self, documents: &[Document]) -> Result<InvertedIndex> {
        self.build_with(documents, &CancelToken::new())
    }

    /// Build, polling `cancel` between documents. Any interrupt (explicit or
    /// deadline) yields `BuildCancelled`.
    pub fn build_with(&self, documents: &[Document], cancel: &CancelToken) -> Result<InvertedIndex> {
        check_unique_ids(documents)?;
        if documents.is_empty() {
            return Ok(InvertedIndex::empty());
        }

        let workers = self.config.workers.clamp(1, documents.len());
        let chunk_size = documents.len().div_ceil(workers);
        debug!(
            documents = documents.len(),
            workers, chunk_size, "tokenizing corpus"
        );

        let partials = if workers == 1 {
            vec![self.index_chunk(documents, cancel)?]
        } else {
            self.index_parallel(documents, chunk_size, cancel)?
        };

        if cancel.check().is_some() {
            return Err(WikidexError::BuildCancelled);
        }

        Ok(merge(partials, documents.len()))
    }

    fn index_parallel(
        &self,
        documents: &[Document],
        chunk_size: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<PartialIndex>> {
        let joined = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = documents
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move |_| self.index_chunk(chunk, cancel)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        })
        .map_err(|_| worker_panicked())?;

        let mut partials = Vec::with_capacity(joined.len());
        for result in joined {
            partials.push(result.map_err(|_| worker_panicked())??);
        }
        Ok(partials)
    }

    fn index_chunk(&self, chunk: &[Document], cancel: &CancelToken) -> Result<PartialIndex> {
        let interval = self.config.cancel_check_interval.max(1);
        let mut partial = PartialIndex::new();

        for (n, doc) in chunk.iter().enumerate() {
            if n % interval == 0 && cancel.check().is_some() {
                return Err(WikidexError::BuildCancelled);
            }
            // Presence only: a term repeated within one document is one posting
            for term in self.tokenizer.unique_terms(&doc.text) {
                partial.entry(term).or_default().push(doc.id);
            }
        }

        Ok(partial)
    }
}

fn worker_panicked() -> WikidexError {
    WikidexError::BuildFailed("indexing worker panicked".to_string())
}

fn check_unique_ids(documents: &[Document]) -> Result<()> {
    let mut seen = HashSet::with_capacity(documents.len());
    for doc in documents {
        if !seen.insert(doc.id) {
            return Err(WikidexError::DuplicateDocumentId(doc.id));
        }
    }
    Ok(())
}

fn merge(partials: Vec<PartialIndex>, document_count: usize) -> InvertedIndex {
    let mut partials = partials.into_iter();
    let mut merged = partials.next().unwrap_or_default();
    for partial in partials {
        for (term, ids) in partial {
            merged.entry(term).or_default().extend(ids);
        }
    }

    let postings: BTreeMap<String, PostingList> = merged
        .into_iter()
        .map(|(term, ids)| (term, PostingList::from_unsorted(ids)))
        .collect();

    InvertedIndex::from_postings(postings, document_count)
}
