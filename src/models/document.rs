use serde::{Deserialize, Serialize};

/// Unique document identifier, assigned in load order
pub type DocumentId = u64;

/// Document with searchable text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Document metadata, carried for result formatting only (never indexed)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl Document {
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            metadata: DocumentMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Inverted index entry: ascending, duplicate-free document ids for one term
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    doc_ids: Vec<DocumentId>,
}

impl PostingList {
    /// Finalize raw ids accumulated in any order
    pub fn from_unsorted(mut doc_ids: Vec<DocumentId>) -> Self {
        doc_ids.sort_unstable();
        doc_ids.dedup();
        doc_ids.shrink_to_fit();
        Self { doc_ids }
    }

    pub fn as_slice(&self) -> &[DocumentId] {
        &self.doc_ids
    }

    pub fn contains(&self, doc_id: DocumentId) -> bool {
        self.doc_ids.binary_search(&doc_id).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// Number of documents containing this term
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_list_finalize() {
        let posting = PostingList::from_unsorted(vec![7, 2, 9, 2, 7]);
        assert_eq!(posting.as_slice(), &[2, 7, 9]);
        assert_eq!(posting.len(), 3);
        assert!(posting.contains(9));
        assert!(!posting.contains(3));
    }

    #[test]
    fn test_empty_posting_list() {
        let posting = PostingList::from_unsorted(Vec::new());
        assert!(posting.is_empty());
        assert!(!posting.contains(0));
    }

    #[test]
    fn test_document_metadata_default() {
        let doc = Document::new(3, "Small wild cat");
        assert_eq!(doc.id, 3);
        assert!(doc.metadata.title.is_none());
        assert!(doc.metadata.url.is_none());
    }
}
