use serde::{Deserialize, Serialize};

use super::document::{Document, DocumentId};

/// One result row handed to the response formatter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: DocumentId,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Document> for SearchHit {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            text: doc.text.clone(),
            title: doc.metadata.title.clone(),
            url: doc.metadata.url.clone(),
        }
    }
}

/// Summary of a published index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub postings: usize,
    pub build_ms: u64,
}
