use thiserror::Error;

/// Main error type for Wikidex operations
#[derive(Error, Debug)]
pub enum WikidexError {
    #[error("Index not ready: no successful build yet")]
    NotReady,

    #[error("Index already built")]
    AlreadyBuilt,

    #[error("Build cancelled before the index was published")]
    BuildCancelled,

    #[error("Search cancelled")]
    SearchCancelled,

    #[error("Search deadline exceeded")]
    DeadlineExceeded,

    #[error("Duplicate document id: {0}")]
    DuplicateDocumentId(u64),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Wikidex operations
pub type Result<T> = std::result::Result<T, WikidexError>;

impl WikidexError {
    /// Check if this error indicates a transient failure that could be retried
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            WikidexError::NotReady | WikidexError::SearchCancelled | WikidexError::DeadlineExceeded
        )
    }

    /// Short machine-readable error kind, used in API responses and metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            WikidexError::NotReady => "not_ready",
            WikidexError::AlreadyBuilt => "already_built",
            WikidexError::BuildCancelled => "build_cancelled",
            WikidexError::SearchCancelled => "search_cancelled",
            WikidexError::DeadlineExceeded => "deadline_exceeded",
            WikidexError::DuplicateDocumentId(_) => "duplicate_document_id",
            WikidexError::BuildFailed(_) => "build_failed",
            WikidexError::Corpus(_) => "corpus_error",
            WikidexError::Serialization(_) => "serialization_error",
            WikidexError::Io(_) => "io_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WikidexError::DuplicateDocumentId(42);
        assert_eq!(err.to_string(), "Duplicate document id: 42");
        assert_eq!(
            WikidexError::NotReady.to_string(),
            "Index not ready: no successful build yet"
        );
    }

    #[test]
    fn test_retriable_errors() {
        assert!(WikidexError::NotReady.is_retriable());
        assert!(WikidexError::DeadlineExceeded.is_retriable());
        assert!(!WikidexError::AlreadyBuilt.is_retriable());
        assert!(!WikidexError::BuildCancelled.is_retriable());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(WikidexError::NotReady.kind(), "not_ready");
        assert_eq!(WikidexError::SearchCancelled.kind(), "search_cancelled");
    }
}
