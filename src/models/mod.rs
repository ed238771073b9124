pub mod document;
pub mod search;

pub use document::{Document, DocumentId, DocumentMetadata, PostingList};
pub use search::{IndexStats, SearchHit};
