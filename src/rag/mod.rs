pub mod chunker;
pub mod embedder;
pub mod index;
pub mod indexer;
pub mod loader;
pub mod retriever;

pub use embedder::{Embedder, HttpEmbedder, MockEmbedder};
pub use index::{ScoredSnippet, VectorIndex};
pub use retriever::{Retriever, DEFAULT_TOP_K};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("vector index is not built; index a document before retrieval")]
    NotInitialized,
    #[error("cannot reach the embedding endpoint at {0}")]
    Connection(String),
    #[error("embedding endpoint returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("embedding request failed: {0}")]
    EmbeddingFailed(String),
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(PathBuf),
    #[error("cannot read document {path}: {reason}")]
    DocumentRead { path: PathBuf, reason: String },
    #[error("{chunks} chunks but {embeddings} embeddings")]
    EmbeddingMismatch { chunks: usize, embeddings: usize },
    #[error("database error: {0}")]
    Database(#[from] crate::db::DatabaseError),
}
