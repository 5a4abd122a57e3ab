use std::sync::Arc;

use rusqlite::Connection;

use super::index::VectorIndex;
use super::{Embedder, RagError};

/// Snippets fetched per query unless the caller overrides it.
pub const DEFAULT_TOP_K: usize = 25;

/// Separator between snippets in the concatenated retrieval output.
pub const SNIPPET_SEPARATOR: &str = "\n\n---\n\n";

/// Read-only retrieval handle over the loaded vector index. Built once
/// at startup and shared; it never changes while the service runs.
pub struct Retriever {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl Retriever {
    pub fn new(index: VectorIndex, embedder: Arc<dyn Embedder>) -> Self {
        Self { index, embedder }
    }

    /// Load the retriever from the persisted chunk index. Fails with
    /// `NotInitialized` when no index has been built.
    pub fn load(conn: &Connection, embedder: Arc<dyn Embedder>) -> Result<Self, RagError> {
        let index = VectorIndex::load(conn)?;
        if index.is_empty() {
            return Err(RagError::NotInitialized);
        }
        Ok(Self::new(index, embedder))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The `top_k` snippets most similar to `query`, joined with
    /// `SNIPPET_SEPARATOR`, most similar first.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<String, RagError> {
        let query_embedding = self.embedder.embed(query).await?;
        let hits = self.index.search(&query_embedding, top_k);

        Ok(hits
            .into_iter()
            .map(|hit| hit.content)
            .collect::<Vec<_>>()
            .join(SNIPPET_SEPARATOR))
    }
}
