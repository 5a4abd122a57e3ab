use std::path::Path;

use rusqlite::Connection;

use super::{chunker, index, loader, Embedder, RagError};

/// Build the persisted chunk index from a source document. A non-empty
/// index is left untouched, so startup can call this unconditionally.
/// Returns the number of chunks written.
pub async fn build_index(
    conn: &Connection,
    embedder: &dyn Embedder,
    document_path: &Path,
) -> Result<usize, RagError> {
    if index::count_chunks(conn)? > 0 {
        tracing::info!("vector index already built, skipping");
        return Ok(0);
    }

    let text = loader::load_document(document_path)?;
    let chunks = chunker::split_into_chunks(
        &text,
        chunker::CHUNK_SIZE_WORDS,
        chunker::CHUNK_OVERLAP_WORDS,
    );
    if chunks.is_empty() {
        tracing::warn!(path = %document_path.display(), "document produced no chunks");
        return Ok(0);
    }

    let embeddings = embedder.embed_batch(&chunks).await?;
    let stored = index::store_chunks(conn, &chunks, &embeddings)?;
    tracing::info!(chunks = stored, "vector index built");
    Ok(stored)
}
