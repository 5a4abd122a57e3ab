use rusqlite::{params, Connection};

use super::RagError;
use crate::db::DatabaseError;

/// One indexed chunk with its embedding, as held in memory.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk_index: i64,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A search hit: snippet text plus its similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredSnippet {
    pub content: String,
    pub score: f32,
}

/// In-memory similarity index over the persisted chunks. Loaded once at
/// startup and read-only afterwards.
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    pub fn new(chunks: Vec<IndexedChunk>) -> Self {
        Self { chunks }
    }

    /// Load every chunk row, in document order.
    pub fn load(conn: &Connection) -> Result<Self, DatabaseError> {
        let mut stmt = conn
            .prepare("SELECT chunk_index, content, embedding FROM chunks ORDER BY chunk_index")?;
        let rows = stmt.query_map([], |row| {
            let blob: Vec<u8> = row.get(2)?;
            Ok(IndexedChunk {
                chunk_index: row.get(0)?,
                content: row.get(1)?,
                embedding: bytes_to_embedding(&blob),
            })
        })?;

        let mut chunks = Vec::new();
        for row in rows {
            chunks.push(row?);
        }
        Ok(Self::new(chunks))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The `top_k` chunks most similar to the query embedding, best
    /// first. The sort is stable, so equal scores keep document order.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredSnippet> {
        let mut scored: Vec<(f32, &IndexedChunk)> = self
            .chunks
            .iter()
            .map(|chunk| (cosine_similarity(query, &chunk.embedding), chunk))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(score, chunk)| ScoredSnippet {
                content: chunk.content.clone(),
                score,
            })
            .collect()
    }
}

/// Persist freshly embedded chunks. Chunk order is the document order.
pub fn store_chunks(
    conn: &Connection,
    contents: &[String],
    embeddings: &[Vec<f32>],
) -> Result<usize, RagError> {
    if contents.len() != embeddings.len() {
        return Err(RagError::EmbeddingMismatch {
            chunks: contents.len(),
            embeddings: embeddings.len(),
        });
    }

    for (i, (content, embedding)) in contents.iter().zip(embeddings).enumerate() {
        conn.execute(
            "INSERT INTO chunks (chunk_index, content, embedding) VALUES (?1, ?2, ?3)",
            params![i as i64, content, embedding_to_bytes(embedding)],
        )
        .map_err(DatabaseError::from)?;
    }
    Ok(contents.len())
}

pub fn count_chunks(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?)
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn chunk(i: i64, content: &str, embedding: Vec<f32>) -> IndexedChunk {
        IndexedChunk {
            chunk_index: i,
            content: content.to_string(),
            embedding,
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.5, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_handles_degenerate_input() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn search_ranks_by_similarity() {
        let index = VectorIndex::new(vec![
            chunk(0, "far", vec![0.0, 1.0]),
            chunk(1, "near", vec![1.0, 0.1]),
            chunk(2, "exact", vec![1.0, 0.0]),
        ]);

        let hits = index.search(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "exact");
        assert_eq!(hits[1].content, "near");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn equal_scores_keep_document_order() {
        let index = VectorIndex::new(vec![
            chunk(0, "first", vec![1.0, 0.0]),
            chunk(1, "second", vec![1.0, 0.0]),
            chunk(2, "third", vec![1.0, 0.0]),
        ]);

        let hits = index.search(&[1.0, 0.0], 3);
        let contents: Vec<&str> = hits.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
    }

    #[test]
    fn embedding_bytes_round_trip() {
        let original = vec![0.25f32, -1.5, 3.0e-7];
        let restored = bytes_to_embedding(&embedding_to_bytes(&original));
        assert_eq!(restored, original);
    }

    #[test]
    fn chunks_persist_and_reload_in_order() {
        let conn = open_in_memory().unwrap();
        let contents = vec!["alpha".to_string(), "beta".to_string()];
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0]];

        let stored = store_chunks(&conn, &contents, &embeddings).unwrap();
        assert_eq!(stored, 2);
        assert_eq!(count_chunks(&conn).unwrap(), 2);

        let index = VectorIndex::load(&conn).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.chunks[0].content, "alpha");
        assert_eq!(index.chunks[0].embedding, vec![1.0, 0.0]);
        assert_eq!(index.chunks[1].content, "beta");
    }

    #[test]
    fn mismatched_embedding_count_is_rejected() {
        let conn = open_in_memory().unwrap();
        let contents = vec!["alpha".to_string()];
        let err = store_chunks(&conn, &contents, &[]).unwrap_err();
        assert!(matches!(
            err,
            RagError::EmbeddingMismatch {
                chunks: 1,
                embeddings: 0
            }
        ));
    }
}
