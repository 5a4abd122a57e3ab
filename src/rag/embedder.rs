use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::RagError;

/// The embedding endpoint rejects oversized batches, so requests are
/// split into slices of at most this many inputs.
const MAX_BATCH_SIZE: usize = 10;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Text embedding backend used for both indexing and query embedding.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Client for an OpenAI-compatible /v1/embeddings endpoint.
pub struct HttpEmbedder {
    api_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl HttpEmbedder {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self, RagError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RagError::EmbeddingFailed(e.to_string()))?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    async fn post_embeddings(&self, input: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let url = format!("{}/v1/embeddings", self.api_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RagError::Connection(self.api_url.clone())
                } else {
                    RagError::EmbeddingFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::EmbeddingFailed(e.to_string()))?;

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let input = [text.to_string()];
        self.post_embeddings(&input)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::EmbeddingFailed("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            embeddings.extend(self.post_embeddings(batch).await?);
        }
        Ok(embeddings)
    }
}

/// Deterministic embedder for tests: the vector depends only on the
/// text bytes and is L2-normalized, so identical texts score 1.0.
pub struct MockEmbedder {
    dimension: usize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self { dimension: 16 }
    }
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    fn deterministic_vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimension] += f32::from(byte) / 255.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(self.deterministic_vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        Ok(texts.iter().map(|t| self.deterministic_vector(t)).collect())
    }
}
