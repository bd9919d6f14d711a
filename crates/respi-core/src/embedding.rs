//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Turns text into vectors for similarity search.
///
/// Documents and queries are embedded separately because retrieval-tuned
/// models encode them with different task hints.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a question for nearest-neighbour lookup
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of passages for storage, preserving input order
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Name of the embedding model
    fn model_id(&self) -> &str;
}
