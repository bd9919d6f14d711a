//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Name of the managed index every slice is written to and read from
pub const INDEX_NAME: &str = "respi-guard";

/// A document stored in the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,
    pub content: String,
    pub embedding: Option<Vec<f32>>,
    pub metadata: serde_json::Value,
    pub score: Option<f32>,
}

impl VectorDocument {
    /// Source guideline this passage came from, when it was tagged at ingestion
    pub fn source(&self) -> Option<&str> {
        self.metadata
            .get("source")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Search result from vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub documents: Vec<VectorDocument>,
    pub total: usize,
}

/// Configuration for vector search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    pub score_threshold: Option<f32>,
    pub filters: Option<serde_json::Value>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: None,
            filters: None,
        }
    }
}

/// Trait for vector stores (e.g., Pinecone, in-memory)
///
/// Results from `search_by_vector` are ordered by descending similarity.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Initialize the vector store connection
    async fn connect(&mut self) -> Result<()>;

    /// Upsert documents that already carry embeddings; returns their IDs
    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>>;

    /// Search using a vector embedding
    async fn search_by_vector(&self, vector: Vec<f32>, config: &SearchConfig) -> Result<SearchResult>;

    /// Get the total number of documents
    async fn count(&self) -> Result<usize>;

    /// Check if the vector store is connected
    fn is_connected(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(metadata: serde_json::Value) -> VectorDocument {
        VectorDocument {
            id: "1".to_string(),
            content: "text".to_string(),
            embedding: None,
            metadata,
            score: None,
        }
    }

    #[test]
    fn test_source_lookup() {
        let tagged = doc(json!({"source": "WHO IHR 2005", "doc_type": "International_Regulation"}));
        assert_eq!(tagged.source(), Some("WHO IHR 2005"));

        assert_eq!(doc(json!({})).source(), None);
        assert_eq!(doc(json!({"source": ""})).source(), None);
        assert_eq!(doc(json!({"source": 7})).source(), None);
    }

    #[test]
    fn test_default_search_config() {
        let config = SearchConfig::default();
        assert_eq!(config.top_k, 3);
        assert!(config.score_threshold.is_none());
    }
}
