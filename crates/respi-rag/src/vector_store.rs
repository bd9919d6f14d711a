//! Vector store implementations

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::env;
use std::sync::{Arc, RwLock};

use respi_core::{
    VectorStore, VectorDocument, SearchResult, SearchConfig,
    Error, Result, INDEX_NAME,
};

/// Metadata key holding the passage text inside the index
pub const TEXT_KEY: &str = "text";

/// Local in-memory vector store implementation
pub struct LocalVectorStore {
    documents: Arc<RwLock<HashMap<String, VectorDocument>>>,
    connected: bool,
}

impl LocalVectorStore {
    /// Create a new local vector store
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            connected: false,
        }
    }

    /// Simple cosine similarity calculation
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut docs = self.documents.write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        for document in documents {
            if document.embedding.is_none() {
                return Err(Error::VectorStore(format!("Document {} has no embedding", document.id)));
            }
            let id = document.id.clone();
            docs.insert(id.clone(), document);
            ids.push(id);
        }

        Ok(ids)
    }

    async fn search_by_vector(&self, vector: Vec<f32>, config: &SearchConfig) -> Result<SearchResult> {
        let docs = self.documents.read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let mut results: Vec<VectorDocument> = docs
            .values()
            .filter_map(|doc| {
                let embedding = doc.embedding.as_ref()?;
                let mut doc_with_score = doc.clone();
                doc_with_score.score = Some(Self::cosine_similarity(&vector, embedding));
                Some(doc_with_score)
            })
            .filter(|doc| {
                config
                    .score_threshold
                    .is_none_or(|threshold| doc.score.unwrap_or(0.0) >= threshold)
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .total_cmp(&a.score.unwrap_or(0.0))
                .then_with(|| a.id.cmp(&b.id))
        });

        results.truncate(config.top_k);

        let total = results.len();

        Ok(SearchResult {
            documents: results,
            total,
        })
    }

    async fn count(&self) -> Result<usize> {
        let docs = self.documents.read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(docs.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Configuration for the Pinecone index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub index_name: String,
    /// Data-plane host; looked up from the control plane when absent
    pub index_host: Option<String>,
    pub controller_url: String,
}

impl PineconeConfig {
    pub const DEFAULT_CONTROLLER_URL: &'static str = "https://api.pinecone.io";
    pub const API_VERSION: &'static str = "2024-07";

    /// Create configuration from environment variables. A missing key is
    /// reported by the caller, not here.
    pub fn from_env() -> Self {
        dotenvy::dotenv_override().ok();

        Self {
            api_key: env::var("PINECONE_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            index_name: INDEX_NAME.to_string(),
            index_host: env::var("PINECONE_INDEX_HOST").ok().filter(|h| !h.trim().is_empty()),
            controller_url: env::var("PINECONE_CONTROLLER_URL")
                .unwrap_or_else(|_| Self::DEFAULT_CONTROLLER_URL.to_string()),
        }
    }

    /// Create configuration with explicit values
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            index_name: INDEX_NAME.to_string(),
            index_host: None,
            controller_url: Self::DEFAULT_CONTROLLER_URL.to_string(),
        }
    }

    pub fn with_index_host(mut self, host: impl Into<String>) -> Self {
        self.index_host = Some(host.into());
        self
    }

    pub fn with_controller_url(mut self, url: impl Into<String>) -> Self {
        self.controller_url = url.into();
        self
    }
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Serialize)]
struct PineconeVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Value,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<PineconeVector<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Value>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    score: Option<f32>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStats {
    #[serde(default)]
    total_vector_count: usize,
}

/// Pinecone serverless index accessed over its REST API
pub struct PineconeVectorStore {
    config: PineconeConfig,
    client: Client,
    host: Option<String>,
}

impl PineconeVectorStore {
    pub fn new(config: PineconeConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            host: None,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(PineconeConfig::from_env())
    }

    pub fn config(&self) -> &PineconeConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Authentication("PINECONE_API_KEY is not set".to_string()))
    }

    fn host(&self) -> Result<&str> {
        self.host.as_deref().ok_or_else(|| {
            Error::VectorStore(format!(
                "Index '{}' is not connected",
                self.config.index_name
            ))
        })
    }

    /// Hosts come back from the control plane without a scheme
    fn normalize_host(host: &str) -> String {
        let host = host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}{}", self.host()?, path);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", self.api_key()?)
            .header("X-Pinecone-API-Version", PineconeConfig::API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::VectorStore(format!(
                "Pinecone request to {} failed with status {}: {}",
                path, status, error_text
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    fn to_pinecone_metadata(document: &VectorDocument) -> Value {
        let mut metadata = match &document.metadata {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("metadata".to_string(), json!(other.to_string()));
                map
            }
        };
        metadata.insert(TEXT_KEY.to_string(), json!(document.content));
        Value::Object(metadata)
    }

    fn from_match(matched: QueryMatch) -> VectorDocument {
        let mut metadata = matched.metadata.unwrap_or_default();
        let content = match metadata.remove(TEXT_KEY) {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        VectorDocument {
            id: matched.id,
            content,
            embedding: None,
            metadata: Value::Object(metadata),
            score: matched.score,
        }
    }
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    async fn connect(&mut self) -> Result<()> {
        if let Some(ref host) = self.config.index_host {
            self.host = Some(Self::normalize_host(host));
            return Ok(());
        }

        let url = format!(
            "{}/indexes/{}",
            self.config.controller_url.trim_end_matches('/'),
            self.config.index_name
        );

        let response = self
            .client
            .get(&url)
            .header("Api-Key", self.api_key()?)
            .header("X-Pinecone-API-Version", PineconeConfig::API_VERSION)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::VectorStore(format!(
                "Describing index '{}' failed: {}",
                self.config.index_name,
                response.status()
            )));
        }

        let described: DescribeIndexResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        self.host = Some(Self::normalize_host(&described.host));
        tracing::info!(index = %self.config.index_name, host = ?self.host, "resolved Pinecone index host");
        Ok(())
    }

    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut vectors = Vec::with_capacity(documents.len());
        for document in &documents {
            let values = document.embedding.as_deref().ok_or_else(|| {
                Error::VectorStore(format!("Document {} has no embedding", document.id))
            })?;
            vectors.push(PineconeVector {
                id: &document.id,
                values,
                metadata: Self::to_pinecone_metadata(document),
            });
        }

        let _: Value = self.post("/vectors/upsert", &UpsertRequest { vectors }).await?;

        Ok(documents.into_iter().map(|d| d.id).collect())
    }

    async fn search_by_vector(&self, vector: Vec<f32>, config: &SearchConfig) -> Result<SearchResult> {
        let request = QueryRequest {
            vector: &vector,
            top_k: config.top_k,
            include_metadata: true,
            include_values: false,
            filter: config.filters.as_ref(),
        };

        let response: QueryResponse = self.post("/query", &request).await?;

        let documents: Vec<VectorDocument> = response
            .matches
            .into_iter()
            .map(Self::from_match)
            .filter(|doc| {
                config
                    .score_threshold
                    .is_none_or(|threshold| doc.score.unwrap_or(0.0) >= threshold)
            })
            .collect();

        let total = documents.len();
        Ok(SearchResult { documents, total })
    }

    async fn count(&self) -> Result<usize> {
        let stats: IndexStats = self.post("/describe_index_stats", &json!({})).await?;
        Ok(stats.total_vector_count)
    }

    fn is_connected(&self) -> bool {
        self.host.is_some()
    }
}
