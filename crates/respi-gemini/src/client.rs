//! Gemini client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use respi_core::{
    EmbeddingProvider, GenerationConfig, GenerationResult, LLMProvider,
    Error, Result,
};

use crate::config::GeminiConfig;

/// Gemini accepts at most this many requests per batchEmbedContents call
const MAX_EMBED_BATCH: usize = 100;

/// Gemini client for both text generation and embeddings
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: text.to_string() }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationParams,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Plain text of the first candidate, parts concatenated in order
    pub(crate) fn text(&self) -> Result<String> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| Error::LLMProvider("Gemini returned no candidates".to_string()))?;

        let text = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
    pub task_type: &'static str,
}

#[derive(Debug, Serialize)]
struct BatchEmbedContentsRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedContentsResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

/// Task hints understood by retrieval-tuned Gemini embedding models
pub(crate) const TASK_RETRIEVAL_QUERY: &str = "RETRIEVAL_QUERY";
pub(crate) const TASK_RETRIEVAL_DOCUMENT: &str = "RETRIEVAL_DOCUMENT";

impl GeminiClient {
    /// Create a new Gemini client from configuration.
    ///
    /// No request timeout is set; generation latency is bounded only by the
    /// provider.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new Gemini client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Authentication("GOOGLE_API_KEY is not set".to_string()))
    }

    /// `{base}/v1beta/models/{model}:{method}`, tolerating a `models/` prefix on the name
    pub(crate) fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            model,
            method
        )
    }

    fn embedding_model_name(&self) -> String {
        let model = &self.config.embedding_model;
        if model.starts_with("models/") {
            model.clone()
        } else {
            format!("models/{}", model)
        }
    }

    async fn post_json<B, R>(&self, url: &str, body: &B, on_status: fn(String) -> Error) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(on_status(format!(
                "Gemini API request failed with status {}: {}",
                status, error_text
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    fn embed_request(&self, text: &str, task_type: &'static str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: self.embedding_model_name(),
            content: Content::text(None, text),
            task_type,
        }
    }
}

#[async_trait]
impl LLMProvider for GeminiClient {
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request_body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: GenerationParams {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                top_p: config.top_p,
                top_k: config.top_k,
            },
        };

        let url = self.model_url(&config.model_id, "generateContent");
        let response: GenerateContentResponse = self
            .post_json(&url, &request_body, Error::LLMProvider)
            .await?;

        let text = response.text()?;
        tracing::debug!(model = %config.model_id, chars = text.len(), "generation complete");

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
            tokens_used: response.usage_metadata.and_then(|u| u.total_token_count),
        })
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.model_url(&self.config.embedding_model, "embedContent");
        let request_body = self.embed_request(text, TASK_RETRIEVAL_QUERY);

        let response: EmbedContentResponse = self
            .post_json(&url, &request_body, Error::Embedding)
            .await?;

        Ok(response.embedding.values)
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = self.model_url(&self.config.embedding_model, "batchEmbedContents");
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(MAX_EMBED_BATCH) {
            let request_body = BatchEmbedContentsRequest {
                requests: batch
                    .iter()
                    .map(|text| self.embed_request(text, TASK_RETRIEVAL_DOCUMENT))
                    .collect(),
            };

            let response: BatchEmbedContentsResponse = self
                .post_json(&url, &request_body, Error::Embedding)
                .await?;

            if response.embeddings.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            vectors.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(vectors)
    }

    fn model_id(&self) -> &str {
        &self.config.embedding_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("test_key")).unwrap()
    }

    #[test]
    fn test_model_url() {
        let client = client();
        assert_eq!(
            client.model_url("gemini-1.5-pro", "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
        assert_eq!(
            client.model_url("models/embedding-001", "embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:embedContent"
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "Based on the WHO "}, {"text": "guidelines..."}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"totalTokenCount": 42}
        }))
        .unwrap();

        assert_eq!(response.text().unwrap(), "Based on the WHO guidelines...");
    }

    #[test]
    fn test_response_without_candidates_is_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(response.text(), Err(Error::LLMProvider(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_authentication_error() {
        let mut config = GeminiConfig::new("unused");
        config.api_key = None;
        let client = GeminiClient::new(config).unwrap();

        let err = client.embed_query("hello").await.unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }
}
