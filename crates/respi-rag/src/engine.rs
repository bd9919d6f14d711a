//! Retrieval-augmented answer pipeline

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use respi_core::{
    AirQualityReading, EmbeddingProvider, GenerationConfig, LLMProvider,
    SearchConfig, VectorDocument, VectorStore, Result, DEFAULT_TEMPERATURE,
};

use crate::prompt::build_prompt;

/// Passages retrieved per question
pub const RETRIEVAL_TOP_K: usize = 3;

/// Label used for passages ingested without a recognised source
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Retrieved passages plus the context block built from them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieval {
    pub documents: Vec<VectorDocument>,
    pub context: String,
}

/// One block per passage, each closed by a `---` line
pub fn format_context(documents: &[VectorDocument]) -> String {
    documents
        .iter()
        .map(|doc| {
            format!(
                "CONTENT: {}\nSOURCE: {}\n---",
                doc.content,
                doc.source().unwrap_or(UNKNOWN_SOURCE)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Question sent through the pipeline for a morning advisory
pub fn advisory_question(reading: &AirQualityReading, user_profile: &str) -> String {
    format!(
        "Given PM2.5 = {} and AQI = {}, what precautions should someone with {} take?",
        reading.pm2_5_text(), reading.aqi_index, user_profile
    )
}

/// Embeds a question, pulls the nearest guideline passages, and asks the
/// model for an answer grounded in them. Holds only shared read-only handles.
pub struct RespiRagEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    llm: Arc<dyn LLMProvider>,
    generation: GenerationConfig,
    search: SearchConfig,
}

impl RespiRagEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        llm: Arc<dyn LLMProvider>,
    ) -> Self {
        let generation = GenerationConfig {
            model_id: llm.model_id().to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            ..Default::default()
        };

        Self {
            embedder,
            vector_store,
            llm,
            generation,
            search: SearchConfig {
                top_k: RETRIEVAL_TOP_K,
                ..Default::default()
            },
        }
    }

    /// Nearest passages for `question`, most similar first
    pub async fn retrieve(&self, question: &str) -> Result<Retrieval> {
        let embedding = self.embedder.embed_query(question).await?;
        let result = self
            .vector_store
            .search_by_vector(embedding, &self.search)
            .await?;

        let context = format_context(&result.documents);
        tracing::debug!(passages = result.documents.len(), "retrieved context");

        Ok(Retrieval {
            documents: result.documents,
            context,
        })
    }

    /// Run the full pipeline once. Errors from any stage are returned as-is.
    pub async fn answer(&self, question: &str, user_profile: &str, aqi_data: &str) -> Result<String> {
        let retrieval = self.retrieve(question).await?;
        let prompt = build_prompt(&retrieval.context, user_profile, aqi_data, question);

        let result = self
            .llm
            .generate_with_config(&prompt, &self.generation)
            .await?;

        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    fn passage(content: &str, metadata: serde_json::Value) -> VectorDocument {
        VectorDocument {
            id: content.to_string(),
            content: content.to_string(),
            embedding: None,
            metadata,
            score: Some(0.9),
        }
    }

    #[test]
    fn test_format_context() {
        let docs = vec![
            passage(
                r#"{"pollutant":"PM2.5","24h_aqg":15}"#,
                json!({"source": "WHO Air Quality Guidelines"}),
            ),
            passage("\"Avoid smoking\"", json!({"file": "misc.json"})),
        ];

        assert_snapshot!(format_context(&docs), @r#"
        CONTENT: {"pollutant":"PM2.5","24h_aqg":15}
        SOURCE: WHO Air Quality Guidelines
        ---
        CONTENT: "Avoid smoking"
        SOURCE: Unknown Source
        ---
        "#);
    }

    #[test]
    fn test_format_context_empty() {
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_advisory_question() {
        let reading = AirQualityReading { aqi_index: 4, pm2_5: 61.2 };
        assert_eq!(
            advisory_question(&reading, "Asthma, mild"),
            "Given PM2.5 = 61.2 and AQI = 4, what precautions should someone with Asthma, mild take?"
        );

        let whole = AirQualityReading { aqi_index: 3, pm2_5: 55.0 };
        assert_eq!(
            advisory_question(&whole, "General Public"),
            "Given PM2.5 = 55.0 and AQI = 3, what precautions should someone with General Public take?"
        );
    }
}
