use std::sync::Arc;

use respi_air::OpenWeatherClient;
use respi_core::{AirQualityProvider, Result, VectorStore};
use respi_gemini::GeminiClient;
use respi_rag::{PineconeVectorStore, RespiRagEngine};

use crate::config::ServiceConfig;

/// Read-only handles shared by every request
pub struct AppState {
    pub air_quality: Arc<dyn AirQualityProvider>,
    pub engine: Arc<RespiRagEngine>,
}

impl AppState {
    pub fn new(air_quality: Arc<dyn AirQualityProvider>, engine: Arc<RespiRagEngine>) -> Self {
        Self { air_quality, engine }
    }

    /// Build the production clients. An index that cannot be resolved is
    /// logged and left unconnected, so queries fail per request instead.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(config.gemini.clone())?);

        let mut index = PineconeVectorStore::new(config.pinecone.clone())?;
        if let Err(e) = index.connect().await {
            tracing::warn!(index = %config.pinecone.index_name, "vector index unavailable: {}", e);
        }

        let engine = RespiRagEngine::new(gemini.clone(), Arc::new(index), gemini);
        let air_quality = Arc::new(OpenWeatherClient::new(config.openweather.clone())?);

        Ok(Self::new(air_quality, Arc::new(engine)))
    }
}
