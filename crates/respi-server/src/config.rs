//! Service configuration assembled from the environment

use serde::Serialize;
use std::env;
use std::path::PathBuf;

use respi_air::OpenWeatherConfig;
use respi_gemini::GeminiConfig;
use respi_rag::PineconeConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_DOCS_FOLDER: &str = "medical_docs";

#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    pub bind: String,
    pub docs_folder: PathBuf,
    pub gemini: GeminiConfig,
    pub pinecone: PineconeConfig,
    pub openweather: OpenWeatherConfig,
}

impl ServiceConfig {
    /// Load `.env` (overriding the process environment) and read every
    /// provider section. Missing keys are tolerated here.
    pub fn from_env() -> Self {
        dotenvy::dotenv_override().ok();

        Self {
            bind: env::var("RESPI_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            docs_folder: env::var("RESPI_DOCS_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOCS_FOLDER)),
            gemini: GeminiConfig::from_env(),
            pinecone: PineconeConfig::from_env(),
            openweather: OpenWeatherConfig::from_env(),
        }
    }

    /// Names of the API keys that are not set
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.gemini.is_configured() {
            missing.push("GOOGLE_API_KEY");
        }
        if self.pinecone.api_key.is_none() {
            missing.push("PINECONE_API_KEY");
        }
        if !self.openweather.is_configured() {
            missing.push("OPENWEATHER_API_KEY");
        }
        missing
    }

    pub fn warn_missing_keys(&self) {
        for key in self.missing_keys() {
            tracing::warn!("{} is not set; calls that need it will fail", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_are_listed() {
        let config = ServiceConfig {
            bind: DEFAULT_BIND.to_string(),
            docs_folder: PathBuf::from(DEFAULT_DOCS_FOLDER),
            gemini: GeminiConfig::new("g"),
            pinecone: PineconeConfig {
                api_key: None,
                ..PineconeConfig::new("unused")
            },
            openweather: OpenWeatherConfig {
                api_key: None,
                ..OpenWeatherConfig::new("unused")
            },
        };

        assert_eq!(config.missing_keys(), vec!["PINECONE_API_KEY", "OPENWEATHER_API_KEY"]);
    }
}
