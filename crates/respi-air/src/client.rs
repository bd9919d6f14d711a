//! OpenWeather air-pollution client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use respi_core::{AirQualityProvider, AirQualityReading, Error, Result};

use crate::config::{OpenWeatherConfig, REQUEST_TIMEOUT};

#[derive(Debug, Deserialize)]
struct PollutionResponse {
    list: Vec<PollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct PollutionEntry {
    main: PollutionIndex,
    components: PollutionComponents,
}

#[derive(Debug, Deserialize)]
struct PollutionIndex {
    aqi: i64,
}

#[derive(Debug, Deserialize)]
struct PollutionComponents {
    pm2_5: f64,
}

/// Air-pollution lookup URL for one coordinate pair
pub fn build_request_url(api_base: &str, lat: f64, lon: f64, api_key: &str) -> Result<Url> {
    let endpoint = format!("{}/data/2.5/air_pollution", api_base.trim_end_matches('/'));

    Url::parse_with_params(
        &endpoint,
        &[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", api_key.to_string()),
        ],
    )
    .map_err(|e| Error::Configuration(format!("Invalid OpenWeather base URL: {}", e)))
}

/// First reading of a body that carries a `list`
fn parse_reading(body: Value) -> Result<AirQualityReading> {
    let response: PollutionResponse = serde_json::from_value(body)?;
    let entry = response
        .list
        .into_iter()
        .next()
        .ok_or_else(|| Error::Serialization("Empty pollution list".to_string()))?;

    Ok(AirQualityReading {
        aqi_index: entry.main.aqi,
        pm2_5: entry.components.pm2_5,
    })
}

pub struct OpenWeatherClient {
    config: OpenWeatherConfig,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new(config: OpenWeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OpenWeatherConfig::from_env())
    }

    pub fn config(&self) -> &OpenWeatherConfig {
        &self.config
    }

    /// One GET; the body is decoded whatever the status code
    async fn fetch(&self, lat: f64, lon: f64) -> Result<Value> {
        let url = build_request_url(
            &self.config.api_base,
            lat,
            lon,
            self.config.api_key.as_deref().unwrap_or_default(),
        )?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(e.to_string())
            } else {
                Error::Network(e.to_string())
            }
        })?;

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[async_trait]
impl AirQualityProvider for OpenWeatherClient {
    async fn live_aqi(&self, lat: f64, lon: f64) -> Option<AirQualityReading> {
        let body = match self.fetch(lat, lon).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("[AQI lookup crash]: {}", e);
                return None;
            }
        };

        if body.get("list").is_none() {
            let message = match body.get("message") {
                Some(Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => "Unknown Error".to_string(),
            };
            tracing::error!("OpenWeather error: {}", message);
            return None;
        }

        match parse_reading(body) {
            Ok(reading) => {
                tracing::debug!(aqi = reading.aqi_index, pm2_5 = reading.pm2_5, "fetched air quality");
                Some(reading)
            }
            Err(e) => {
                tracing::error!("[AQI lookup crash]: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_request_url() {
        let url = build_request_url("http://api.openweathermap.org/", 28.6, 77.2, "ow-key").unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.openweathermap.org/data/2.5/air_pollution?lat=28.6&lon=77.2&appid=ow-key"
        );
    }

    #[test]
    fn test_parse_reading() {
        let body = json!({
            "coord": {"lon": 77.2, "lat": 28.6},
            "list": [{
                "main": {"aqi": 5},
                "components": {"pm2_5": 182.4, "pm10": 240.1},
                "dt": 1700000000
            }]
        });
        assert_eq!(
            parse_reading(body).unwrap(),
            AirQualityReading { aqi_index: 5, pm2_5: 182.4 }
        );
    }

    #[test]
    fn test_parse_reading_rejects_empty_or_partial_list() {
        assert!(parse_reading(json!({"list": []})).is_err());
        assert!(parse_reading(json!({"list": [{"main": {"aqi": 2}}]})).is_err());
    }
}
