//! Request handlers. Every call is independent; nothing is remembered between requests.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use respi_air::coerce_coordinate;
use respi_core::{AirQualityReading, INDEX_NAME};
use respi_rag::advisory_question;

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_ADVISORY_PROFILE: &str = "Healthy, no conditions";
pub const DEFAULT_CHAT_PROFILE: &str = "General Public";
pub const DEFAULT_AQI_CONTEXT: &str = "Unknown";

#[derive(Debug, Deserialize)]
pub struct AdvisoryRequest {
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lon: Value,
    #[serde(default)]
    pub user_profile: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AdvisoryResponse {
    pub aqi: AirQualityReading,
    pub advisory: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub user_profile: Option<Value>,
    #[serde(default)]
    pub aqi_context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

/// Strings pass through as-is; other JSON values are rendered as JSON text
fn text_or(value: Option<Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "index": INDEX_NAME }))
}

pub async fn get_advisory(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdvisoryRequest>,
) -> Result<Json<AdvisoryResponse>, ApiError> {
    let lat = coerce_coordinate(&request.lat)?;
    let lon = coerce_coordinate(&request.lon)?;
    let user_profile = text_or(request.user_profile, DEFAULT_ADVISORY_PROFILE);

    let reading = state
        .air_quality
        .live_aqi(lat, lon)
        .await
        .ok_or(ApiError::AirQualityUnavailable)?;

    let question = advisory_question(&reading, &user_profile);
    let advisory = state
        .engine
        .answer(&question, &user_profile, &reading.to_string())
        .await?;

    Ok(Json(AdvisoryResponse {
        aqi: reading,
        advisory,
    }))
}

pub async fn ask_doctor(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let user_profile = text_or(request.user_profile, DEFAULT_CHAT_PROFILE);
    let aqi_context = text_or(request.aqi_context, DEFAULT_AQI_CONTEXT);

    let response = state
        .engine
        .answer(&request.query, &user_profile, &aqi_context)
        .await?;

    Ok(Json(AskResponse { response }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_or_defaults_and_renders() {
        assert_eq!(text_or(None, DEFAULT_AQI_CONTEXT), "Unknown");
        assert_eq!(text_or(Some(Value::Null), DEFAULT_CHAT_PROFILE), "General Public");
        assert_eq!(text_or(Some(json!("Asthmatic")), DEFAULT_CHAT_PROFILE), "Asthmatic");
        assert_eq!(
            text_or(Some(json!({"aqi_index": 3})), DEFAULT_AQI_CONTEXT),
            r#"{"aqi_index":3}"#
        );
    }
}
