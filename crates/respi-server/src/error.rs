use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub const AQI_UNAVAILABLE: &str = "Failed to fetch AQI data";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("air quality unavailable")]
    AirQualityUnavailable,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<respi_core::Error> for ApiError {
    fn from(err: respi_core::Error) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::AirQualityUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, AQI_UNAVAILABLE.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
