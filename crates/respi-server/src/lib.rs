//! HTTP surface for Respi-Guard
//!
//! `POST /get-advisory` turns a location into a morning advisory grounded in
//! live air quality. `POST /ask-doctor` answers a free-form question.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod router;
pub mod state;

pub use config::{ServiceConfig, DEFAULT_BIND, DEFAULT_DOCS_FOLDER};
pub use error::{ApiError, AQI_UNAVAILABLE};
pub use router::app_router;
pub use state::AppState;

/// Serve the router on `bind` until the process is stopped
pub async fn serve(state: AppState, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Respi-Guard listening on {}", listener.local_addr()?);
    axum::serve(listener, app_router(std::sync::Arc::new(state))).await
}
