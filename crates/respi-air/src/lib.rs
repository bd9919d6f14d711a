//! Live air-quality lookups for Respi-Guard
//!
//! Wraps the OpenWeather Air Pollution API behind the `AirQualityProvider`
//! trait and coerces the loosely typed coordinates clients send.

mod client;
mod config;
mod coords;


pub use client::{OpenWeatherClient, build_request_url};
pub use config::{OpenWeatherConfig, DEFAULT_API_BASE, REQUEST_TIMEOUT};
pub use coords::coerce_coordinate;

// Re-export core types for convenience
pub use respi_core::{AirQualityProvider, AirQualityReading, Error, Result};
