//! Gemini integration for Respi-Guard
//!
//! This crate provides the Gemini implementations of the `LLMProvider` and
//! `EmbeddingProvider` traits.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::GeminiClient;
pub use config::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_EMBEDDING_MODEL, DEFAULT_MODEL};

// Re-export core types for convenience
pub use respi_core::{
    LLMProvider, EmbeddingProvider, GenerationConfig, GenerationResult,
    Error, Result,
};
