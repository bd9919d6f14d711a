//! Core traits and types for Respi-Guard
//!
//! This crate defines the seams between the advisory service and the outside
//! world: generative models, embedding models, vector indexes, and air-quality
//! providers. Concrete clients live in sibling crates so every seam can be
//! swapped for an in-process fake in tests.

pub mod llm;
pub mod embedding;
pub mod vector_store;
pub mod document;
pub mod air_quality;
pub mod error;

pub use error::{Error, Result};
pub use llm::{LLMProvider, GenerationConfig, GenerationResult, DEFAULT_TEMPERATURE};
pub use embedding::EmbeddingProvider;
pub use vector_store::{VectorStore, VectorDocument, SearchResult, SearchConfig, INDEX_NAME};
pub use document::{DocType, DocumentSlice, SliceMetadata};
pub use air_quality::{AirQualityProvider, AirQualityReading};
