//! Retrieval-augmented generation for Respi-Guard
//!
//! Ingests JSON medical guidelines into a vector index, retrieves the nearest
//! passages for a question, and renders the grounded prompt sent to the model.

mod classifier;
mod ingest;
mod vector_store;
mod prompt;
mod engine;


pub use classifier::classify;
pub use ingest::{
    DocumentIngestor, IdStrategy, IngestOptions, IngestReport, SlicePath, SLICE_PATHS,
    extract_slices, json_files, load_file, slice_id,
};
pub use vector_store::{LocalVectorStore, PineconeConfig, PineconeVectorStore, TEXT_KEY};
pub use prompt::{build_prompt, FALLBACK_ANSWER};
pub use engine::{
    RespiRagEngine, Retrieval, RETRIEVAL_TOP_K, UNKNOWN_SOURCE, advisory_question, format_context,
};

// Re-export core types for convenience
pub use respi_core::{
    VectorStore, VectorDocument, SearchResult, SearchConfig,
    DocType, DocumentSlice, SliceMetadata,
    Error, Result,
};
