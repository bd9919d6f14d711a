//! Folder ingestion: JSON guideline files to tagged, embedded index entries

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use respi_core::{
    DocumentSlice, EmbeddingProvider, SliceMetadata, VectorDocument, VectorStore,
    Error, Result,
};

use crate::classifier::classify;

/// How a path expression is applied to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicePath {
    /// `.key[]`: one slice per array element
    Each(&'static str),
    /// `.key`: the whole value as one slice
    Whole(&'static str),
}

/// The three fixed extractions, in the order slices are produced
pub const SLICE_PATHS: [SlicePath; 3] = [
    SlicePath::Each("pollutant_standards"),
    SlicePath::Whole("general_health_risks"),
    SlicePath::Each("good_practice_statements"),
];

/// How vector IDs are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdStrategy {
    /// Fresh UUID per slice; re-running appends duplicates
    #[default]
    Random,
    /// md5 of file, position and content; re-running overwrites
    ContentHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub id_strategy: IdStrategy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            id_strategy: IdStrategy::Random,
        }
    }
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub files: usize,
    pub slices: usize,
    pub upserted: usize,
    pub by_doc_type: BTreeMap<String, usize>,
}

/// Pull the slices for one record out of the three fixed paths.
///
/// Missing or `null` paths contribute nothing. A non-array under an `Each`
/// path is treated as a single element. Each slice is tagged from its own
/// extracted value, not from the enclosing record.
pub fn extract_slices(record: &Value, file: &str) -> Vec<DocumentSlice> {
    let mut slices = Vec::new();

    for path in SLICE_PATHS {
        let (key, each) = match path {
            SlicePath::Each(key) => (key, true),
            SlicePath::Whole(key) => (key, false),
        };

        let values: Vec<&Value> = match record.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::Array(items)) if each => items.iter().collect(),
            Some(value) => vec![value],
        };

        for value in values {
            slices.push(DocumentSlice {
                content: value.to_string(),
                metadata: SliceMetadata::new(file, slices.len() + 1, classify(value)),
            });
        }
    }

    slices
}

/// `*.json` files directly inside `folder`, sorted by name
pub fn json_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let is_json = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(".json"));
        if is_json && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Read and slice one file. Malformed JSON is an error, not a skip.
pub fn load_file(path: &Path) -> Result<Vec<DocumentSlice>> {
    let raw = std::fs::read_to_string(path)?;
    let record: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::Ingestion(format!("{}: {}", path.display(), e)))?;

    Ok(extract_slices(&record, &path.display().to_string()))
}

/// Vector ID for a slice under the given strategy
pub fn slice_id(slice: &DocumentSlice, strategy: IdStrategy) -> String {
    match strategy {
        IdStrategy::Random => Uuid::new_v4().to_string(),
        IdStrategy::ContentHash => {
            let key = format!(
                "{}\u{1f}{}\u{1f}{}",
                slice.metadata.file, slice.metadata.seq_num, slice.content
            );
            format!("{:x}", md5::compute(key.as_bytes()))
        }
    }
}

/// Embeds slices and upserts them into a vector store
pub struct DocumentIngestor {
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    options: IngestOptions,
}

impl DocumentIngestor {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self::with_options(embedder, vector_store, IngestOptions::default())
    }

    pub fn with_options(
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        options: IngestOptions,
    ) -> Self {
        Self {
            embedder,
            vector_store,
            options,
        }
    }

    /// Ingest every JSON file in `folder`. The first unreadable file,
    /// malformed record, or failed network call aborts the run.
    pub async fn ingest_folder(&self, folder: &Path) -> Result<IngestReport> {
        let files = json_files(folder)?;
        let mut slices = Vec::new();

        for file in &files {
            let file_slices = load_file(file)?;
            tracing::debug!(file = %file.display(), slices = file_slices.len(), "sliced file");
            slices.extend(file_slices);
        }

        tracing::info!(
            files = files.len(),
            slices = slices.len(),
            "created medical context slices"
        );

        let mut report = IngestReport {
            files: files.len(),
            slices: slices.len(),
            ..Default::default()
        };
        for slice in &slices {
            let label = slice
                .metadata
                .doc_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "untagged".to_string());
            *report.by_doc_type.entry(label).or_insert(0) += 1;
        }

        report.upserted = self.ingest_slices(slices).await?;
        Ok(report)
    }

    /// Embed and upsert slices batch by batch; returns the number upserted
    pub async fn ingest_slices(&self, slices: Vec<DocumentSlice>) -> Result<usize> {
        let batch_size = self.options.batch_size.max(1);
        let mut upserted = 0;

        for batch in slices.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|s| s.content.clone()).collect();
            let embeddings = self.embedder.embed_documents(&texts).await?;

            if embeddings.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }

            let documents: Vec<VectorDocument> = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(slice, embedding)| {
                    let id = slice_id(&slice, self.options.id_strategy);
                    slice.into_vector_document(id, embedding)
                })
                .collect();

            upserted += self.vector_store.store_batch(documents).await?.len();
        }

        Ok(upserted)
    }
}
