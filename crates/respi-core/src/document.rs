//! Ingested document slices and their tags

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::VectorDocument;

/// The four document families the corpus is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "Environmental_Standard")]
    EnvironmentalStandard,
    #[serde(rename = "Public_Health_Guidance")]
    PublicHealthGuidance,
    #[serde(rename = "Clinical_Asthma_Guide")]
    ClinicalAsthmaGuide,
    #[serde(rename = "International_Regulation")]
    InternationalRegulation,
}

impl DocType {
    /// Label stored in the index under `doc_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::EnvironmentalStandard => "Environmental_Standard",
            DocType::PublicHealthGuidance => "Public_Health_Guidance",
            DocType::ClinicalAsthmaGuide => "Clinical_Asthma_Guide",
            DocType::InternationalRegulation => "International_Regulation",
        }
    }

    /// Guideline name the model is asked to cite
    pub fn source(&self) -> &'static str {
        match self {
            DocType::EnvironmentalStandard => "WHO Air Quality Guidelines",
            DocType::PublicHealthGuidance => "ATSDR PM Guidance",
            DocType::ClinicalAsthmaGuide => "GINA 2023 Asthma Pocket Guide",
            DocType::InternationalRegulation => "WHO IHR 2005",
        }
    }

    pub fn all() -> [DocType; 4] {
        [
            DocType::EnvironmentalStandard,
            DocType::PublicHealthGuidance,
            DocType::ClinicalAsthmaGuide,
            DocType::InternationalRegulation,
        ]
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata attached to every slice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceMetadata {
    pub doc_type: Option<DocType>,
    pub source: Option<String>,
    /// File the slice was extracted from
    pub file: String,
    /// Position of the slice within its file's extraction
    pub seq_num: usize,
}

impl SliceMetadata {
    pub fn new(file: impl Into<String>, seq_num: usize, doc_type: Option<DocType>) -> Self {
        Self {
            doc_type,
            source: doc_type.map(|t| t.source().to_string()),
            file: file.into(),
            seq_num,
        }
    }

    /// Flat JSON form used as index metadata. Untagged slices carry no
    /// `doc_type` or `source` keys at all.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(doc_type) = self.doc_type {
            map.insert("doc_type".to_string(), json!(doc_type.as_str()));
        }
        if let Some(ref source) = self.source {
            map.insert("source".to_string(), json!(source));
        }
        map.insert("file".to_string(), json!(self.file));
        map.insert("seq_num".to_string(), json!(self.seq_num));
        Value::Object(map)
    }
}

/// A unit of ingested text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSlice {
    pub content: String,
    pub metadata: SliceMetadata,
}

impl DocumentSlice {
    /// Pair the slice with its embedding for upserting
    pub fn into_vector_document(self, id: String, embedding: Vec<f32>) -> VectorDocument {
        VectorDocument {
            id,
            metadata: self.metadata.to_json(),
            content: self.content,
            embedding: Some(embedding),
            score: None,
        }
    }
}
