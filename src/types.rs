use crate::files::FileKind;
use serde::{Deserialize, Serialize};

/// A chromosome of a reference genome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "referenceId", skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<u64>,
}

impl Chromosome {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            reference_id: None,
        }
    }

    pub fn with_reference_id(mut self, reference_id: u64) -> Self {
        self.reference_id = Some(reference_id);
        self
    }
}

/// Query parameters for feature requests on a registered file
#[derive(Debug, Deserialize)]
pub struct FeaturesQuery {
    pub kind: Option<FileKind>,
    #[serde(rename = "referenceName")]
    pub reference_name: String,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// Query parameters for feature requests on a file given by URL
#[derive(Debug, Deserialize)]
pub struct UrlFeaturesQuery {
    pub url: String,
    #[serde(rename = "indexUrl")]
    pub index_url: String,
    pub kind: Option<FileKind>,
    #[serde(rename = "referenceName")]
    pub reference_name: String,
    #[serde(rename = "referenceId")]
    pub reference_id: Option<u64>,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct KindQuery {
    pub kind: Option<FileKind>,
}

#[derive(Debug, Serialize)]
pub struct FeaturesResponse<F> {
    /// Chromosome name as requested
    #[serde(rename = "referenceName")]
    pub reference_name: String,
    /// Chromosome name the returned features were queried with
    #[serde(rename = "queriedName")]
    pub queried_name: String,
    pub start: u64,
    pub end: u64,
    pub features: Vec<F>,
}

#[derive(Debug, Serialize)]
pub struct ContigResponse {
    #[serde(rename = "referenceName")]
    pub reference_name: String,
    /// Spelling used by the file
    pub canonical: String,
}

#[derive(Debug, Deserialize)]
pub struct CachePathQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct CachePathResponse {
    pub url: String,
    pub hash: String,
    pub path: String,
}

/// Service info response
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub kinds: Vec<FileKind>,
    #[serde(rename = "chromosomePrefix")]
    pub chromosome_prefix: String,
}
