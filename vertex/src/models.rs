//! Wire models of the Vertex AI index resources.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::Error;
use super::store::Document;
use super::types::{
    AlgorithmConfigSpec, DistanceMeasureType, FeatureNormType, IndexStatus, IndexUpdateMethod,
};

/// Schema describing nearest-neighbor index metadata.
pub const METADATA_SCHEMA_URI: &str =
    "gs://google-cloud-aiplatform/schema/matchingengine/metadata/nearest_neighbor_search_1.0.0.yaml";

/// Display name given to indexes created by this crate.
pub const INDEX_DISPLAY_NAME: &str = "Storage Image Similarity Extension";

/// Display name given to index endpoints created by this crate.
pub const INDEX_ENDPOINT_DISPLAY_NAME: &str = "Firestore Text Similarity Extension";

// ==================== Long-running operations ====================

/// `google.rpc.Status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Value>,
}

/// `google.longrunning.Operation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub done: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

// ==================== Index ====================

/// Index creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub name: String,
    pub display_name: String,
    pub index_update_method: IndexUpdateMethod,
    pub metadata_schema_uri: String,
    pub metadata: IndexMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    /// Object-storage prefix the service reads datapoint files from.
    pub contents_delta_uri: String,

    /// Always false: updates append, they never replace the index.
    pub is_complete_overwrite: bool,

    pub config: IndexConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    pub dimensions: u32,
    pub approximate_neighbors_count: u32,
    pub distance_measure_type: DistanceMeasureType,
    pub feature_norm_type: FeatureNormType,
    pub algorithm_config: AlgorithmConfigSpec,
}

// ==================== Index Endpoint ====================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEndpoint {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub public_endpoint_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_endpoint_domain_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployed_indexes: Vec<DeployedIndex>,
}

/// An index served by an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedIndex {
    pub id: String,
    pub index: String,
}

// ==================== Datapoints ====================

/// Namespace restriction attached to a datapoint or query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub namespace: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_list: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny_list: Vec<String>,
}

/// A vector record submitted for indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub datapoint_id: String,
    pub feature_vector: Vec<f32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restricts: Vec<Restriction>,
}

impl Datapoint {
    pub fn new(datapoint_id: impl Into<String>, feature_vector: Vec<f32>) -> Self {
        Self {
            datapoint_id: datapoint_id.into(),
            feature_vector,
            restricts: Vec::new(),
        }
    }
}

// ==================== Metadata document ====================

/// Deployment progress persisted in the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatusRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IndexStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_endpoint: Option<String>,
}

impl TryFrom<Document> for IndexStatusRecord {
    type Error = Error;

    /// Reads the well-known fields. Other fields are ignored.
    fn try_from(fields: Document) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}
