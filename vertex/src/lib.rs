//! Vertex AI Vector Search orchestration for reverse image search.
//!
//! This crate wraps the managed vector-index service: creating and deploying
//! indexes, streaming datapoints in and out, querying nearest neighbors and
//! managing long-running operations. It also reads the deployment status
//! document kept in Firestore. All search logic lives in the remote service.

mod auth;
mod client;
pub mod config;
mod datapoint;
mod error;
mod firestore;
pub mod http;
mod index;
mod models;
mod operation;
mod query;
mod resource;
mod status;
mod store;
mod types;

pub use auth::{GcloudToken, MetadataServerToken, StaticToken, TokenProvider, METADATA_TOKEN_URL};
pub use client::{ClientBuilder, IndexServiceClient, API_VERSION};
pub use config::{Config, DEFAULT_LOCATION, DEFAULT_NEIGHBORS};
pub use error::{Error, Result};
pub use firestore::{FirestoreStore, FIRESTORE_BASE_URL};
pub use http::{HttpRequest, ReqwestTransport, Transport};
pub use index::deployed_index_id;
pub use models::{
    DeployedIndex, Datapoint, Index, IndexConfig, IndexEndpoint, IndexMetadata, IndexStatusRecord,
    Operation, Restriction, Status, METADATA_SCHEMA_URI,
};
pub use query::{FindNeighborsQuery, ToRemoteQuery, VectorQuery};
pub use resource::{IndexEndpointName, IndexName};
pub use store::{Document, DocumentStore, MemoryStore};
pub use types::{
    AlgorithmConfig, AlgorithmConfigSpec, BruteForceConfig, DistanceMeasureType, FeatureNormType,
    IndexStatus, IndexUpdateMethod, TreeAhConfig,
};
