//! Deployment configuration.
//!
//! Values mirror the extension parameters and can be read from the process
//! environment or from a YAML file.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    error::{Error, Result},
    types::{AlgorithmConfig, DistanceMeasureType, FeatureNormType, TreeAhConfig},
};

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_NEIGHBORS: u32 = 100;

/// Object prefix under the bucket that holds datapoint files.
pub const DATAPOINTS_PREFIX: &str = "datapoints";

/// Environment variable names.
pub mod env {
    pub const PROJECT_ID: &str = "PROJECT_ID";
    pub const LOCATION: &str = "LOCATION";
    pub const BUCKET_NAME: &str = "IMG_BUCKET";
    pub const INSTANCE_ID: &str = "EXT_INSTANCE_ID";
    pub const ALGORITHM_CONFIG: &str = "ALGORITHM_CONFIG";
    pub const NEIGHBORS: &str = "NEIGHBORS";
    pub const DISTANCE_MEASURE_TYPE: &str = "DISTANCE_MEASURE_TYPE";
    pub const FEATURE_NORM_TYPE: &str = "FEATURE_NORM_TYPE";
    pub const METADATA_DOC: &str = "METADATA_DOC";
    pub const API_ENDPOINT: &str = "VERTEX_API_ENDPOINT";
    pub const FIRESTORE_ENDPOINT: &str = "FIRESTORE_ENDPOINT";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub project_id: String,

    #[serde(default = "default_location")]
    pub location: String,

    pub bucket_name: String,

    /// Extension instance id; names the index, the endpoint and the
    /// deployed index.
    pub instance_id: String,

    #[serde(default)]
    pub algorithm_config: AlgorithmConfig,

    /// Tuning applied when `algorithm_config` is tree-AH.
    #[serde(default)]
    pub tree_ah: TreeAhConfig,

    /// Approximate neighbor count of new indexes.
    #[serde(default = "default_neighbors")]
    pub neighbors: u32,

    #[serde(default)]
    pub distance_measure_type: DistanceMeasureType,

    #[serde(default)]
    pub feature_norm_type: FeatureNormType,

    /// Document path of the deployment status record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_doc: Option<String>,

    /// Overrides `{location}-aiplatform.googleapis.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,

    /// Overrides the Firestore host, e.g. `http://localhost:8080` for the
    /// emulator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore_endpoint: Option<String>,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_neighbors() -> u32 {
    DEFAULT_NEIGHBORS
}

impl Config {
    /// Creates a configuration with defaults for everything optional.
    pub fn new(
        project_id: impl Into<String>,
        bucket_name: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            location: default_location(),
            bucket_name: bucket_name.into(),
            instance_id: instance_id.into(),
            algorithm_config: AlgorithmConfig::default(),
            tree_ah: TreeAhConfig::default(),
            neighbors: DEFAULT_NEIGHBORS,
            distance_measure_type: DistanceMeasureType::default(),
            feature_norm_type: FeatureNormType::default(),
            metadata_doc: None,
            api_endpoint: None,
            firestore_endpoint: None,
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::Config(format!("environment variable {} is required", key)))
        };

        let mut cfg = Self::new(
            require(env::PROJECT_ID)?,
            require(env::BUCKET_NAME)?,
            require(env::INSTANCE_ID)?,
        );

        if let Some(location) = get(env::LOCATION) {
            cfg.location = location;
        }
        if let Some(algorithm) = get(env::ALGORITHM_CONFIG) {
            cfg.algorithm_config = algorithm.parse()?;
        }
        if let Some(neighbors) = get(env::NEIGHBORS) {
            cfg.neighbors = neighbors.parse().map_err(|_| {
                Error::Config(format!("{} must be a positive integer, got {:?}", env::NEIGHBORS, neighbors))
            })?;
        }
        if let Some(distance) = get(env::DISTANCE_MEASURE_TYPE) {
            cfg.distance_measure_type = distance.parse()?;
        }
        if let Some(norm) = get(env::FEATURE_NORM_TYPE) {
            cfg.feature_norm_type = norm.parse()?;
        }
        cfg.metadata_doc = get(env::METADATA_DOC);
        cfg.api_endpoint = get(env::API_ENDPOINT);
        cfg.firestore_endpoint = get(env::FIRESTORE_ENDPOINT);

        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("project_id", &self.project_id),
            ("location", &self.location),
            ("bucket_name", &self.bucket_name),
            ("instance_id", &self.instance_id),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(Error::Config(format!("{} must be non-empty", field)));
            }
        }
        if self.neighbors == 0 {
            return Err(Error::Config("neighbors must be positive".to_string()));
        }
        Ok(())
    }

    /// Host of the management, data-plane and operation APIs.
    pub fn api_host(&self) -> String {
        self.api_endpoint
            .clone()
            .unwrap_or_else(|| format!("{}-aiplatform.googleapis.com", self.location))
    }

    /// `projects/{project}/locations/{location}`.
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    /// Source-data URI handed to new indexes.
    pub fn contents_delta_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket_name, DATAPOINTS_PREFIX)
    }

    pub fn metadata_doc(&self) -> String {
        self.metadata_doc
            .clone()
            .unwrap_or_else(|| format!("_{}/metadata", self.instance_id))
    }

    /// Environment variables this configuration would be read from.
    pub fn to_env(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::from([
            (env::PROJECT_ID, self.project_id.clone()),
            (env::LOCATION, self.location.clone()),
            (env::BUCKET_NAME, self.bucket_name.clone()),
            (env::INSTANCE_ID, self.instance_id.clone()),
            (env::ALGORITHM_CONFIG, self.algorithm_config.to_string()),
            (env::NEIGHBORS, self.neighbors.to_string()),
            (env::DISTANCE_MEASURE_TYPE, self.distance_measure_type.to_string()),
            (env::FEATURE_NORM_TYPE, self.feature_norm_type.to_string()),
            (env::METADATA_DOC, self.metadata_doc()),
        ]);
        if let Some(endpoint) = &self.api_endpoint {
            vars.insert(env::API_ENDPOINT, endpoint.clone());
        }
        if let Some(endpoint) = &self.firestore_endpoint {
            vars.insert(env::FIRESTORE_ENDPOINT, endpoint.clone());
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            ("PROJECT_ID", "demo"),
            ("IMG_BUCKET", "demo.appspot.com"),
            ("EXT_INSTANCE_ID", "storage-image-search"),
        ]))
        .unwrap();

        assert_eq!(cfg.location, "us-central1");
        assert_eq!(cfg.algorithm_config, AlgorithmConfig::TreeAhConfig);
        assert_eq!(cfg.neighbors, 100);
        assert_eq!(cfg.distance_measure_type, DistanceMeasureType::DotProductDistance);
        assert_eq!(cfg.feature_norm_type, FeatureNormType::None);
        assert_eq!(cfg.metadata_doc(), "_storage-image-search/metadata");
        assert_eq!(cfg.api_host(), "us-central1-aiplatform.googleapis.com");
        assert_eq!(cfg.contents_delta_uri(), "gs://demo.appspot.com/datapoints");
        assert_eq!(cfg.parent(), "projects/demo/locations/us-central1");
    }

    #[test]
    fn from_lookup_reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("PROJECT_ID", "demo"),
            ("IMG_BUCKET", "b"),
            ("EXT_INSTANCE_ID", "i"),
            ("LOCATION", "europe-west4"),
            ("ALGORITHM_CONFIG", "bruteForceConfig"),
            ("NEIGHBORS", "25"),
            ("DISTANCE_MEASURE_TYPE", "COSINE_DISTANCE"),
            ("FEATURE_NORM_TYPE", "UNIT_L2_NORM"),
            ("METADATA_DOC", "ext/status"),
            ("FIRESTORE_ENDPOINT", "http://localhost:8080"),
        ]))
        .unwrap();

        assert_eq!(cfg.algorithm_config, AlgorithmConfig::BruteForceConfig);
        assert_eq!(cfg.neighbors, 25);
        assert_eq!(cfg.api_host(), "europe-west4-aiplatform.googleapis.com");
        assert_eq!(cfg.metadata_doc(), "ext/status");
        assert_eq!(cfg.firestore_endpoint.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn from_lookup_requires_identifiers() {
        let err = Config::from_lookup(lookup(&[("PROJECT_ID", "demo"), ("IMG_BUCKET", "b")]))
            .unwrap_err();
        assert!(err.to_string().contains("EXT_INSTANCE_ID"));
    }

    #[test]
    fn from_lookup_rejects_bad_values() {
        let base = [("PROJECT_ID", "p"), ("IMG_BUCKET", "b"), ("EXT_INSTANCE_ID", "i")];

        let mut vars = base.to_vec();
        vars.push(("NEIGHBORS", "many"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());

        let mut vars = base.to_vec();
        vars.push(("NEIGHBORS", "0"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());

        let mut vars = base.to_vec();
        vars.push(("ALGORITHM_CONFIG", "scann"));
        assert!(Config::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "project_id: demo\nbucket_name: b\ninstance_id: abc-123\nalgorithm_config: bruteForceConfig\ntree_ah:\n  leafNodeEmbeddingCount: 1000\napi_endpoint: http://localhost:9000"
        )
        .unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.instance_id, "abc-123");
        assert_eq!(cfg.algorithm_config, AlgorithmConfig::BruteForceConfig);
        assert_eq!(cfg.tree_ah.leaf_node_embedding_count, Some(1000));
        assert_eq!(cfg.api_host(), "http://localhost:9000");
        assert_eq!(cfg.location, "us-central1");
    }

    #[test]
    fn to_env_roundtrips_through_lookup() {
        let mut cfg = Config::new("p", "b", "i");
        cfg.neighbors = 12;
        cfg.distance_measure_type = DistanceMeasureType::L1Distance;
        let vars = cfg.to_env();

        let parsed = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(parsed.neighbors, 12);
        assert_eq!(parsed.distance_measure_type, DistanceMeasureType::L1Distance);
        assert_eq!(parsed.metadata_doc(), cfg.metadata_doc());
    }
}
