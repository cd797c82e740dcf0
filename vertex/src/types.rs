//! Common enumerations for the vector-index API.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::Error;

// ==================== Algorithm Config ====================

/// ANN algorithm selected for new indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlgorithmConfig {
    /// Exact search, useful for small corpora and recall baselines.
    BruteForceConfig,
    /// Tree-AH approximate search.
    #[default]
    TreeAhConfig,
}

impl AlgorithmConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmConfig::BruteForceConfig => "bruteForceConfig",
            AlgorithmConfig::TreeAhConfig => "treeAhConfig",
        }
    }

    /// Builds the wire structure placed at `metadata.config.algorithmConfig`.
    ///
    /// `tree_ah` is only consulted for the tree-AH variant.
    pub fn to_spec(self, tree_ah: &TreeAhConfig) -> AlgorithmConfigSpec {
        match self {
            AlgorithmConfig::BruteForceConfig => {
                AlgorithmConfigSpec::BruteForceConfig(BruteForceConfig {})
            }
            AlgorithmConfig::TreeAhConfig => AlgorithmConfigSpec::TreeAhConfig(tree_ah.clone()),
        }
    }
}

impl FromStr for AlgorithmConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bruteForceConfig" => Ok(AlgorithmConfig::BruteForceConfig),
            "treeAhConfig" => Ok(AlgorithmConfig::TreeAhConfig),
            other => Err(Error::Config(format!("unknown algorithm config: {}", other))),
        }
    }
}

impl fmt::Display for AlgorithmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Brute-force search carries no parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BruteForceConfig {}

/// Tree-AH tuning. Unset fields are left to the service defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeAhConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_node_embedding_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_nodes_to_search_percent: Option<u32>,
}

/// Wire form of the algorithm config: exactly one keyed structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlgorithmConfigSpec {
    BruteForceConfig(BruteForceConfig),
    TreeAhConfig(TreeAhConfig),
}

// ==================== Distance Measure ====================

/// Distance used by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceMeasureType {
    SquaredL2Distance,
    L1Distance,
    CosineDistance,
    #[default]
    DotProductDistance,
}

impl DistanceMeasureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMeasureType::SquaredL2Distance => "SQUARED_L2_DISTANCE",
            DistanceMeasureType::L1Distance => "L1_DISTANCE",
            DistanceMeasureType::CosineDistance => "COSINE_DISTANCE",
            DistanceMeasureType::DotProductDistance => "DOT_PRODUCT_DISTANCE",
        }
    }
}

impl FromStr for DistanceMeasureType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SQUARED_L2_DISTANCE" => Ok(DistanceMeasureType::SquaredL2Distance),
            "L1_DISTANCE" => Ok(DistanceMeasureType::L1Distance),
            "COSINE_DISTANCE" => Ok(DistanceMeasureType::CosineDistance),
            "DOT_PRODUCT_DISTANCE" => Ok(DistanceMeasureType::DotProductDistance),
            other => Err(Error::Config(format!("unknown distance measure: {}", other))),
        }
    }
}

impl fmt::Display for DistanceMeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Feature Norm ====================

/// Normalization applied to feature vectors before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureNormType {
    #[default]
    None,
    UnitL2Norm,
}

impl FeatureNormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureNormType::None => "NONE",
            FeatureNormType::UnitL2Norm => "UNIT_L2_NORM",
        }
    }
}

impl FromStr for FeatureNormType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(FeatureNormType::None),
            "UNIT_L2_NORM" => Ok(FeatureNormType::UnitL2Norm),
            other => Err(Error::Config(format!("unknown feature norm: {}", other))),
        }
    }
}

impl fmt::Display for FeatureNormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Index Update Method ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexUpdateMethod {
    StreamUpdate,
}

// ==================== Index Status ====================

/// Deployment progress recorded in the metadata document.
///
/// Values the document store holds but this enum does not know are kept
/// verbatim in [`IndexStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexStatus {
    NonExistent,
    Building,
    Deploying,
    Deployed,
    Error,
    #[serde(untagged)]
    Other(String),
}
