//! Nearest-neighbor queries.

use serde::{Deserialize, Serialize};

use super::models::{Datapoint, Restriction};

/// One entry of a `findNeighbors` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindNeighborsQuery {
    pub datapoint: Datapoint,

    /// Overrides the request-level neighbor count for this query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbor_count: Option<u32>,
}

/// Converts a local query into the service's query representation.
pub trait ToRemoteQuery {
    fn to_remote_query(&self) -> FindNeighborsQuery;
}

impl<T: ToRemoteQuery + ?Sized> ToRemoteQuery for &T {
    fn to_remote_query(&self) -> FindNeighborsQuery {
        (**self).to_remote_query()
    }
}

impl<T: ToRemoteQuery + ?Sized> ToRemoteQuery for Box<T> {
    fn to_remote_query(&self) -> FindNeighborsQuery {
        (**self).to_remote_query()
    }
}

/// Query by raw feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    /// Caller-chosen id echoed back in the response.
    #[serde(default = "default_query_id")]
    pub id: String,

    pub vector: Vec<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbor_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restricts: Vec<Restriction>,
}

fn default_query_id() -> String {
    "0".to_string()
}

impl VectorQuery {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            id: default_query_id(),
            vector,
            neighbor_count: None,
            restricts: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_neighbor_count(mut self, count: u32) -> Self {
        self.neighbor_count = Some(count);
        self
    }

    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restricts.push(restriction);
        self
    }
}

impl ToRemoteQuery for VectorQuery {
    fn to_remote_query(&self) -> FindNeighborsQuery {
        FindNeighborsQuery {
            datapoint: Datapoint {
                datapoint_id: self.id.clone(),
                feature_vector: self.vector.clone(),
                restricts: self.restricts.clone(),
            },
            neighbor_count: self.neighbor_count,
        }
    }
}

/// A datapoint queries for its own neighbors.
impl ToRemoteQuery for Datapoint {
    fn to_remote_query(&self) -> FindNeighborsQuery {
        FindNeighborsQuery {
            datapoint: self.clone(),
            neighbor_count: None,
        }
    }
}
