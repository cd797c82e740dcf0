//! Resource names: `projects/{p}/locations/{l}/{collection}/{id}`.

use std::{fmt, str::FromStr};

use super::error::{Error, Result};

const INDEXES: &str = "indexes";
const INDEX_ENDPOINTS: &str = "indexEndpoints";

fn parse(name: &str, collection: &str) -> Result<(String, String, String)> {
    let parts: Vec<&str> = name.split('/').collect();
    match parts.as_slice() {
        ["projects", project, "locations", location, c, id]
            if *c == collection
                && !project.is_empty()
                && !location.is_empty()
                && !id.is_empty() =>
        {
            Ok((project.to_string(), location.to_string(), id.to_string()))
        }
        _ => Err(Error::Config(format!(
            "invalid resource name {:?}, expected projects/{{project}}/locations/{{location}}/{}/{{id}}",
            name, collection
        ))),
    }
}

/// `projects/{project}/locations/{location}/indexes/{index}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexName {
    pub project: String,
    pub location: String,
    pub index: String,
}

impl IndexName {
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.location)
    }
}

impl FromStr for IndexName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (project, location, index) = parse(s, INDEXES)?;
        Ok(Self {
            project,
            location,
            index,
        })
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.parent(), INDEXES, self.index)
    }
}

/// `projects/{project}/locations/{location}/indexEndpoints/{index_endpoint}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexEndpointName {
    pub project: String,
    pub location: String,
    pub index_endpoint: String,
}

impl IndexEndpointName {
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.location)
    }
}

impl FromStr for IndexEndpointName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (project, location, index_endpoint) = parse(s, INDEX_ENDPOINTS)?;
        Ok(Self {
            project,
            location,
            index_endpoint,
        })
    }
}

impl fmt::Display for IndexEndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.parent(), INDEX_ENDPOINTS, self.index_endpoint)
    }
}
