//! Index and index-endpoint management.

use serde_json::json;
use tracing::{debug, info};

use super::{
    client::IndexServiceClient,
    error::{Error, Result},
    http::HttpRequest,
    models::{
        DeployedIndex, Index, IndexConfig, IndexEndpoint, IndexMetadata, Operation,
        INDEX_DISPLAY_NAME, INDEX_ENDPOINT_DISPLAY_NAME, METADATA_SCHEMA_URI,
    },
    types::IndexUpdateMethod,
};

/// Id under which the index is deployed on its endpoint.
///
/// The service never returns it, so deploy and query both derive it here:
/// `abc-123` becomes `ext_abc_123_index`.
pub fn deployed_index_id(instance_id: &str) -> String {
    format!("ext_{}_index", instance_id.replace('-', "_"))
}

/// Fails with the operation's inline error message, if any.
fn check_inline_error(operation: &Operation) -> Result<()> {
    match &operation.error {
        Some(status) => Err(Error::Operation(status.message.clone())),
        None => Ok(()),
    }
}

impl IndexServiceClient {
    pub fn deployed_index_id(&self) -> String {
        deployed_index_id(&self.config().instance_id)
    }

    /// Builds the creation payload of a streaming index.
    pub fn index_spec(&self, dimensions: u32) -> Index {
        let cfg = self.config();
        Index {
            name: format!("ext-{}", cfg.instance_id),
            display_name: INDEX_DISPLAY_NAME.to_string(),
            index_update_method: IndexUpdateMethod::StreamUpdate,
            metadata_schema_uri: METADATA_SCHEMA_URI.to_string(),
            metadata: IndexMetadata {
                contents_delta_uri: cfg.contents_delta_uri(),
                is_complete_overwrite: false,
                config: IndexConfig {
                    dimensions,
                    approximate_neighbors_count: cfg.neighbors,
                    distance_measure_type: cfg.distance_measure_type,
                    feature_norm_type: cfg.feature_norm_type,
                    algorithm_config: cfg.algorithm_config.to_spec(&cfg.tree_ah),
                },
            },
        }
    }

    /// Starts creating the index and returns the operation name.
    ///
    /// Index builds outlive any reasonable request deadline, so the
    /// operation is not awaited; poll it with [`Self::get_operation`].
    pub async fn create_index(&self, dimensions: u32) -> Result<String> {
        if dimensions == 0 {
            return Err(Error::Config("dimensions must be positive".to_string()));
        }

        let index = self.index_spec(dimensions);
        let url = self.api_url(&format!("{}/indexes", self.config().parent()));
        debug!(dimensions, algorithm = %self.config().algorithm_config, "creating index");

        let body = self
            .authorized(HttpRequest::post(url).json(serde_json::to_value(&index)?))
            .await?;
        let operation: Operation = serde_json::from_value(body)?;
        check_inline_error(&operation)?;

        info!(operation = %operation.name, "index creation started");
        Ok(operation.name)
    }

    /// Starts creating a public index endpoint.
    ///
    /// Unlike [`Self::create_index`] this returns the whole operation and
    /// does not inspect its inline error.
    pub async fn create_index_endpoint(&self) -> Result<Operation> {
        let cfg = self.config();
        let endpoint = IndexEndpoint {
            name: format!("ext-{}-endpoint", cfg.instance_id),
            display_name: INDEX_ENDPOINT_DISPLAY_NAME.to_string(),
            public_endpoint_enabled: true,
            ..Default::default()
        };
        let url = self.api_url(&format!("{}/indexEndpoints", cfg.parent()));

        let body = self
            .authorized(HttpRequest::post(url).json(serde_json::to_value(&endpoint)?))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Deploys `index` onto `index_endpoint` and returns the operation name.
    ///
    /// * `index_endpoint` - `projects/{project}/locations/{location}/indexEndpoints/{index_endpoint}`
    /// * `index` - `projects/{project}/locations/{location}/indexes/{index}`
    pub async fn deploy_index(&self, index_endpoint: &str, index: &str) -> Result<String> {
        let deployed = DeployedIndex {
            id: self.deployed_index_id(),
            index: index.to_string(),
        };
        let url = self.api_url(&format!("{}:deployIndex", index_endpoint));
        debug!(index_endpoint, index, deployed_index_id = %deployed.id, "deploying index");

        let body = self
            .authorized(HttpRequest::post(url).json(json!({ "deployedIndex": deployed })))
            .await?;
        let operation: Operation = serde_json::from_value(body)?;
        check_inline_error(&operation)?;

        Ok(operation.name)
    }

    /// Returns the public domain name serving `index_endpoint`.
    ///
    /// Queries must be sent to this host, not to the API host.
    pub async fn get_deployed_index(&self, index_endpoint: &str) -> Result<String> {
        let body = self
            .authorized(HttpRequest::get(self.api_url(index_endpoint)))
            .await?;
        let endpoint: IndexEndpoint = serde_json::from_value(body)?;

        match endpoint.public_endpoint_domain_name {
            Some(domain) if !domain.is_empty() => Ok(domain),
            _ => Err(Error::EndpointNotDeployed {
                index_endpoint: index_endpoint.to_string(),
            }),
        }
    }
}
