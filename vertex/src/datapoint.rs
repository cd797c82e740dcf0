//! Data-plane calls: datapoint upsert/remove and nearest-neighbor search.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use super::{
    client::{host_url, IndexServiceClient},
    error::Result,
    http::HttpRequest,
    models::Datapoint,
    query::{FindNeighborsQuery, ToRemoteQuery},
};

#[derive(Serialize)]
struct UpsertRequest<'a> {
    datapoints: &'a [Datapoint],
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    datapoint_ids: &'a [String],
}

#[derive(Serialize)]
struct FindNeighborsRequest {
    queries: Vec<FindNeighborsQuery>,
    deployed_index_id: String,
    neighbor_count: u32,
}

impl IndexServiceClient {
    /// Upserts `datapoints` into the index in a single call.
    ///
    /// The batch succeeds or fails as a whole; retrying is up to the caller.
    ///
    /// * `index` - `projects/{project}/locations/{location}/indexes/{index}`
    pub async fn upsert_datapoints(&self, index: &str, datapoints: &[Datapoint]) -> Result<()> {
        let url = self.api_url(&format!("{}:upsertDatapoints", index));
        let body = serde_json::to_value(UpsertRequest { datapoints })?;
        debug!(index, count = datapoints.len(), "upserting datapoints");

        self.authorized(HttpRequest::post(url).json(body)).await?;
        Ok(())
    }

    /// Removes datapoints by id in a single call.
    pub async fn remove_datapoints(&self, index: &str, datapoint_ids: &[String]) -> Result<()> {
        let url = self.api_url(&format!("{}:removeDatapoints", index));
        let body = serde_json::to_value(RemoveRequest { datapoint_ids })?;
        debug!(index, count = datapoint_ids.len(), "removing datapoints");

        self.authorized(HttpRequest::post(url).json(body)).await?;
        Ok(())
    }

    /// Runs a batch of nearest-neighbor queries against a deployed index.
    ///
    /// * `endpoint_host` - public domain name from [`Self::get_deployed_index`]
    /// * `index_endpoint_id` - trailing id of the index endpoint resource
    ///
    /// Returns the service response untouched.
    pub async fn query_index<Q: ToRemoteQuery>(
        &self,
        queries: &[Q],
        neighbor_count: u32,
        endpoint_host: &str,
        index_endpoint_id: &str,
    ) -> Result<Value> {
        let cfg = self.config();
        let url = host_url(
            endpoint_host,
            &format!(
                "{}/indexEndpoints/{}:findNeighbors",
                cfg.parent(),
                index_endpoint_id
            ),
        );
        let request = FindNeighborsRequest {
            queries: queries.iter().map(|q| q.to_remote_query()).collect(),
            deployed_index_id: self.deployed_index_id(),
            neighbor_count,
        };

        let result: Result<Value> = async {
            let body = serde_json::to_value(&request)?;
            self.authorized(HttpRequest::post(url).json(body)).await
        }
        .await;

        if let Err(e) = &result {
            error!(endpoint = endpoint_host, index_endpoint_id, error = %e, "error calling the endpoint");
        }
        result
    }
}
