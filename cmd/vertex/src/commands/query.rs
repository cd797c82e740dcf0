//! Nearest-neighbor search command.

use clap::Args;
use imgsearch_vertex::{IndexEndpointName, VectorQuery};
use tracing::debug;

use super::{create_client, load_request, output_result, require_input_file};
use crate::Cli;

/// Nearest-neighbor search.
///
/// The input file (-f) is a YAML or JSON list of queries:
/// `{id?, vector, neighbor_count?, restricts?}`.
#[derive(Args)]
pub struct QueryCommand {
    /// projects/{project}/locations/{location}/indexEndpoints/{index_endpoint}
    index_endpoint: String,

    /// Neighbors to return per query
    #[arg(short = 'n', long, default_value_t = 10)]
    neighbors: u32,

    /// Public endpoint host; looked up from the endpoint when omitted
    #[arg(long)]
    host: Option<String>,
}

impl QueryCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let endpoint: IndexEndpointName = self.index_endpoint.parse()?;
        let queries: Vec<VectorQuery> = load_request(require_input_file(cli)?)?;

        let client = create_client(cli)?;
        let host = match &self.host {
            Some(host) => host.clone(),
            None => client.get_deployed_index(&endpoint.to_string()).await?,
        };
        debug!(index_endpoint = %endpoint.index_endpoint, %host, "querying");

        let response = client
            .query_index(&queries, self.neighbors, &host, &endpoint.index_endpoint)
            .await?;
        output_result(&response, cli.output.as_deref(), cli.json)
    }
}
