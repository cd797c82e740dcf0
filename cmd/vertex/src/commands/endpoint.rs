//! Index endpoint and deployment commands.

use clap::{Args, Subcommand};
use imgsearch_vertex::{IndexEndpointName, IndexName};

use tracing::debug;

use super::{create_client, output_result, print_success};
use crate::Cli;

/// Index endpoint management.
#[derive(Args)]
pub struct EndpointCommand {
    #[command(subcommand)]
    command: EndpointSubcommand,
}

#[derive(Subcommand)]
enum EndpointSubcommand {
    /// Start creating a public index endpoint
    Create,
    /// Print the public domain name of a deployed endpoint
    Domain {
        /// projects/{project}/locations/{location}/indexEndpoints/{index_endpoint}
        index_endpoint: String,
    },
}

impl EndpointCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            EndpointSubcommand::Create => {
                let client = create_client(cli)?;
                let operation = client.create_index_endpoint().await?;
                print_success(&format!("Index endpoint creation started: {}", operation.name));
                output_result(&operation, cli.output.as_deref(), cli.json)
            }

            EndpointSubcommand::Domain { index_endpoint } => {
                let name: IndexEndpointName = index_endpoint.parse()?;
                let client = create_client(cli)?;
                let domain = client.get_deployed_index(&name.to_string()).await?;
                println!("{}", domain);
                Ok(())
            }
        }
    }
}

/// Deploy an index onto an index endpoint.
#[derive(Args)]
pub struct DeployCommand {
    /// projects/{project}/locations/{location}/indexEndpoints/{index_endpoint}
    index_endpoint: String,

    /// projects/{project}/locations/{location}/indexes/{index}
    index: String,
}

impl DeployCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let endpoint: IndexEndpointName = self.index_endpoint.parse()?;
        let index: IndexName = self.index.parse()?;

        let client = create_client(cli)?;
        debug!(deployed_index_id = %client.deployed_index_id(), "deploying");

        let operation = client
            .deploy_index(&endpoint.to_string(), &index.to_string())
            .await?;
        print_success(&format!("Deployment started: {}", operation));

        let result = serde_json::json!({
            "operation": operation,
            "deployed_index_id": client.deployed_index_id(),
        });
        output_result(&result, cli.output.as_deref(), cli.json)
    }
}
