//! Index commands.

use clap::{Args, Subcommand};

use tracing::debug;

use super::{create_client, output_result, print_success};
use crate::Cli;

/// Index management.
#[derive(Args)]
pub struct IndexCommand {
    #[command(subcommand)]
    command: IndexSubcommand,
}

#[derive(Subcommand)]
enum IndexSubcommand {
    /// Start creating the streaming index
    Create {
        /// Length of the feature vectors
        #[arg(long)]
        dimensions: u32,
    },
    /// Print the deployed index id derived from the instance id
    DeployedId,
}

impl IndexCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            IndexSubcommand::Create { dimensions } => {
                let client = create_client(cli)?;
                debug!(algorithm = %client.config().algorithm_config, "creating index");

                let operation = client.create_index(*dimensions).await?;
                print_success(&format!("Index creation started: {}", operation));

                let result = serde_json::json!({
                    "operation": operation,
                    "status": "created",
                });
                output_result(&result, cli.output.as_deref(), cli.json)
            }

            IndexSubcommand::DeployedId => {
                let client = create_client(cli)?;
                println!("{}", client.deployed_index_id());
                Ok(())
            }
        }
    }
}
