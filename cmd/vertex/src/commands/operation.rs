//! Long-running operation commands.

use clap::{Args, Subcommand};

use super::{create_client, output_result, print_success};
use crate::Cli;

/// Long-running operation management.
#[derive(Args)]
pub struct OperationCommand {
    #[command(subcommand)]
    command: OperationSubcommand,
}

#[derive(Subcommand)]
enum OperationSubcommand {
    /// Show an operation
    Get {
        /// Operation name
        name: String,
    },
    /// Cancel an operation
    Cancel {
        /// Operation name
        name: String,
    },
    /// Delete an operation record
    Delete {
        /// Operation name
        name: String,
    },
}

impl OperationCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let client = create_client(cli)?;

        match &self.command {
            OperationSubcommand::Get { name } => {
                let operation = client.get_operation(name).await?;
                output_result(&operation, cli.output.as_deref(), cli.json)
            }

            OperationSubcommand::Cancel { name } => {
                let response = client.cancel_operation(name).await?;
                print_success(&format!("Cancellation requested: {}", name));
                output_result(&response, cli.output.as_deref(), cli.json)
            }

            OperationSubcommand::Delete { name } => {
                let response = client.delete_operation(name).await?;
                print_success(&format!("Operation deleted: {}", name));
                output_result(&response, cli.output.as_deref(), cli.json)
            }
        }
    }
}
