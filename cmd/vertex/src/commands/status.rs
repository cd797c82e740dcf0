//! Deployment status command.

use clap::Args;

use super::{create_client, output_result};
use crate::Cli;

/// Show the deployment status document.
#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let client = create_client(cli)?;
        let record = client.check_index_status().await?;
        output_result(&record, cli.output.as_deref(), cli.json)
    }
}
