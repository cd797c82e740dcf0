//! Datapoint commands.

use clap::{Args, Subcommand};
use imgsearch_vertex::{Datapoint, IndexName};

use super::{create_client, load_request, print_success, require_input_file};
use crate::Cli;

/// Datapoint upsert and removal.
///
/// Datapoint files are YAML or JSON lists of
/// `{datapoint_id, feature_vector}` entries.
#[derive(Args)]
pub struct DatapointsCommand {
    #[command(subcommand)]
    command: DatapointsSubcommand,
}

#[derive(Subcommand)]
enum DatapointsSubcommand {
    /// Upsert the datapoints listed in the input file (-f)
    Upsert {
        /// projects/{project}/locations/{location}/indexes/{index}
        index: String,
    },
    /// Remove datapoints by id (from arguments or the input file)
    Remove {
        /// projects/{project}/locations/{location}/indexes/{index}
        index: String,
        /// Datapoint ids
        ids: Vec<String>,
    },
}

impl DatapointsCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            DatapointsSubcommand::Upsert { index } => {
                let index: IndexName = index.parse()?;
                let datapoints: Vec<Datapoint> = load_request(require_input_file(cli)?)?;

                let client = create_client(cli)?;
                client
                    .upsert_datapoints(&index.to_string(), &datapoints)
                    .await?;
                print_success(&format!("Upserted {} datapoints", datapoints.len()));
                Ok(())
            }

            DatapointsSubcommand::Remove { index, ids } => {
                let index: IndexName = index.parse()?;
                let ids = if ids.is_empty() {
                    load_request::<Vec<String>>(require_input_file(cli)?)?
                } else {
                    ids.clone()
                };

                let client = create_client(cli)?;
                client.remove_datapoints(&index.to_string(), &ids).await?;
                print_success(&format!("Removed {} datapoints", ids.len()));
                Ok(())
            }
        }
    }
}
