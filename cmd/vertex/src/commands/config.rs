//! Configuration commands.

use clap::{Args, Subcommand};

use super::{default_config_path, get_config, output_result};
use crate::Cli;

/// Show the resolved configuration.
///
/// Configuration comes from --config, ~/.imgsearch/vertex/config.yaml, or
/// the extension environment variables, in that order.
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Print the configuration in use
    View,
    /// Print the configuration as environment variables
    Env,
    /// Print the default config file location
    Path,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;
                output_result(&cfg, cli.output.as_deref(), cli.json)
            }

            ConfigSubcommand::Env => {
                let cfg = get_config(cli)?;
                let mut vars: Vec<_> = cfg.to_env().into_iter().collect();
                vars.sort();
                for (key, value) in vars {
                    println!("{}={}", key, value);
                }
                Ok(())
            }

            ConfigSubcommand::Path => {
                match default_config_path() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("No home directory found"),
                }
                Ok(())
            }
        }
    }
}
