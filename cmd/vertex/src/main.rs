//! Vertex CLI - operate the reverse image search vector index.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    ConfigCommand, DatapointsCommand, DeployCommand, EndpointCommand, IndexCommand,
    OperationCommand, QueryCommand, StatusCommand,
};

/// Vertex CLI - operate the reverse image search vector index.
///
/// This tool drives the Vertex AI Vector Search deployment used for
/// reverse image search:
///   - Index and index endpoint creation
///   - Index deployment
///   - Datapoint upsert and removal
///   - Nearest-neighbor queries
///   - Long-running operation management
///
/// Configuration is read from ~/.imgsearch/vertex/config.yaml, a file given
/// with --config, or the extension environment variables.
#[derive(Parser)]
#[command(name = "vertex")]
#[command(about = "Vertex AI vector-index CLI tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.imgsearch/vertex/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Where bearer tokens come from
    #[arg(long, global = true, value_enum, default_value_t = AuthSource::Gcloud)]
    pub auth: AuthSource,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input request file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AuthSource {
    /// `gcloud auth print-access-token`
    Gcloud,
    /// Instance metadata server
    Metadata,
    /// The VERTEX_ACCESS_TOKEN environment variable
    Env,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the resolved configuration
    Config(ConfigCommand),
    /// Index management
    Index(IndexCommand),
    /// Index endpoint management
    Endpoint(EndpointCommand),
    /// Deploy an index onto an endpoint
    Deploy(DeployCommand),
    /// Datapoint upsert and removal
    Datapoints(DatapointsCommand),
    /// Nearest-neighbor search
    Query(QueryCommand),
    /// Long-running operation management
    Operation(OperationCommand),
    /// Show the deployment status document
    Status(StatusCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Config(cmd) => cmd.run(&cli).await,
        Commands::Index(cmd) => cmd.run(&cli).await,
        Commands::Endpoint(cmd) => cmd.run(&cli).await,
        Commands::Deploy(cmd) => cmd.run(&cli).await,
        Commands::Datapoints(cmd) => cmd.run(&cli).await,
        Commands::Query(cmd) => cmd.run(&cli).await,
        Commands::Operation(cmd) => cmd.run(&cli).await,
        Commands::Status(cmd) => cmd.run(&cli).await,
    };

    if let Err(e) = result {
        error!("{}", error_message(&e));
        process::exit(1);
    }
}

/// Prefers the service's own message over the wrapped error chain.
fn error_message(err: &anyhow::Error) -> String {
    err.downcast_ref::<imgsearch_vertex::Error>()
        .and_then(imgsearch_vertex::Error::remote_message)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:#}", err))
}
