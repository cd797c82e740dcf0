//! CLI commands module.

mod config;
mod datapoints;
mod endpoint;
mod index;
mod operation;
mod query;
mod status;
mod util;

pub use config::ConfigCommand;
pub use datapoints::DatapointsCommand;
pub use endpoint::{DeployCommand, EndpointCommand};
pub use index::IndexCommand;
pub use operation::OperationCommand;
pub use query::QueryCommand;
pub use status::StatusCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
