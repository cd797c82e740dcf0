//! Utility functions for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use imgsearch_vertex::{
    Config, GcloudToken, IndexServiceClient, MetadataServerToken, StaticToken, TokenProvider,
};

use tracing::debug;

use crate::{AuthSource, Cli};

const BASE_DIR: &str = ".imgsearch";
const APP_NAME: &str = "vertex";
const CONFIG_FILE: &str = "config.yaml";

/// Environment variable read by `--auth env`.
pub const ACCESS_TOKEN_ENV: &str = "VERTEX_ACCESS_TOKEN";

/// Returns ~/.imgsearch/vertex/config.yaml.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(BASE_DIR).join(APP_NAME).join(CONFIG_FILE))
}

/// Resolves the configuration: --config, then the default file, then the
/// environment.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        debug!(%path, "using config file");
        return Ok(Config::load(path)?);
    }

    if let Some(path) = default_config_path().filter(|p| p.exists()) {
        debug!(path = %path.display(), "using config file");
        return Ok(Config::load(path)?);
    }

    debug!("using configuration from environment");
    Ok(Config::from_env()?)
}

/// Builds the token provider selected with --auth.
pub fn token_provider(source: AuthSource) -> anyhow::Result<Arc<dyn TokenProvider>> {
    Ok(match source {
        AuthSource::Gcloud => Arc::new(GcloudToken::new()),
        AuthSource::Metadata => Arc::new(MetadataServerToken::new()),
        AuthSource::Env => {
            let token = std::env::var(ACCESS_TOKEN_ENV).map_err(|_| {
                anyhow::anyhow!("{} must be set when using --auth env", ACCESS_TOKEN_ENV)
            })?;
            Arc::new(StaticToken::new(token))
        }
    })
}

/// Creates an index service client from the resolved configuration.
pub fn create_client(cli: &Cli) -> anyhow::Result<IndexServiceClient> {
    let config = get_config(cli)?;
    debug!(project = %config.project_id, location = %config.location, "resolved config");

    let client = IndexServiceClient::builder(config)
        .token_provider(token_provider(cli.auth)?)
        .build()?;
    Ok(client)
}

/// Loads a request from a YAML or JSON file.
pub fn load_request<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    parse_request(&content, path)
}

/// Parses request content, picking the format from the file extension.
pub fn parse_request<T: serde::de::DeserializeOwned>(
    content: &str,
    path: &str,
) -> anyhow::Result<T> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };

    Ok(result)
}

/// Requires input file to be provided.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("input file is required, use -f flag"))
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)?
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgsearch_vertex::Datapoint;

    #[test]
    fn parse_yaml_and_json_requests() {
        let yaml = "- datapoint_id: a\n  feature_vector: [1.0, 2.0]\n";
        let points: Vec<Datapoint> = parse_request(yaml, "points.yaml").unwrap();
        assert_eq!(points[0].datapoint_id, "a");

        let json = r#"[{"datapoint_id": "b", "feature_vector": [0.5]}]"#;
        let points: Vec<Datapoint> = parse_request(json, "points.json").unwrap();
        assert_eq!(points[0].feature_vector, vec![0.5]);
    }

    #[test]
    fn unknown_extension_is_read_as_yaml() {
        let points: Vec<Datapoint> =
            parse_request("[{datapoint_id: c, feature_vector: [3]}]", "points.txt").unwrap();
        assert_eq!(points[0].datapoint_id, "c");
    }

    #[test]
    fn load_request_reads_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.json");
        std::fs::write(&path, r#"["img-1", "img-2"]"#).unwrap();

        let ids: Vec<String> = load_request(path.to_str().unwrap()).unwrap();
        assert_eq!(ids, vec!["img-1", "img-2"]);

        let missing = dir.path().join("absent.yaml");
        assert!(load_request::<Vec<String>>(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn output_result_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        output_result(&serde_json::json!({"done": true}), path.to_str(), true).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"done": true}));
    }

    #[test]
    fn default_config_path_is_under_home() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(".imgsearch/vertex/config.yaml"));
        }
    }
}
