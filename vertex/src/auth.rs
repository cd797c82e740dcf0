//! Bearer-token providers.
//!
//! Tokens are fetched once per outbound call; nothing here caches them.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::error::{Error, Result};

/// Default GCE/Cloud Functions metadata server token URL.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Produces OAuth2 bearer tokens for Google APIs.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token, mostly useful for tests and short-lived CLI sessions.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(Error::Token("static token is empty".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Fetches tokens from the instance metadata server.
pub struct MetadataServerToken {
    client: reqwest::Client,
    url: String,
}

impl MetadataServerToken {
    pub fn new() -> Self {
        Self::with_url(METADATA_TOKEN_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for MetadataServerToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
}

#[async_trait]
impl TokenProvider for MetadataServerToken {
    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Token(format!(
                "metadata server returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let token: MetadataTokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

/// Shells out to `gcloud auth print-access-token`.
#[derive(Debug, Clone)]
pub struct GcloudToken {
    program: String,
}

impl GcloudToken {
    pub fn new() -> Self {
        Self::with_program("gcloud")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GcloudToken {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for GcloudToken {
    async fn access_token(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::Token(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(Error::Token(format!("{} printed no token", self.program)));
        }
        Ok(token)
    }
}
