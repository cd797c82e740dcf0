//! Vector-index service client.

use std::sync::Arc;

use serde_json::Value;

use super::{
    auth::{MetadataServerToken, TokenProvider},
    config::Config,
    error::Result,
    firestore::FirestoreStore,
    http::{base_url, HttpRequest, ReqwestTransport, Transport},
    store::DocumentStore,
};

/// Version prefix of every REST path.
pub const API_VERSION: &str = "v1beta1";

/// Façade over the Vertex AI vector-index APIs and the metadata document.
///
/// The client holds no state beyond its collaborators: every method is an
/// independent round-trip that fetches a fresh bearer token.
///
/// # Example
///
/// ```rust,no_run
/// use imgsearch_vertex::{Config, IndexServiceClient};
///
/// # async fn run() -> imgsearch_vertex::Result<()> {
/// let client = IndexServiceClient::builder(Config::from_env()?).build()?;
/// let operation = client.create_index(512).await?;
/// println!("poll {operation}");
/// # Ok(())
/// # }
/// ```
pub struct IndexServiceClient {
    config: Config,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    store: Arc<dyn DocumentStore>,
}

impl IndexServiceClient {
    pub fn builder(config: Config) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `https://{api host}/v1beta1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> String {
        host_url(&self.config.api_host(), path)
    }

    /// Sends `request` with a freshly fetched bearer token.
    pub(crate) async fn authorized(&self, request: HttpRequest) -> Result<Value> {
        let token = self.tokens.access_token().await?;
        self.transport.send(request.bearer(token)).await
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

/// `https://{host}/v1beta1/{path}`.
pub(crate) fn host_url(host: &str, path: &str) -> String {
    format!("{}/{}/{}", base_url(host), API_VERSION, path)
}

/// Builder for [`IndexServiceClient`].
pub struct ClientBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    tokens: Option<Arc<dyn TokenProvider>>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl ClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            transport: None,
            tokens: None,
            store: None,
        }
    }

    /// Sets the HTTP transport. Defaults to [`ReqwestTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the token provider. Defaults to the metadata server.
    pub fn token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the document store. Defaults to Firestore in the configured
    /// project (or at `firestore_endpoint`), sharing the transport and
    /// token provider.
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<IndexServiceClient> {
        self.config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let tokens: Arc<dyn TokenProvider> = self
            .tokens
            .unwrap_or_else(|| Arc::new(MetadataServerToken::new()));
        let store: Arc<dyn DocumentStore> = match self.store {
            Some(store) => store,
            None => {
                let mut firestore = FirestoreStore::new(
                    self.config.project_id.clone(),
                    transport.clone(),
                    tokens.clone(),
                );
                if let Some(host) = &self.config.firestore_endpoint {
                    firestore = firestore.with_base_url(format!("{}/v1", base_url(host)));
                }
                Arc::new(firestore)
            }
        };

        Ok(IndexServiceClient {
            config: self.config,
            transport,
            tokens,
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::StaticToken, error::Error, store::MemoryStore};

    #[test]
    fn host_url_formats() {
        assert_eq!(
            host_url("us-central1-aiplatform.googleapis.com", "projects/p/operations/1"),
            "https://us-central1-aiplatform.googleapis.com/v1beta1/projects/p/operations/1"
        );
        assert_eq!(
            host_url("http://127.0.0.1:8080", "x:cancel"),
            "http://127.0.0.1:8080/v1beta1/x:cancel"
        );
    }

    #[test]
    fn build_validates_config() {
        let result = IndexServiceClient::builder(Config::new("", "b", "i"))
            .token_provider(Arc::new(StaticToken::new("t")))
            .document_store(Arc::new(MemoryStore::new()))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn api_url_uses_configured_host() {
        let mut config = Config::new("p", "b", "i");
        config.location = "asia-east1".to_string();
        let client = IndexServiceClient::builder(config)
            .token_provider(Arc::new(StaticToken::new("t")))
            .document_store(Arc::new(MemoryStore::new()))
            .build()
            .unwrap();
        assert_eq!(
            client.api_url("projects/p/locations/asia-east1/indexes"),
            "https://asia-east1-aiplatform.googleapis.com/v1beta1/projects/p/locations/asia-east1/indexes"
        );
    }
}
