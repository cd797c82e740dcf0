//! Long-running operation lookups.
//!
//! Each call is a round-trip to the API host; failures surface the remote
//! error body itself rather than the HTTP wrapper.

use serde_json::{json, Value};

use super::{client::IndexServiceClient, error::Result, http::HttpRequest};

impl IndexServiceClient {
    /// Fetches the current state of an operation.
    ///
    /// Returns the response body untouched; it deserializes into
    /// [`crate::Operation`] when typed access is wanted.
    pub async fn get_operation(&self, operation_name: &str) -> Result<Value> {
        self.authorized(HttpRequest::get(self.api_url(operation_name)))
            .await
            .map_err(|e| e.into_remote())
    }

    /// Requests cancellation. Returns the (usually empty) response body.
    pub async fn cancel_operation(&self, operation_name: &str) -> Result<Value> {
        let url = self.api_url(&format!("{}:cancel", operation_name));
        self.authorized(HttpRequest::post(url).json(json!({})))
            .await
            .map_err(|e| e.into_remote())
    }

    /// Deletes the operation record. Returns the (usually empty) response body.
    pub async fn delete_operation(&self, operation_name: &str) -> Result<Value> {
        self.authorized(HttpRequest::delete(self.api_url(operation_name)))
            .await
            .map_err(|e| e.into_remote())
    }
}
