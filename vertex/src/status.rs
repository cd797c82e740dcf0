//! Deployment status stored in the metadata document.

use super::{client::IndexServiceClient, error::Result, store::Document};

impl IndexServiceClient {
    /// Reads the deployment status document.
    ///
    /// The stored fields are returned as-is, whatever their shape. A missing
    /// document yields an empty map. Use [`crate::IndexStatusRecord`] for
    /// typed access to the well-known fields.
    pub async fn check_index_status(&self) -> Result<Document> {
        let path = self.config().metadata_doc();
        Ok(self.store().get(&path).await?.unwrap_or_default())
    }
}
