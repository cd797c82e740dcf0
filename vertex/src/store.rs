//! Document store interface and the in-memory implementation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::{Error, Result};

/// Fields of a stored document.
pub type Document = Map<String, Value>;

/// Read access to documents addressed by slash-separated paths
/// (`collection/document[/collection/document...]`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the document's fields, or `None` if it does not exist.
    async fn get(&self, path: &str) -> Result<Option<Document>>;
}

/// An in-memory document store backed by a HashMap.
#[derive(Clone, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<HashMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `fields` at `path`, replacing any existing document.
    pub fn set(&self, path: &str, fields: Document) -> Result<()> {
        let mut docs = self.docs.lock().map_err(|e| Error::Store(e.to_string()))?;
        docs.insert(path.to_string(), fields);
        Ok(())
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        let mut docs = self.docs.lock().map_err(|e| Error::Store(e.to_string()))?;
        docs.remove(path);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Document>> {
        let docs = self.docs.lock().map_err(|e| Error::Store(e.to_string()))?;
        Ok(docs.get(path).cloned())
    }
}
