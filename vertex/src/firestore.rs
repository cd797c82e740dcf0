//! Firestore REST implementation of [`DocumentStore`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{
    auth::TokenProvider,
    error::Result,
    http::{HttpRequest, Transport},
    store::{Document, DocumentStore},
};

/// Default Firestore REST base URL.
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default database id.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Reads documents through the Firestore REST API.
pub struct FirestoreStore {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
    project_id: String,
    base_url: String,
}

impl FirestoreStore {
    pub fn new(
        project_id: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            transport,
            tokens,
            project_id: project_id.into(),
            base_url: FIRESTORE_BASE_URL.to_string(),
        }
    }

    /// Points the store at an emulator or proxy.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn document_url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents/{}",
            self.base_url,
            self.project_id,
            DEFAULT_DATABASE,
            path.trim_matches('/')
        )
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, path: &str) -> Result<Option<Document>> {
        let token = self.tokens.access_token().await?;
        let request = HttpRequest::get(self.document_url(path)).bearer(token);

        let body = match self.transport.send(request).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let fields = match body.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields),
            _ => Map::new(),
        };
        Ok(Some(fields))
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Converts a Firestore typed value (`{"stringValue": "x"}`) into plain JSON.
fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return value.clone();
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return value.clone();
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" | "referenceValue"
        | "bytesValue" | "geoPointValue" => inner.clone(),
        // int64 values travel as strings.
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)),
            _ => Value::Object(Map::new()),
        },
        "arrayValue" => match inner.get("values") {
            Some(Value::Array(values)) => Value::Array(values.iter().map(decode_value).collect()),
            _ => Value::Array(Vec::new()),
        },
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::StaticToken, error::Error};
    use serde_json::json;
    use std::sync::Mutex;

    struct OneShot {
        response: Mutex<Option<Result<Value>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl OneShot {
        fn new(response: Result<Value>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(response)),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for OneShot {
        async fn send(&self, request: HttpRequest) -> Result<Value> {
            self.seen.lock().unwrap().push(request);
            self.response.lock().unwrap().take().expect("unexpected request")
        }
    }

    fn store(transport: Arc<OneShot>) -> FirestoreStore {
        FirestoreStore::new("demo", transport, Arc::new(StaticToken::new("tok")))
    }

    #[test]
    fn decode_typed_values() {
        let decoded = decode_value(&json!({"mapValue": {"fields": {
            "status": {"stringValue": "DEPLOYED"},
            "count": {"integerValue": "42"},
            "ratio": {"doubleValue": 0.5},
            "ok": {"booleanValue": true},
            "none": {"nullValue": null},
            "tags": {"arrayValue": {"values": [{"stringValue": "a"}, {"integerValue": "1"}]}},
            "empty": {"arrayValue": {}}
        }}}));

        assert_eq!(
            decoded,
            json!({
                "status": "DEPLOYED",
                "count": 42,
                "ratio": 0.5,
                "ok": true,
                "none": null,
                "tags": ["a", 1],
                "empty": []
            })
        );
    }

    #[tokio::test]
    async fn get_decodes_document() {
        let transport = OneShot::new(Ok(json!({
            "name": "projects/demo/databases/(default)/documents/_ext/metadata",
            "fields": {
                "status": {"stringValue": "DEPLOYING"},
                "index": {"stringValue": "projects/demo/locations/l/indexes/1"}
            }
        })));

        let doc = store(transport.clone()).get("_ext/metadata").await.unwrap().unwrap();
        assert_eq!(doc.get("status"), Some(&json!("DEPLOYING")));

        let seen = transport.seen.lock().unwrap();
        assert_eq!(
            seen[0].url,
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/_ext/metadata"
        );
        assert_eq!(seen[0].bearer_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let transport = OneShot::new(Err(Error::Status {
            status: 404,
            body: json!({"error": {"code": 404, "status": "NOT_FOUND"}}),
        }));
        assert_eq!(store(transport).get("_ext/metadata").await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_failures_propagate() {
        let transport = OneShot::new(Err(Error::Status {
            status: 403,
            body: json!({"error": {"code": 403}}),
        }));
        let err = store(transport).get("_ext/metadata").await.unwrap_err();
        assert_eq!(err.http_status(), Some(403));
    }

    #[tokio::test]
    async fn document_without_fields_is_empty() {
        let transport = OneShot::new(Ok(json!({"name": "x"})));
        let doc = store(transport).get("a/b").await.unwrap();
        assert_eq!(doc, Some(Map::new()));
    }
}
