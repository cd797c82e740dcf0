//! Error types for the Vertex AI vector-index client.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for vector-index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for vector-index operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The remote service answered with a non-success HTTP status.
    ///
    /// `body` is the response body as returned: parsed JSON when possible,
    /// otherwise the raw text as a JSON string, or `Null` when empty.
    #[error("vertex: http status {status}: {body}")]
    Status { status: u16, body: Value },

    /// Structured error body of the remote service, rethrown verbatim.
    #[error("vertex: {0}")]
    Remote(Value),

    /// Inline error reported by a long-running operation at initiation.
    /// The message is the remote message, unchanged.
    #[error("{0}")]
    Operation(String),

    /// The index endpoint has no public domain name yet.
    #[error("IndexEndpoint {index_endpoint} is not deployed or doesn't have a public endpoint.")]
    EndpointNotDeployed { index_endpoint: String },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The credential provider could not produce a bearer token.
    #[error("token error: {0}")]
    Token(String),

    /// Document store failure.
    #[error("document store error: {0}")]
    Store(String),
}

impl Error {
    /// Replaces a [`Error::Status`] with the remote body it carries.
    ///
    /// Errors without a response body are returned unchanged.
    pub fn into_remote(self) -> Self {
        match self {
            Error::Status { body, .. } if !body.is_null() => Error::Remote(body),
            other => other,
        }
    }

    /// Returns the HTTP status code, if the error came from a response.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the remote service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.http_status() == Some(404)
    }

    /// Returns the message of a structured remote error body.
    ///
    /// Understands both the Google envelope (`{"error": {"message": ..}}`)
    /// and a bare `{"message": ..}` status object.
    pub fn remote_message(&self) -> Option<&str> {
        let body = match self {
            Error::Status { body, .. } | Error::Remote(body) => body,
            Error::Operation(message) => return Some(message),
            _ => return None,
        };
        body.get("error")
            .and_then(|e| e.get("message"))
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn into_remote_unwraps_status_body() {
        let body = json!({"code": 5, "message": "operation not found"});
        let err = Error::Status {
            status: 404,
            body: body.clone(),
        }
        .into_remote();

        match err {
            Error::Remote(b) => assert_eq!(b, body),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn into_remote_keeps_bodiless_errors() {
        let err = Error::Status {
            status: 502,
            body: Value::Null,
        }
        .into_remote();
        assert!(matches!(err, Error::Status { status: 502, .. }));

        let err = Error::Token("no token".to_string()).into_remote();
        assert!(matches!(err, Error::Token(_)));
    }

    #[test]
    fn operation_error_displays_remote_message() {
        let err = Error::Operation("quota exceeded".to_string());
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn remote_message_reads_envelope_and_bare_status() {
        let enveloped = Error::Status {
            status: 400,
            body: json!({"error": {"code": 400, "message": "bad dimensions"}}),
        };
        assert_eq!(enveloped.remote_message(), Some("bad dimensions"));

        let bare = Error::Remote(json!({"code": 9, "message": "precondition"}));
        assert_eq!(bare.remote_message(), Some("precondition"));

        assert_eq!(Error::Config("x".into()).remote_message(), None);
    }

    #[test]
    fn endpoint_not_deployed_names_the_endpoint() {
        let err = Error::EndpointNotDeployed {
            index_endpoint: "projects/p/locations/l/indexEndpoints/42".to_string(),
        };
        assert!(err
            .to_string()
            .contains("projects/p/locations/l/indexEndpoints/42"));
    }

    #[test]
    fn not_found_detection() {
        let err = Error::Status {
            status: 404,
            body: Value::Null,
        };
        assert!(err.is_not_found());
        assert!(!Error::Operation("x".into()).is_not_found());
    }
}
