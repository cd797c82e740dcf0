//! HTTP transport for the Vertex AI REST surface.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client as ReqwestClient, Method, Response,
};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::{Error, Result};

const USER_AGENT_VALUE: &str = "imgsearch-vertex-rust/1.0";

/// An outbound JSON request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer_token: Option<String>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            bearer_token: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attaches a bearer token.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Attaches a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends JSON requests and returns JSON responses.
///
/// Implementations map non-success statuses to [`Error::Status`] carrying
/// the response body, so callers can decide whether to surface the body or
/// the wrapper.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Value>;
}

/// [`Transport`] backed by reqwest.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default settings.
    pub fn new() -> Result<Self> {
        let client = ReqwestClient::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value> {
        debug!(method = %request.method, url = %request.url, "vertex request");

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(default_headers(request.bearer_token.as_deref())?);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        handle_response(response).await
    }
}

/// Returns default headers for API requests.
fn default_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::Token("bearer token contains invalid characters".to_string()))?,
        );
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    Ok(headers)
}

/// Handles the API response.
async fn handle_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(Error::Status {
            status: status.as_u16(),
            body: parse_body(&body),
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(&body).map_err(Error::from)
}

/// Parses an error response body.
pub(crate) fn parse_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Turns a host (or a full base URL) into an https base URL.
///
/// Hosts given with an explicit scheme are kept as-is, which lets emulators
/// and local fakes be addressed over plain http.
pub(crate) fn base_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_body_prefers_json() {
        let body = br#"{"error": {"code": 404, "message": "not found"}}"#;
        assert_eq!(
            parse_body(body),
            json!({"error": {"code": 404, "message": "not found"}})
        );
    }

    #[test]
    fn parse_body_falls_back_to_text() {
        assert_eq!(parse_body(b"Bad Gateway"), json!("Bad Gateway"));
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
    }

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(
            base_url("us-central1-aiplatform.googleapis.com"),
            "https://us-central1-aiplatform.googleapis.com"
        );
        assert_eq!(base_url("http://localhost:8080/"), "http://localhost:8080");
    }

    #[test]
    fn headers_carry_bearer_token() {
        let headers = default_headers(Some("tok")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let headers = default_headers(None).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn headers_reject_invalid_token() {
        assert!(matches!(
            default_headers(Some("bad\ntoken")),
            Err(Error::Token(_))
        ));
    }

    /// Answers one request with `status` and `body`; resolves to the
    /// lowercased request head.
    async fn serve_once(status: &str, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            let head = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                    assert!(n > 0, "connection closed before request head");
                    continue;
                };
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + len || n == 0 {
                    break head;
                }
            };
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            head
        });
        (url, handle)
    }

    #[tokio::test]
    async fn reqwest_transport_returns_json_body() {
        let (url, server) = serve_once("200 OK", r#"{"name": "op1"}"#).await;
        let body = ReqwestTransport::new()
            .unwrap()
            .send(HttpRequest::post(format!("{url}/v1beta1/x")).bearer("tok").json(json!({"a": 1})))
            .await
            .unwrap();
        assert_eq!(body, json!({"name": "op1"}));

        let head = server.await.unwrap();
        assert!(head.starts_with("post /v1beta1/x "));
        assert!(head.contains("authorization: bearer tok"));
        assert!(head.contains("user-agent: imgsearch-vertex-rust/1.0"));
    }

    #[tokio::test]
    async fn reqwest_transport_reads_empty_success_as_object() {
        let (url, server) = serve_once("200 OK", "").await;
        let body = ReqwestTransport::new()
            .unwrap()
            .send(HttpRequest::delete(format!("{url}/v1beta1/op")))
            .await
            .unwrap();
        assert_eq!(body, json!({}));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn reqwest_transport_maps_failures_to_status() {
        let error = r#"{"error": {"code": 404, "message": "Operation not found"}}"#;
        let (url, server) = serve_once("404 Not Found", error).await;
        let err = ReqwestTransport::new()
            .unwrap()
            .send(HttpRequest::get(format!("{url}/v1beta1/op")))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(err.is_not_found());
        match err.into_remote() {
            Error::Remote(body) => assert_eq!(
                body,
                json!({"error": {"code": 404, "message": "Operation not found"}})
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reqwest_transport_keeps_bodiless_failures() {
        let (url, server) = serve_once("503 Service Unavailable", "").await;
        let err = ReqwestTransport::new()
            .unwrap()
            .send(HttpRequest::get(format!("{url}/v1beta1/op")))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            err.into_remote(),
            Error::Status {
                status: 503,
                body: Value::Null
            }
        ));
    }

    #[test]
    fn request_builder() {
        let req = HttpRequest::post("https://h/v1beta1/x:cancel")
            .bearer("t")
            .json(json!({}));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.bearer_token.as_deref(), Some("t"));
        assert_eq!(req.body, Some(json!({})));
    }
}
