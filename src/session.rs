//! HTTP session shared by every client operation.
//!
//! The session owns the configured `reqwest::Client` and turns raw
//! responses into one of three outcomes: ready, not ready (202), or failed.
//! Transport never raises on status on its own. The classification below is
//! the only place that decides what counts as success.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::ErrorResponse;

/// Version of the library, used in User-Agent header
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Accept header for resources served as HAL or plain JSON.
pub const ACCEPT_JSON: &str = "application/hal+json, application/json";
/// Accept header for documents served as text, e.g. the SVG diagram.
pub const ACCEPT_TEXT: &str = "image/svg+xml, */*";

/// How a response status is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Payload is available
    Ready,
    /// Accepted, still being computed; ask again later
    NotReady,
    /// Request error, never retried
    Failed,
}

/// Classify a status: 202 is "not ready", anything else below 400 is ready.
pub fn classify(status: StatusCode) -> StatusClass {
    if status == StatusCode::ACCEPTED {
        StatusClass::NotReady
    } else if status.as_u16() < 400 {
        StatusClass::Ready
    } else {
        StatusClass::Failed
    }
}

/// A configured HTTP client bound to one server.
#[derive(Debug, Clone)]
pub struct HttpSession {
    base_url: String,
    http: Client,
}

impl HttpSession {
    /// Create a session with the timeout and headers from `config`.
    ///
    /// No cap is put on request or response size: archives can be large.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("java2uml-rs/{VERSION}"))
                .unwrap_or_else(|_| HeaderValue::from_static("java2uml-rs")),
        );

        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ClientError::Config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let request = self.http.get(self.url(path)).header(ACCEPT, ACCEPT_JSON);
        let response = self.send(request, path).await?;
        read_json(response, path).await
    }

    /// GET a resource as plain text (e.g. an SVG document).
    pub async fn get_text(&self, path: &str) -> Result<String, ClientError> {
        let request = self.http.get(self.url(path)).header(ACCEPT, ACCEPT_TEXT);
        let response = self.send(request, path).await?;
        response.text().await.map_err(|e| {
            error!(path, error = %e, "failed to read response body");
            to_transport_error(e)
        })
    }

    /// POST a multipart form and read back a JSON resource.
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Value, ClientError> {
        let request = self
            .http
            .post(self.url(path))
            .header(ACCEPT, ACCEPT_JSON)
            .multipart(form);
        let response = self.send(request, path).await?;
        read_json(response, path).await
    }

    /// DELETE a resource, ignoring whatever body comes back.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(path)), path).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|e| {
            error!(path, error = %e, "request failed");
            to_transport_error(e)
        })?;

        let status = response.status();
        debug!(
            path,
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Unknown"),
            "response received"
        );

        match classify(status) {
            StatusClass::Ready => Ok(response),
            StatusClass::NotReady => Err(ClientError::NotReady {
                path: path.to_string(),
            }),
            StatusClass::Failed => {
                let body = response.text().await.unwrap_or_default();
                let detail = parse_error_response(&body);
                error!(path, status = status.as_u16(), body = %body, "server returned an error");
                Err(ClientError::Http {
                    status: status.as_u16(),
                    path: path.to_string(),
                    detail,
                })
            }
        }
    }
}

async fn read_json(response: Response, path: &str) -> Result<Value, ClientError> {
    response.json::<Value>().await.map_err(|e| {
        error!(path, error = %e, "response is not valid JSON");
        if e.is_decode() {
            ClientError::malformed("response", e)
        } else {
            to_transport_error(e)
        }
    })
}

fn to_transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network(e)
    }
}

/// Parse the server's error body, if it is one.
fn parse_error_response(body: &str) -> Option<ErrorResponse> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .filter(|d| !d.http_status.is_empty() || !d.reason.is_empty())
}
