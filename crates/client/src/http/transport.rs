// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for HTTP communication.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests via reqwest for production
//! - Mock transports for unit testing
//!
//! A transport performs exactly one attempt. Credentials, retries and token
//! refresh are layered on top by [`HttpClient`](super::HttpClient).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

/// Size of the chunks an upload body is streamed in.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Error type for transport operations.
///
/// Every variant means no response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The attempt exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("network failure: {0}")]
    Network(String),

    /// The request could not be built; sending it again cannot succeed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Whether another attempt of the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::InvalidRequest(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Receives upload progress as a percentage in `0..=100`.
pub type ProgressSink = Arc<dyn Fn(u8) + Send + Sync>;

/// A file attached to a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    /// `multipart/form-data` with text fields and one file.
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
}

/// One outgoing request, relative to the transport's base URL.
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    pub body: Option<Body>,
    pub progress: Option<ProgressSink>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("authorized", &self.bearer.is_some())
            .field("body", &self.body)
            .finish()
    }
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        HttpRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: None,
            progress: None,
        }
    }

    pub fn with_body(mut self, body: Option<Body>) -> Self {
        self.body = body;
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Returns the JSON body, if any.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(Body::Json(value)) => Some(value),
            _ => None,
        }
    }
}

/// A response with its status and decoded body.
///
/// Bodies that are not JSON are kept as a JSON string; an empty body is `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        HttpResponse { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for request/response communication.
///
/// This trait abstracts over the actual HTTP stack, allowing for easy testing
/// with mock implementations.
pub trait Transport: Send + Sync {
    /// Performs a single attempt of `request`.
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>>;
}

/// Upload progress for `loaded` of `total` bytes, rounded to a percentage.
pub fn percent(loaded: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (loaded as f64 * 100.0 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

/// HTTP transport implementation using reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a new transport for `base_url` with a per-attempt timeout.
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(ReqwestTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for ReqwestTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<HttpResponse>> + Send + '_>> {
        Box::pin(async move {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, self.url(&request.path));
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(token) = &request.bearer {
                builder = builder.bearer_auth(token);
            }
            builder = match request.body {
                Some(Body::Json(value)) => builder.json(&value),
                Some(Body::Multipart { fields, file }) => {
                    builder.multipart(multipart_form(fields, file, request.progress)?)
                }
                None => builder,
            };

            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let text = response.text().await.map_err(map_reqwest_error)?;

            Ok(HttpResponse::new(status, decode_body(&text)))
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Builds a multipart form whose file part reports progress as it is streamed.
fn multipart_form(
    fields: Vec<(String, String)>,
    file: FilePart,
    progress: Option<ProgressSink>,
) -> TransportResult<reqwest::multipart::Form> {
    use futures_util::stream;

    let total = file.data.len();
    let mut loaded = 0;
    let chunks: Vec<(Vec<u8>, usize)> = file
        .data
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(|chunk| {
            loaded += chunk.len();
            (chunk.to_vec(), loaded)
        })
        .collect();

    let body = reqwest::Body::wrap_stream(stream::iter(chunks.into_iter().map(
        move |(chunk, loaded)| {
            if let Some(sink) = &progress {
                sink(percent(loaded, total));
            }
            Ok::<_, std::io::Error>(chunk)
        },
    )));

    let part = reqwest::multipart::Part::stream_with_length(body, total as u64)
        .file_name(file.file_name)
        .mime_str(&file.content_type)
        .map_err(|e| {
            TransportError::InvalidRequest(format!("content type {}: {}", file.content_type, e))
        })?;

    let mut form = reqwest::multipart::Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    Ok(form.part(file.field, part))
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
