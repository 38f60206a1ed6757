// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for replaying queued operations.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use outbox_core::Method;
use reqwest::Url;
use serde_json::Value;

/// Longest response body kept in a [`TransportError::Status`] message.
const BODY_EXCERPT_LEN: usize = 200;

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint could not be turned into a URL.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// The response could not be read.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Delivers one operation to the remote system.
///
/// Implementations resolve `endpoint` themselves; the engine passes it
/// through unchanged.
pub trait Transport: Send + Sync {
    /// Perform one call. `Ok(None)` means the server sent no JSON body.
    fn call<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        body: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<Value>>> + Send + 'a>>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn call<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        body: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<Value>>> + Send + 'a>> {
        (**self).call(endpoint, method, body)
    }
}

/// HTTP transport using reqwest.
///
/// Relative endpoints are appended to the base URL, keeping any path the
/// base already has. Absolute `http(s)://` endpoints are used as given.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> TransportResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| TransportError::InvalidEndpoint(base_url.into()))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(HttpTransport {
            client,
            base_url,
            token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint against the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> TransportResult<Url> {
        let invalid = || TransportError::InvalidEndpoint(endpoint.to_string());
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Url::parse(endpoint).map_err(|_| invalid());
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}")).map_err(|_| invalid())
    }
}

impl Transport for HttpTransport {
    fn call<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        body: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<Value>>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.endpoint_url(endpoint)?;
            let mut request = self.client.request(http_method(method), url);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))?;

            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    body: excerpt(&bytes),
                });
            }
            if bytes.is_empty() {
                return Ok(None);
            }
            Ok(serde_json::from_slice(&bytes).ok())
        })
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    match text.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
