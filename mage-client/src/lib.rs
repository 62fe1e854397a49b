//! Mage HTTP Client
//!
//! A small HTTP client for the Mage.ai REST API.
//!
//! Every call is a single attempt: there is no retry or backoff. Transport
//! failures and non-2xx responses are normalized into
//! [`ClientError::RemoteRequest`], so callers never see reqwest's error type.
//!
//! # Example
//!
//! ```no_run
//! use mage_client::MageClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mage_client::ClientError> {
//!     let client = MageClient::new("http://localhost:6789/api/")?;
//!
//!     for pipeline in client.list_pipelines().await? {
//!         println!("{} ({})", pipeline.name, pipeline.uuid);
//!     }
//!     Ok(())
//! }
//! ```

pub mod endpoint;
pub mod error;
mod blocks;
mod method;
mod pipelines;
mod runs;

// Re-export commonly used types
pub use error::{ClientError, ErrorDetail, Result};
pub use method::Method;

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Timeout applied to every request unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Mage API
///
/// Cloning is cheap and clones share the underlying connection pool, which is
/// released when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct MageClient {
    /// Base URL of the API, without trailing slash (e.g., "http://localhost:6789/api")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl MageClient {
    /// Create a client with no credential and the default timeout
    ///
    /// # Example
    /// ```
    /// use mage_client::MageClient;
    ///
    /// let client = MageClient::new("http://localhost:6789/api/").unwrap();
    /// assert_eq!(client.base_url(), "http://localhost:6789/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, None, DEFAULT_TIMEOUT)
    }

    /// Create a client with an optional credential and a request timeout
    ///
    /// An empty credential is treated the same as no credential: the
    /// `X-API-KEY` header is only attached when there is something to send.
    pub fn with_options(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let mut value = HeaderValue::from_str(key).map_err(|_| {
                ClientError::InvalidConfig("API key is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static("x-api-key"), value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a client around a preconfigured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint relative to the base URL
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    // =============================================================================
    // Raw Requests
    // =============================================================================

    /// Send a request and return the JSON response body
    ///
    /// `method` must be one of GET, POST, PUT or DELETE; anything else fails
    /// with [`ClientError::UnsupportedMethod`] without touching the network.
    /// The payload is only sent for POST and PUT.
    pub async fn request(
        &self,
        endpoint: &str,
        method: &str,
        payload: Option<&Value>,
    ) -> Result<Value> {
        let method: Method = method.parse()?;
        self.send(method, endpoint, payload).await
    }

    /// GET an endpoint and return the raw JSON body
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.send::<Value>(Method::Get, endpoint, None).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<Value> {
        let url = self.url(endpoint);
        tracing::debug!("Making {} request to {}", method, url);

        let mut builder = self.client.request(method.into(), &url);
        if let Some(body) = payload.filter(|_| method.carries_body()) {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Error during API request to {}: {}", url, e);
            ClientError::remote(
                endpoint,
                method,
                None,
                ErrorDetail::Message(format!("Failed to communicate with Mage: {}", e)),
            )
        })?;

        self.handle_response(endpoint, method, response).await
    }

    // =============================================================================
    // Typed Requests
    // =============================================================================

    /// GET an endpoint and decode the body
    async fn get_as<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let value = self.get(endpoint).await?;
        decode(endpoint, value)
    }

    /// Send a JSON body and decode the response
    async fn send_as<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let value = self.send(method, endpoint, Some(body)).await?;
        decode(endpoint, value)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and read the JSON body
    ///
    /// Error bodies are kept as parsed JSON when possible so they can be
    /// surfaced verbatim; otherwise the raw text (or the status line) is kept
    /// as a diagnostic.
    async fn handle_response(
        &self,
        endpoint: &str,
        method: Method,
        response: reqwest::Response,
    ) -> Result<Value> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ClientError::remote(
                endpoint,
                method,
                Some(status.as_u16()),
                ErrorDetail::Message(format!("Failed to read response body: {}", e)),
            )
        })?;

        if !status.is_success() {
            tracing::error!("HTTP error occurred: {} {} -> {}", method, endpoint, status);
            let detail = ErrorDetail::from_body(body, || status.to_string());
            return Err(ClientError::remote(endpoint, method, Some(status.as_u16()), detail));
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            endpoint: endpoint.to_string(),
            message: format!("Failed to parse JSON response: {}", e),
        })
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
