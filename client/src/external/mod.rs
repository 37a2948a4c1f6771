//! Backend API client
//!
//! One `reqwest` client shared by the field, recommendation and diagnosis
//! operations. Every failure is mapped to the calling operation's error kind.

pub mod diagnosis;
pub mod fields;
pub mod recommendations;

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

pub use diagnosis::load_leaf_image;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest error body kept in a diagnostic message
const MAX_ERROR_BODY: usize = 256;

/// Remote operations exposed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateField,
    ReadField,
    Recommend,
    Diagnose,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateField => "create_field",
            Operation::ReadField => "read_field",
            Operation::Recommend => "recommend",
            Operation::Diagnose => "diagnose",
        }
    }

    /// Wrap a failure in this operation's error kind
    pub fn error(self, message: impl Into<String>) -> ClientError {
        let message = message.into();
        match self {
            Operation::CreateField => ClientError::FieldCreation(message),
            Operation::ReadField => ClientError::FieldFetch(message),
            Operation::Recommend => ClientError::RecommendationFetch(message),
            Operation::Diagnose => ClientError::Diagnosis(message),
        }
    }
}

/// Client for the crop advisory backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new API client from configuration
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::Configuration(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "Base URL {} cannot carry a path",
                config.base_url
            )));
        }
        if config.timeout_secs == 0 {
            return Err(ClientError::Configuration(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("crop-advisor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve path segments below the base URL, percent-encoding each one
    fn endpoint(&self, operation: Operation, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| operation.error("Base URL cannot carry a path"))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Send a request and decode a JSON success body
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                let message = self.describe_transport_error(&e);
                tracing::error!(
                    operation = operation.name(),
                    %request_id,
                    "Request failed: {}",
                    message
                );
                operation.error(message)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                operation = operation.name(),
                %request_id,
                status = status.as_u16(),
                "Backend rejected request"
            );
            return Err(operation.error(format!(
                "API returned {}: {}",
                status,
                truncate(&body, MAX_ERROR_BODY)
            )));
        }

        let body = response.json::<T>().await.map_err(|e| {
            tracing::error!(
                operation = operation.name(),
                %request_id,
                "Failed to parse response: {}",
                e
            );
            operation.error(format!("Failed to parse response: {}", e))
        })?;

        tracing::debug!(
            operation = operation.name(),
            %request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        Ok(body)
    }

    fn describe_transport_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            format!("Request timed out after {}s", self.timeout.as_secs())
        } else if error.is_connect() {
            format!("Could not reach backend at {}: {}", self.base_url, error)
        } else {
            format!("Request failed: {}", error)
        }
    }
}

fn truncate(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}
