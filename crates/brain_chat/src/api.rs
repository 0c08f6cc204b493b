//! HTTP client for the Brand Brain answering service.
//!
//! Two calls make up the whole contract: `GET {base}/brands` and
//! `POST {base}/ask`. Both carry the `x-api-key` header from the injected
//! [`ClientConfig`]. Each call is a single attempt: no retry, no timeout,
//! no caching.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::types::{AskRequest, AskResponse, Brand};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Message used when a failed answer carries no `detail`.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// How a brand listing was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// The service answered with a 2xx response.
    Fetched,
    /// The fetch failed; the reason is kept for diagnostics.
    Degraded(String),
}

/// Result of listing brands. Always usable: a failed fetch still yields a
/// list (possibly just the fallback brand) tagged as degraded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandListing {
    pub brands: Vec<Brand>,
    pub status: FetchStatus,
}

impl BrandListing {
    /// Listing from a successful fetch, with the fallback brand appended if missing.
    pub fn fetched(mut brands: Vec<Brand>, fallback: Option<&Brand>) -> Self {
        inject_fallback(&mut brands, fallback);
        Self {
            brands,
            status: FetchStatus::Fetched,
        }
    }

    /// Listing for a failed fetch.
    pub fn degraded(reason: impl Into<String>, fallback: Option<&Brand>) -> Self {
        let mut brands = Vec::new();
        inject_fallback(&mut brands, fallback);
        Self {
            brands,
            status: FetchStatus::Degraded(reason.into()),
        }
    }

    /// Collapse a raw fetch result into a listing, logging failures.
    pub fn from_result(result: ChatResult<Vec<Brand>>, fallback: Option<&Brand>) -> Self {
        match result {
            Ok(brands) => Self::fetched(brands, fallback),
            Err(e) => {
                warn!(kind = e.kind(), "Brand fetch error: {}", e);
                Self::degraded(e.to_string(), fallback)
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, FetchStatus::Degraded(_))
    }

    /// Failure reason of a degraded listing.
    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Fetched => None,
            FetchStatus::Degraded(reason) => Some(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

fn inject_fallback(brands: &mut Vec<Brand>, fallback: Option<&Brand>) {
    if let Some(fallback) = fallback {
        if !brands.iter().any(|b| b.id == fallback.id) {
            brands.push(fallback.clone());
        }
    }
}

/// The remote service as seen by the conversation.
#[async_trait]
pub trait BrandBrainApi: Send + Sync {
    /// List brands. Never fails; see [`BrandListing`].
    async fn list_brands(&self) -> BrandListing;

    /// Ask a question about a brand.
    async fn submit_question(&self, brand_id: &str, question: &str) -> ChatResult<AskResponse>;
}

/// Extract brands from a `/brands` body.
///
/// Accepts `{"brands": [...]}` or a bare array. Any other shape, and any
/// element without a string `id`, contributes nothing.
pub fn parse_brand_list(body: serde_json::Value) -> Vec<Brand> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("brands") {
            Some(serde_json::Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Brand>(item) {
            Ok(brand) => Some(brand),
            Err(e) => {
                debug!("Skipping malformed brand entry: {}", e);
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Map a non-2xx `/ask` response to an error.
pub fn error_from_response(status: StatusCode, body: &str) -> ChatError {
    if status == StatusCode::UNAUTHORIZED {
        return ChatError::Unauthorized;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| d.as_str().map(str::to_string))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    ChatError::Server {
        status: status.as_u16(),
        message,
    }
}

/// reqwest-backed implementation of [`BrandBrainApi`].
pub struct HttpApiClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured reqwest client (proxies, TLS settings).
    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> Self {
        if config.api_key.is_none() {
            warn!("No API key configured; requests will send an empty {} header", API_KEY_HEADER);
        }
        Self { config, client }
    }

    /// Fetch the server's brand list without fallback handling.
    pub async fn fetch_brands(&self) -> ChatResult<Vec<Brand>> {
        let url = self.config.endpoint("brands");
        debug!("Fetching brands from: {}", url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key())
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Server {
                status: status.as_u16(),
                message: "Failed to fetch brands".to_string(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ChatError::Decode(e.to_string()))?;
        Ok(parse_brand_list(value))
    }
}

#[async_trait]
impl BrandBrainApi for HttpApiClient {
    async fn list_brands(&self) -> BrandListing {
        BrandListing::from_result(self.fetch_brands().await, self.config.fallback_brand.as_ref())
    }

    async fn submit_question(&self, brand_id: &str, question: &str) -> ChatResult<AskResponse> {
        let url = self.config.endpoint("ask");
        let request = AskRequest {
            brand_id: brand_id.to_string(),
            question: question.to_string(),
        };
        debug!(brand_id, "POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key())
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Message send error: {}", e);
                ChatError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(status, &body);
            warn!(kind = err.kind(), "Message send error: {}", err);
            return Err(err);
        }

        let body = response.text().await.map_err(|e| {
            warn!("Message send error: {}", e);
            ChatError::from(e)
        })?;
        serde_json::from_str::<AskResponse>(&body)
            .map_err(|e| ChatError::Decode(format!("Failed to parse answer: {}", e)))
    }
}
