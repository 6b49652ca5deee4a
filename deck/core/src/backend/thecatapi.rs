//! The Cat API Client
//!
//! HTTPS client for `api.thecatapi.com`.
//!
//! # Endpoints
//!
//! - `GET /breeds` - paginated breed listing (`limit`, `page`)
//! - `GET /images/search` - images filtered by `breed_ids`
//! - `POST /votes` - record a like (1) or dislike (0)
//!
//! Every request carries the `x-api-key` header when a key is configured.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::traits::{ApiError, Breed, CatApi, CatImage, ImageQuery, VoteReceipt, VoteRequest};
use crate::config::ApiSettings;

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for The Cat API
#[derive(Clone)]
pub struct TheCatApi {
    /// Service root without trailing slash
    base_url: String,
    /// HTTP client with default headers applied
    http_client: reqwest::Client,
}

impl TheCatApi {
    /// Create a client for `base_url`, optionally authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the key is not a valid header value
    /// or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ApiError::Transport(format!("invalid api key header: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create from loaded settings
    ///
    /// # Errors
    ///
    /// See [`TheCatApi::new`].
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.as_deref(),
            settings.timeout,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check status and decode the body
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatApi for TheCatApi {
    fn name(&self) -> &str {
        "TheCatApi"
    }

    async fn list_breeds(&self, page: u32, limit: u32) -> Result<Vec<Breed>, ApiError> {
        let started = Instant::now();
        let response = self
            .http_client
            .get(self.url("breeds"))
            .query(&[("limit", limit), ("page", page)])
            .send()
            .await?;

        let breeds: Vec<Breed> = Self::decode(response).await?;
        tracing::debug!(
            page,
            limit,
            count = breeds.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched breeds"
        );
        Ok(breeds)
    }

    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<CatImage>, ApiError> {
        let limit = query.limit.to_string();
        let response = self
            .http_client
            .get(self.url("images/search"))
            .query(&[
                ("limit", limit.as_str()),
                ("breed_ids", query.breed_id.as_str()),
                ("has_breeds", "1"),
                ("size", query.size.as_str()),
            ])
            .send()
            .await?;

        let images: Vec<CatImage> = Self::decode(response).await?;
        tracing::debug!(
            breed_id = %query.breed_id,
            count = images.len(),
            "Fetched images"
        );
        Ok(images)
    }

    async fn submit_vote(&self, vote: &VoteRequest) -> Result<VoteReceipt, ApiError> {
        let response = self
            .http_client
            .post(self.url("votes"))
            .json(vote)
            .send()
            .await?;

        let receipt: VoteReceipt = Self::decode(response).await?;
        tracing::debug!(image_id = %vote.image_id, value = vote.value, "Vote accepted");
        Ok(receipt)
    }
}
