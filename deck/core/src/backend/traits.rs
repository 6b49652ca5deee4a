//! Cat API Traits
//!
//! The remote data service is a collaborator, not part of the core. This
//! module pins down the three operations the deck needs from it and the
//! records that cross the wire, so the coordinator can run against the
//! real HTTP client or a scripted mock without changing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Breed record as returned by the breed listing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breed {
    /// Breed identifier (e.g. "abys")
    pub id: String,
    /// Display name
    pub name: String,
    /// Comma-separated temperament words
    #[serde(default)]
    pub temperament: Option<String>,
    /// Life span text (e.g. "14 - 15")
    #[serde(default)]
    pub life_span: Option<String>,
    /// Country of origin
    #[serde(default)]
    pub origin: Option<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
}

impl Breed {
    /// Minimal breed record
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            temperament: None,
            life_span: None,
            origin: None,
            description: None,
        }
    }

    /// Set temperament
    #[must_use]
    pub fn with_temperament(mut self, temperament: impl Into<String>) -> Self {
        self.temperament = Some(temperament.into());
        self
    }

    /// Set life span
    #[must_use]
    pub fn with_life_span(mut self, life_span: impl Into<String>) -> Self {
        self.life_span = Some(life_span.into());
        self
    }
}

/// Image record as returned by the image search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatImage {
    /// Image identifier, used as the vote key
    pub id: String,
    /// Public image URL
    pub url: String,
    /// Pixel width (if reported)
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height (if reported)
    #[serde(default)]
    pub height: Option<u32>,
}

impl CatImage {
    /// Image record without dimensions
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            width: None,
            height: None,
        }
    }
}

/// Parameters for an image search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageQuery {
    /// Breed id to filter by
    pub breed_id: String,
    /// Maximum number of images
    pub limit: u32,
    /// Requested size bucket ("thumb", "small", "med", "full")
    pub size: String,
}

impl ImageQuery {
    /// Query for `limit` medium-sized images of one breed
    pub fn for_breed(breed_id: impl Into<String>, limit: u32) -> Self {
        Self {
            breed_id: breed_id.into(),
            limit,
            size: "med".to_string(),
        }
    }

    /// Override the size bucket
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }
}

/// Vote body sent to the remote service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    /// Image being voted on
    pub image_id: String,
    /// Optional caller-chosen subject id
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sub_id: Option<String>,
    /// 1 = like, 0 = dislike
    pub value: u8,
}

/// Confirmation record returned for a vote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Status message (the service answers "SUCCESS")
    #[serde(default)]
    pub message: String,
    /// Server-assigned vote id
    #[serde(default)]
    pub id: Option<u64>,
}

/// Errors from the remote service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (DNS, TLS, timeout, ...)
    #[error("request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Remote data service used by the deck
///
/// Implementations must be cheap to share behind an `Arc`; the coordinator
/// calls them from spawned tasks.
#[async_trait]
pub trait CatApi: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// List one page of breeds
    async fn list_breeds(&self, page: u32, limit: u32) -> Result<Vec<Breed>, ApiError>;

    /// Search images for one breed
    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<CatImage>, ApiError>;

    /// Record a vote
    async fn submit_vote(&self, vote: &VoteRequest) -> Result<VoteReceipt, ApiError>;

    /// First image for a breed, if the service has any
    async fn first_image(&self, query: &ImageQuery) -> Result<Option<CatImage>, ApiError> {
        let images = self.search_images(query).await?;
        Ok(images.into_iter().next())
    }
}
