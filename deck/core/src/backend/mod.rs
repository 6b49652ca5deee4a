//! Remote Data Service
//!
//! Abstracted access to the breed/image/vote service through the
//! [`CatApi`] trait.
//!
//! # Available Implementations
//!
//! - **TheCatApi**: HTTPS client for `api.thecatapi.com`
//! - **MockCatApi**: scripted in-memory service for tests
//!
//! # Usage
//!
//! ```ignore
//! use catdeck_core::backend::{CatApi, TheCatApi};
//!
//! let api = TheCatApi::from_settings(&config.api)?;
//! let breeds = api.list_breeds(0, 25).await?;
//! ```

pub mod mock;
mod thecatapi;
mod traits;

pub use mock::MockCatApi;
pub use thecatapi::{TheCatApi, DEFAULT_BASE_URL};
pub use traits::{ApiError, Breed, CatApi, CatImage, ImageQuery, VoteReceipt, VoteRequest};
