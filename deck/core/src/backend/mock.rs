//! Scripted Cat API
//!
//! In-memory [`CatApi`] for tests and headless runs. Breeds and images are
//! seeded up front; failures are switched on per operation, and
//! votes (or breed listings) can be held open until the test releases them,
//! which is how the single-flight behaviour gets exercised.
//!
//! ```ignore
//! let api = MockCatApi::with_candidates(&["a", "b", "c"]);
//! api.hold_votes();
//! // ... resolve twice ...
//! assert_eq!(api.vote_count(), 1);
//! api.release_votes(1);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::traits::{ApiError, Breed, CatApi, CatImage, ImageQuery, VoteReceipt, VoteRequest};

/// A held-open gate; calls wait for a permit while the gate is closed
struct Gate {
    closed: AtomicBool,
    permits: Arc<Semaphore>,
}

impl Gate {
    fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    async fn pass(&self) {
        if !self.closed.load(Ordering::SeqCst) {
            return;
        }
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

/// Scripted in-memory remote service
pub struct MockCatApi {
    breeds: Mutex<Vec<Breed>>,
    images: Mutex<HashMap<String, Vec<CatImage>>>,
    failing_images: Mutex<HashSet<String>>,
    fail_breeds: AtomicBool,
    fail_votes: AtomicBool,
    votes: Mutex<Vec<VoteRequest>>,
    breed_calls: AtomicUsize,
    image_calls: AtomicUsize,
    vote_gate: Gate,
    breed_gate: Gate,
}

impl Default for MockCatApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatApi {
    /// Empty service: no breeds, everything succeeds
    #[must_use]
    pub fn new() -> Self {
        Self {
            breeds: Mutex::new(Vec::new()),
            images: Mutex::new(HashMap::new()),
            failing_images: Mutex::new(HashSet::new()),
            fail_breeds: AtomicBool::new(false),
            fail_votes: AtomicBool::new(false),
            votes: Mutex::new(Vec::new()),
            breed_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            vote_gate: Gate::new(),
            breed_gate: Gate::new(),
        }
    }

    /// One breed per name, each with a single image whose id is the name.
    ///
    /// Breed ids are `breed-<name>`, image URLs `https://cdn.test/<name>.jpg`.
    #[must_use]
    pub fn with_candidates(names: &[&str]) -> Self {
        let api = Self::new();
        for name in names {
            api.add_breed(
                Breed::new(format!("breed-{name}"), name.to_uppercase())
                    .with_temperament("Curious, Playful, Gentle, Loyal")
                    .with_life_span("12 - 15"),
                vec![CatImage::new(*name, format!("https://cdn.test/{name}.jpg"))],
            );
        }
        api
    }

    /// Add a breed and the images its search returns
    pub fn add_breed(&self, breed: Breed, images: Vec<CatImage>) {
        self.images.lock().insert(breed.id.clone(), images);
        self.breeds.lock().push(breed);
    }

    /// Replace the whole pool with a fresh candidate set
    pub fn replace_candidates(&self, names: &[&str]) {
        let fresh = Self::with_candidates(names);
        *self.breeds.lock() = fresh.breeds.into_inner();
        *self.images.lock() = fresh.images.into_inner();
    }

    /// Make breed listing fail
    pub fn set_fail_breeds(&self, fail: bool) {
        self.fail_breeds.store(fail, Ordering::SeqCst);
    }

    /// Make the image search for one breed fail
    pub fn set_fail_images_for(&self, breed_id: &str, fail: bool) {
        let mut failing = self.failing_images.lock();
        if fail {
            failing.insert(breed_id.to_string());
        } else {
            failing.remove(breed_id);
        }
    }

    /// Make vote submission fail
    pub fn set_fail_votes(&self, fail: bool) {
        self.fail_votes.store(fail, Ordering::SeqCst);
    }

    /// Hold every vote call open until [`MockCatApi::release_votes`]
    pub fn hold_votes(&self) {
        self.vote_gate.closed.store(true, Ordering::SeqCst);
    }

    /// Let `n` held vote calls complete
    pub fn release_votes(&self, n: usize) {
        self.vote_gate.permits.add_permits(n);
    }

    /// Hold every breed listing open until [`MockCatApi::release_breeds`]
    pub fn hold_breeds(&self) {
        self.breed_gate.closed.store(true, Ordering::SeqCst);
    }

    /// Let `n` held breed listings complete
    pub fn release_breeds(&self, n: usize) {
        self.breed_gate.permits.add_permits(n);
    }

    /// Votes that reached the service, in arrival order
    #[must_use]
    pub fn votes(&self) -> Vec<VoteRequest> {
        self.votes.lock().clone()
    }

    /// Number of votes that reached the service
    #[must_use]
    pub fn vote_count(&self) -> usize {
        self.votes.lock().len()
    }

    /// Number of breed listings requested
    #[must_use]
    pub fn breed_calls(&self) -> usize {
        self.breed_calls.load(Ordering::SeqCst)
    }

    /// Number of image searches requested
    #[must_use]
    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatApi for MockCatApi {
    fn name(&self) -> &str {
        "MockCatApi"
    }

    async fn list_breeds(&self, page: u32, limit: u32) -> Result<Vec<Breed>, ApiError> {
        self.breed_calls.fetch_add(1, Ordering::SeqCst);
        self.breed_gate.pass().await;

        if self.fail_breeds.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                body: "breeds unavailable".to_string(),
            });
        }

        let breeds = self.breeds.lock();
        let start = (page as usize).saturating_mul(limit as usize);
        Ok(breeds
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search_images(&self, query: &ImageQuery) -> Result<Vec<CatImage>, ApiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_images.lock().contains(&query.breed_id) {
            return Err(ApiError::Transport(format!(
                "image search for {} timed out",
                query.breed_id
            )));
        }

        Ok(self
            .images
            .lock()
            .get(&query.breed_id)
            .map(|images| images.iter().take(query.limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn submit_vote(&self, vote: &VoteRequest) -> Result<VoteReceipt, ApiError> {
        let vote_id = {
            let mut votes = self.votes.lock();
            votes.push(vote.clone());
            votes.len() as u64
        };
        self.vote_gate.pass().await;

        if self.fail_votes.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "vote rejected".to_string(),
            });
        }

        Ok(VoteReceipt {
            message: "SUCCESS".to_string(),
            id: Some(vote_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_candidates_pairs_breed_and_image() {
        let api = MockCatApi::with_candidates(&["a", "b"]);
        let breeds = api.list_breeds(0, 10).await.unwrap();
        assert_eq!(breeds.len(), 2);
        assert_eq!(breeds[0].id, "breed-a");

        let images = api
            .search_images(&ImageQuery::for_breed("breed-b", 1))
            .await
            .unwrap();
        assert_eq!(images[0].id, "b");
        assert_eq!(api.breed_calls(), 1);
        assert_eq!(api.image_calls(), 1);
    }

    #[tokio::test]
    async fn test_pagination() {
        let api = MockCatApi::with_candidates(&["a", "b", "c"]);
        let page = api.list_breeds(1, 2).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "breed-c");
    }

    #[tokio::test]
    async fn test_failures() {
        let api = MockCatApi::with_candidates(&["a"]);
        api.set_fail_breeds(true);
        assert!(api.list_breeds(0, 10).await.is_err());

        api.set_fail_images_for("breed-a", true);
        assert!(api
            .search_images(&ImageQuery::for_breed("breed-a", 1))
            .await
            .is_err());

        api.set_fail_votes(true);
        let vote = VoteRequest {
            image_id: "a".to_string(),
            sub_id: None,
            value: 0,
        };
        assert!(api.submit_vote(&vote).await.is_err());
        // Failed votes still reached the service
        assert_eq!(api.vote_count(), 1);
    }

    #[tokio::test]
    async fn test_held_vote_waits_for_release() {
        let api = Arc::new(MockCatApi::with_candidates(&["a"]));
        api.hold_votes();

        let worker = Arc::clone(&api);
        let handle = tokio::spawn(async move {
            let vote = VoteRequest {
                image_id: "a".to_string(),
                sub_id: None,
                value: 1,
            };
            worker.submit_vote(&vote).await
        });

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        api.release_votes(1);
        let receipt = handle.await.unwrap().unwrap();
        assert_eq!(receipt.message, "SUCCESS");
    }
}
