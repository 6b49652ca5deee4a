//! Queue Coordinator
//!
//! Owns the candidate queue and its cursor and sequences everything that
//! touches them: pool loads, decision submission, and advancement. It is the
//! only place the queue is mutated.
//!
//! # Concurrency
//!
//! Remote calls run as spawned tasks. Their results come back through the
//! coordinator's own completion channel and are applied one at a time, either
//! by [`QueueCoordinator::run`] or by polling with
//! [`QueueCoordinator::poll_completions`] / [`QueueCoordinator::next_completion`].
//! A decision made while another is still being submitted is dropped, never
//! queued.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ─load─▶ Loading ─ok─▶ Ready ─resolve─▶ Resolving ─outcome─▶ Ready
//!                 │  ▲                                              │
//!               fail └──────────── wrap (cursor == len) ◀───────────┘
//!                 ▼
//!               Error ─retry─▶ Loading  (decisions on the kept queue stay in Error)
//! ```

use std::sync::Arc;

use futures::future::try_join_all;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::backend::{ApiError, Breed, CatApi, CatImage, ImageQuery};
use crate::candidate::{build_candidates, Candidate, CandidateId};
use crate::config::{DeckConfigFile, PoolSettings};
use crate::events::DeckEvent;
use crate::gesture::SwipeDirection;
use crate::messages::{DeckMessage, DeckSnapshot, DeckState};
use crate::submitter::{Decision, DecisionId, DecisionSubmitter, SubmitOutcome};

// =============================================================================
// Configuration & Errors
// =============================================================================

/// Coordinator configuration
#[derive(Clone, Debug, Default)]
pub struct QueueConfig {
    /// Which breeds to fetch and how to query their images
    pub pool: PoolSettings,
    /// Subject id attached to every decision
    pub subject_id: Option<String>,
}

impl QueueConfig {
    /// Take the relevant sections of a loaded config file
    #[must_use]
    pub fn from_config(config: &DeckConfigFile) -> Self {
        Self {
            pool: config.pool.clone(),
            subject_id: config.sub_id.clone(),
        }
    }
}

/// Why a pool load failed
#[derive(Debug, Error)]
pub enum LoadError {
    /// Breed listing failed
    #[error("Failed to load breeds: {0}")]
    Breeds(#[source] ApiError),

    /// At least one image search failed
    #[error("Failed to load images: {0}")]
    Images(#[source] ApiError),
}

/// Result of a spawned remote call, tagged with what it belongs to
enum Completion {
    Breeds {
        generation: u64,
        result: Result<Vec<Breed>, ApiError>,
    },
    Images {
        generation: u64,
        breeds: Vec<Breed>,
        result: Result<Vec<Option<CatImage>>, ApiError>,
    },
    Vote {
        decision: Decision,
        /// Load that produced the queue the decision was made against
        queue_generation: u64,
        outcome: SubmitOutcome,
    },
}

// =============================================================================
// Coordinator
// =============================================================================

/// Owner of the candidate queue
pub struct QueueCoordinator<A: CatApi> {
    /// Configuration
    config: QueueConfig,
    /// Remote service
    api: Arc<A>,
    /// Vote submission
    submitter: Arc<DecisionSubmitter<A>>,
    /// Candidates of the last successful load
    queue: Vec<Candidate>,
    /// Index of the current candidate
    cursor: usize,
    /// Lifecycle state
    state: DeckState,
    /// Incremented per load; completions from older loads are discarded
    generation: u64,
    /// Generation of the load that produced `queue`
    queue_generation: u64,
    /// Decision being submitted
    pending: Option<DecisionId>,
    loading_breeds: bool,
    loading_images: bool,
    breeds_error: Option<String>,
    images_error: Option<String>,
    vote_error: Option<String>,
    viewport_width: Option<f32>,
    /// Channel to the presentation layer
    tx: mpsc::Sender<DeckMessage>,
    /// Completions from spawned remote calls
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<A: CatApi + 'static> QueueCoordinator<A> {
    /// Create a coordinator with an empty queue
    pub fn new(api: Arc<A>, config: QueueConfig, tx: mpsc::Sender<DeckMessage>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            config,
            submitter: Arc::new(DecisionSubmitter::new(Arc::clone(&api))),
            api,
            queue: Vec::new(),
            cursor: 0,
            state: DeckState::Idle,
            generation: 0,
            queue_generation: 0,
            pending: None,
            loading_breeds: false,
            loading_images: false,
            breeds_error: None,
            images_error: None,
            vote_error: None,
            viewport_width: None,
            tx,
            completions_tx,
            completions_rx,
        }
    }

    // =========================================================================
    // Read-only views
    // =========================================================================

    /// Lifecycle state
    #[must_use]
    pub fn state(&self) -> DeckState {
        self.state
    }

    /// Candidate on top of the stack
    ///
    /// Absent while the pool is empty or loading. A failed load keeps the
    /// previous queue, so the card under the error stays current.
    #[must_use]
    pub fn current(&self) -> Option<&Candidate> {
        match self.state {
            DeckState::Ready | DeckState::Resolving | DeckState::Error => {
                self.queue.get(self.cursor)
            }
            DeckState::Idle | DeckState::Loading => None,
        }
    }

    /// Candidate beneath the current one
    #[must_use]
    pub fn next(&self) -> Option<&Candidate> {
        self.current()?;
        self.queue.get(self.cursor + 1)
    }

    /// Cursor into the queue
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of queued candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue holds no candidates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether a decision is being submitted
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some() || self.submitter.is_busy()
    }

    /// Current state as a message payload
    #[must_use]
    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            state: self.state,
            current: self.current().cloned(),
            next: self.next().cloned(),
            cursor: self.cursor,
            len: self.queue.len(),
            loading_breeds: self.loading_breeds,
            loading_images: self.loading_images,
            submitting: self.is_submitting(),
            breeds_error: self.breeds_error.clone(),
            images_error: self.images_error.clone(),
            vote_error: self.vote_error.clone(),
            viewport_width: self.viewport_width,
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Fetch the candidate pool
    ///
    /// The previous queue stays in place until the new one is complete; a
    /// failed load leaves it untouched.
    pub async fn load(&mut self) {
        self.start_load();
        self.publish().await;
    }

    /// Retry after a failed load
    pub async fn retry(&mut self) {
        tracing::info!(state = ?self.state, "Retrying pool load");
        self.load().await;
    }

    /// Decide on the current candidate
    ///
    /// Returns `false` when there is no current candidate or a decision is
    /// still being submitted; the call then changes nothing.
    pub async fn resolve(&mut self, direction: SwipeDirection) -> bool {
        if self.is_submitting() {
            tracing::debug!(?direction, "Decision dropped: submission outstanding");
            return false;
        }

        let Some(candidate) = self.current() else {
            tracing::debug!(?direction, state = ?self.state, "Decision dropped: no current candidate");
            return false;
        };

        let decision = Decision::new(
            candidate.id().clone(),
            direction.into(),
            self.config.subject_id.clone(),
        );

        tracing::info!(
            decision_id = %decision.id,
            candidate_id = %decision.item_id,
            cursor = self.cursor,
            value = ?decision.value,
            "Resolving candidate"
        );

        self.pending = Some(decision.id);
        // A decision on the kept queue leaves the load error showing
        if self.state != DeckState::Error {
            self.state = DeckState::Resolving;
        }

        let queue_generation = self.queue_generation;
        let submitter = Arc::clone(&self.submitter);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = submitter.submit(&decision).await;
            let _ = completions.send(Completion::Vote {
                decision,
                queue_generation,
                outcome,
            });
        });

        self.publish().await;
        true
    }

    /// Handle an event from the presentation layer
    pub async fn handle_event(&mut self, event: DeckEvent) {
        tracing::trace!(kind = event.kind(), "Handling deck event");

        match event {
            DeckEvent::Load => self.load().await,
            DeckEvent::Retry => self.retry().await,
            DeckEvent::Commit {
                candidate_id,
                direction,
            } => {
                if !self.is_current(&candidate_id) {
                    tracing::debug!(
                        candidate_id = %candidate_id,
                        "Commit dropped: card no longer current"
                    );
                    return;
                }
                self.resolve(direction).await;
            }
            DeckEvent::Resized { width } => {
                self.viewport_width = Some(width);
                self.publish().await;
            }
        }
    }

    /// Apply every completion that has already arrived
    ///
    /// Returns true if anything was applied.
    pub async fn poll_completions(&mut self) -> bool {
        let mut applied = false;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            applied = true;
        }
        if applied {
            self.publish().await;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn next_completion(&mut self) -> bool {
        match self.completions_rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                self.publish().await;
                true
            }
            None => false,
        }
    }

    /// Drive the coordinator until the event channel closes
    pub async fn run(mut self, mut events: mpsc::Receiver<DeckEvent>) {
        tracing::info!(backend = self.api.name(), "Queue coordinator started");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
                Some(completion) = self.completions_rx.recv() => {
                    self.apply(completion);
                    self.publish().await;
                }
            }
        }

        tracing::info!("Queue coordinator stopped");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn is_current(&self, candidate_id: &CandidateId) -> bool {
        self.current().is_some_and(|c| c.id() == candidate_id)
    }

    fn start_load(&mut self) {
        self.generation += 1;
        self.state = DeckState::Loading;
        self.loading_breeds = true;
        self.loading_images = false;

        let generation = self.generation;
        let (page, limit) = (self.config.pool.page, self.config.pool.limit);
        tracing::info!(generation, page, limit, "Loading candidate pool");

        let api = Arc::clone(&self.api);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = api.list_breeds(page, limit).await;
            let _ = completions.send(Completion::Breeds { generation, result });
        });
    }

    fn start_images(&mut self, breeds: Vec<Breed>) {
        self.loading_images = true;

        let generation = self.generation;
        let queries: Vec<ImageQuery> = breeds
            .iter()
            .map(|breed| {
                ImageQuery::for_breed(&breed.id, self.config.pool.images_per_breed)
                    .with_size(&self.config.pool.image_size)
            })
            .collect();
        tracing::debug!(generation, breeds = breeds.len(), "Fetching images");

        let api = Arc::clone(&self.api);
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = try_join_all(queries.iter().map(|query| api.first_image(query))).await;
            let _ = completions.send(Completion::Images {
                generation,
                breeds,
                result,
            });
        });
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Breeds { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(generation, "Discarding stale breed listing");
                    return;
                }
                self.loading_breeds = false;
                match result {
                    Ok(breeds) => self.start_images(breeds),
                    Err(e) => self.fail_load(&LoadError::Breeds(e)),
                }
            }
            Completion::Images {
                generation,
                breeds,
                result,
            } => {
                if generation != self.generation {
                    tracing::debug!(generation, "Discarding stale image fetch");
                    return;
                }
                self.loading_images = false;
                match result {
                    Ok(images) => self.finish_load(&breeds, &images),
                    Err(e) => self.fail_load(&LoadError::Images(e)),
                }
            }
            Completion::Vote {
                decision,
                queue_generation,
                outcome,
            } => self.finish_vote(decision, queue_generation, outcome),
        }
    }

    fn finish_load(&mut self, breeds: &[Breed], images: &[Option<CatImage>]) {
        self.queue = build_candidates(breeds, images);
        self.queue_generation = self.generation;
        self.cursor = 0;
        self.breeds_error = None;
        self.images_error = None;
        self.state = if self.pending.is_some() {
            DeckState::Resolving
        } else {
            DeckState::Ready
        };

        tracing::info!(
            generation = self.generation,
            candidates = self.queue.len(),
            skipped = breeds.len() - self.queue.len(),
            "Candidate pool ready"
        );
    }

    fn fail_load(&mut self, error: &LoadError) {
        let message = error.to_string();
        match error {
            LoadError::Breeds(_) => self.breeds_error = Some(message),
            LoadError::Images(_) => {
                self.breeds_error = None;
                self.images_error = Some(message);
            }
        }
        self.state = DeckState::Error;

        tracing::warn!(
            generation = self.generation,
            error = %error,
            kept = self.queue.len(),
            "Candidate pool load failed"
        );
    }

    fn finish_vote(&mut self, decision: Decision, queue_generation: u64, outcome: SubmitOutcome) {
        if self.pending != Some(decision.id) {
            tracing::warn!(decision_id = %decision.id, "Outcome for unknown decision ignored");
            return;
        }
        self.pending = None;

        let notice = match outcome {
            SubmitOutcome::Success(_) => {
                self.vote_error = None;
                DeckMessage::VoteRecorded {
                    decision_id: decision.id,
                    candidate_id: decision.item_id,
                }
            }
            SubmitOutcome::Failure(reason) => {
                self.vote_error = Some(reason.clone());
                DeckMessage::VoteFailed {
                    decision_id: decision.id,
                    candidate_id: decision.item_id,
                    reason,
                }
            }
        };
        self.notify(notice);

        if self.state == DeckState::Resolving {
            self.state = DeckState::Ready;
        }

        // The cursor moves on the queue the decision was made against only
        if queue_generation == self.queue_generation {
            self.advance();
        } else {
            tracing::debug!(
                queue_generation,
                current = self.queue_generation,
                "Decision outcome for a replaced queue, cursor kept"
            );
        }
    }

    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.queue.len() {
            tracing::debug!(len = self.queue.len(), "Queue exhausted, wrapping");
            self.cursor = 0;
            self.start_load();
        }
    }

    /// Queue a vote notice without waiting on the surface
    fn notify(&self, message: DeckMessage) {
        if let Err(e) = self.tx.try_send(message) {
            tracing::warn!(error = %e, "Dropped vote notice");
        }
    }

    async fn publish(&self) {
        if let Err(e) = self.tx.send(DeckMessage::Snapshot(self.snapshot())).await {
            tracing::warn!(error = %e, "Surface channel closed");
        }
    }
}
