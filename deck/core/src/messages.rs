//! Deck Messages
//!
//! Messages sent from the [`QueueCoordinator`] to the presentation layer.
//! The surface renders what it is told: a snapshot of the queue after every
//! change, plus a notice for each vote outcome.
//!
//! [`QueueCoordinator`]: crate::coordinator::QueueCoordinator

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateId};
use crate::submitter::DecisionId;

/// Coordinator lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckState {
    /// Created, nothing requested yet
    #[default]
    Idle,
    /// A pool fetch is running
    Loading,
    /// Candidates available (possibly none)
    Ready,
    /// A decision is being submitted
    Resolving,
    /// The last pool fetch failed; waiting for a retry
    Error,
}

/// Read-only view of the queue
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    /// Lifecycle state
    pub state: DeckState,
    /// Candidate on top of the stack
    pub current: Option<Candidate>,
    /// Candidate rendered beneath it
    pub next: Option<Candidate>,
    /// Cursor into the queue
    pub cursor: usize,
    /// Queue length
    pub len: usize,
    /// Breed listing in flight
    pub loading_breeds: bool,
    /// Image prefetch in flight
    pub loading_images: bool,
    /// Vote in flight
    pub submitting: bool,
    /// Last breed listing failure
    pub breeds_error: Option<String>,
    /// Last image prefetch failure
    pub images_error: Option<String>,
    /// Last vote failure
    pub vote_error: Option<String>,
    /// Viewport width last reported by the surface, for
    /// [`CardSlot::sync_viewport`](crate::slot::CardSlot::sync_viewport)
    pub viewport_width: Option<f32>,
}

impl DeckSnapshot {
    /// Whether any fetch is running
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading_breeds || self.loading_images
    }

    /// First pool error, for a retry banner
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.breeds_error
            .as_deref()
            .or(self.images_error.as_deref())
    }
}

/// Messages from the coordinator to the presentation layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeckMessage {
    /// Queue state changed
    Snapshot(DeckSnapshot),

    /// A vote was accepted by the service
    VoteRecorded {
        /// Decision correlation id
        decision_id: DecisionId,
        /// Candidate voted on
        candidate_id: CandidateId,
    },

    /// A vote failed; the queue advanced anyway
    VoteFailed {
        /// Decision correlation id
        decision_id: DecisionId,
        /// Candidate voted on
        candidate_id: CandidateId,
        /// Failure description
        reason: String,
    },
}

impl DeckMessage {
    /// The snapshot, if this is one
    #[must_use]
    pub fn as_snapshot(&self) -> Option<&DeckSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
