//! Decision Submitter
//!
//! Wraps the remote vote call. One decision, one call, no retry.
//!
//! The submitter exposes a busy flag instead of queueing: callers check
//! [`DecisionSubmitter::is_busy`] before submitting and drop the attempt if
//! a vote is still outstanding. `submit` itself does not consult the flag,
//! so a caller that skips the check can double-submit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{CatApi, VoteReceipt, VoteRequest};
use crate::candidate::CandidateId;
use crate::gesture::SwipeDirection;

/// Unique id of a decision, for log correlation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub Uuid);

impl DecisionId {
    /// Generate a new random id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dec_{}", self.0.simple())
    }
}

/// Binary decision value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionValue {
    /// Swipe right
    Like,
    /// Swipe left
    Dislike,
}

impl DecisionValue {
    /// Wire value: like = 1, dislike = 0
    #[must_use]
    pub fn wire_value(self) -> u8 {
        match self {
            Self::Like => 1,
            Self::Dislike => 0,
        }
    }
}

impl From<SwipeDirection> for DecisionValue {
    fn from(direction: SwipeDirection) -> Self {
        match direction {
            SwipeDirection::Right => Self::Like,
            SwipeDirection::Left => Self::Dislike,
        }
    }
}

/// One committed decision, alive for a single remote call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Correlation id
    pub id: DecisionId,
    /// Candidate decided on
    pub item_id: CandidateId,
    /// Like or dislike
    pub value: DecisionValue,
    /// Optional subject the vote is attributed to
    pub subject_id: Option<String>,
    /// When the commit happened
    pub created_at: DateTime<Utc>,
}

impl Decision {
    /// New decision stamped now
    pub fn new(item_id: CandidateId, value: DecisionValue, subject_id: Option<String>) -> Self {
        Self {
            id: DecisionId::generate(),
            item_id,
            value,
            subject_id,
            created_at: Utc::now(),
        }
    }

    /// Wire body for the vote endpoint
    #[must_use]
    pub fn to_vote_request(&self) -> VoteRequest {
        VoteRequest {
            image_id: self.item_id.0.clone(),
            sub_id: self.subject_id.clone(),
            value: self.value.wire_value(),
        }
    }
}

/// Result of one submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service recorded the vote
    Success(VoteReceipt),
    /// The call failed; the decision is dropped
    Failure(String),
}

impl SubmitOutcome {
    /// Whether the vote was recorded
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Counts one outstanding submission until dropped, however it ends
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Single remote vote call with a busy flag
pub struct DecisionSubmitter<A: CatApi> {
    api: Arc<A>,
    /// Submissions started and not yet finished
    in_flight: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl<A: CatApi> DecisionSubmitter<A> {
    /// Create a submitter over a shared API handle
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            in_flight: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        }
    }

    /// Whether any submission is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failed submission, until the next one starts
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Send one vote and report the outcome. Never retries.
    pub async fn submit(&self, decision: &Decision) -> SubmitOutcome {
        let _in_flight = InFlight::enter(&self.in_flight);
        *self.last_error.lock() = None;

        tracing::debug!(
            decision_id = %decision.id,
            candidate_id = %decision.item_id,
            value = ?decision.value,
            backend = self.api.name(),
            "Submitting decision"
        );

        match self.api.submit_vote(&decision.to_vote_request()).await {
            Ok(receipt) => {
                tracing::info!(
                    decision_id = %decision.id,
                    candidate_id = %decision.item_id,
                    "Decision recorded"
                );
                SubmitOutcome::Success(receipt)
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(
                    decision_id = %decision.id,
                    candidate_id = %decision.item_id,
                    error = %reason,
                    "Decision submission failed"
                );
                *self.last_error.lock() = Some(reason.clone());
                SubmitOutcome::Failure(reason)
            }
        }
    }
}
