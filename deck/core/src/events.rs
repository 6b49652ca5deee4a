//! Deck Events
//!
//! Events sent from the presentation layer to the [`QueueCoordinator`]. The
//! surface reports what the user did; the coordinator decides what happens.
//!
//! [`QueueCoordinator`]: crate::coordinator::QueueCoordinator

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;
use crate::gesture::SwipeDirection;

/// Events from the presentation layer to the coordinator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeckEvent {
    // ============================================
    // Pool Events
    // ============================================
    /// Fetch the candidate pool (initial mount)
    Load,

    /// User asked to retry after a failed load
    Retry,

    // ============================================
    // Decision Events
    // ============================================
    /// A card committed a decision
    Commit {
        /// Candidate the card was bound to when it committed
        candidate_id: CandidateId,
        /// Swipe direction
        direction: SwipeDirection,
    },

    // ============================================
    // Surface Events
    // ============================================
    /// Viewport resized
    ///
    /// The coordinator echoes the width in every later snapshot so each
    /// [`CardSlot`](crate::slot::CardSlot) can rescale its commit threshold
    /// via [`CardSlot::sync_viewport`](crate::slot::CardSlot::sync_viewport).
    Resized {
        /// New viewport width in layout units
        width: f32,
    },
}

impl DeckEvent {
    /// Commit event for a candidate
    pub fn commit(candidate_id: CandidateId, direction: SwipeDirection) -> Self {
        Self::Commit {
            candidate_id,
            direction,
        }
    }

    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Retry => "retry",
            Self::Commit { .. } => "commit",
            Self::Resized { .. } => "resized",
        }
    }
}
