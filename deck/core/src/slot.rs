//! Card Slots
//!
//! A [`CardSlot`] is one visible card position. It owns the gesture tracker
//! for whatever candidate is currently shown there and hands committed
//! decisions to the coordinator over its event channel.
//!
//! The slot runs on the rendering side. It never awaits: a commit is
//! marshalled with a non-blocking send, so a full or closed channel drops
//! the decision instead of stalling a frame. A dropped commit springs the
//! card back to rest so it can be decided again.

use tokio::sync::mpsc;

use crate::candidate::{Candidate, CandidateId};
use crate::events::DeckEvent;
use crate::gesture::{GestureConfig, GestureState, GestureTracker, SwipeCommit, SwipeDirection};
use crate::messages::DeckSnapshot;

/// One card position bound to at most one candidate
pub struct CardSlot {
    tracker: GestureTracker,
    bound: Option<CandidateId>,
    events: mpsc::Sender<DeckEvent>,
}

impl CardSlot {
    /// Create an empty slot that reports commits on `events`
    pub fn new(config: GestureConfig, events: mpsc::Sender<DeckEvent>) -> Self {
        Self {
            tracker: GestureTracker::new(config),
            bound: None,
            events,
        }
    }

    /// Show `candidate` in this slot
    ///
    /// The gesture state resets whenever the candidate identity changes;
    /// rebinding the same candidate keeps it.
    pub fn bind(&mut self, candidate: Option<&Candidate>) {
        let id = candidate.map(|c| c.id().clone());
        if id != self.bound {
            tracing::trace!(from = ?self.bound, to = ?id, "Rebinding card slot");
            self.tracker.reset();
            self.bound = id;
        }
    }

    /// Candidate currently shown
    #[must_use]
    pub fn bound(&self) -> Option<&CandidateId> {
        self.bound.as_ref()
    }

    /// Gesture state for rendering
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.tracker.state()
    }

    /// The underlying tracker, for derived transforms
    #[must_use]
    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    /// Propagate a viewport resize to the tracker
    pub fn set_viewport_width(&mut self, width: f32) {
        self.tracker.set_viewport_width(width);
    }

    /// Adopt the viewport width carried by a snapshot
    ///
    /// The width comes from [`DeckEvent::Resized`]; snapshots without one
    /// leave the tracker's width alone.
    pub fn sync_viewport(&mut self, snapshot: &DeckSnapshot) {
        if let Some(width) = snapshot.viewport_width {
            self.tracker.set_viewport_width(width);
        }
    }

    /// Pointer down
    pub fn begin_drag(&mut self) -> bool {
        self.bound.is_some() && self.tracker.begin_drag()
    }

    /// Pointer moved
    pub fn update_drag(&mut self, dx: f32, dy: f32) -> bool {
        self.tracker.update_drag(dx, dy)
    }

    /// Pointer released; reports a commit if the drag crossed the threshold
    pub fn end_drag(&mut self) -> Option<SwipeCommit> {
        let commit = self.tracker.end_drag()?;
        self.report(commit);
        Some(commit)
    }

    /// Like/dislike button
    pub fn force_commit(&mut self, direction: SwipeDirection) -> Option<SwipeCommit> {
        self.bound.as_ref()?;
        let commit = self.tracker.force_commit(direction)?;
        self.report(commit);
        Some(commit)
    }

    /// Advance the running animation
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        self.tracker.tick(delta_ms)
    }

    fn report(&mut self, commit: SwipeCommit) {
        let Some(candidate_id) = self.bound.clone() else {
            return;
        };

        tracing::debug!(
            candidate_id = %candidate_id,
            direction = ?commit.direction,
            source = ?commit.source,
            "Card committed"
        );

        if let Err(e) = self
            .events
            .try_send(DeckEvent::commit(candidate_id, commit.direction))
        {
            tracing::warn!(error = %e, "Commit not delivered to coordinator");
            self.tracker.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Breed, CatImage};
    use crate::gesture::{CommitSource, GesturePhase};

    fn candidate(id: &str) -> Candidate {
        Candidate::pair(&Breed::new("b", "B"), &CatImage::new(id, "u"))
    }

    fn slot() -> (CardSlot, mpsc::Receiver<DeckEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (CardSlot::new(GestureConfig::for_viewport(400.0), tx), rx)
    }

    #[test]
    fn test_unbound_slot_ignores_input() {
        let (mut slot, mut rx) = slot();
        assert!(!slot.begin_drag());
        assert!(slot.force_commit(SwipeDirection::Right).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_drag_commit_is_sent_once() {
        let (mut slot, mut rx) = slot();
        slot.bind(Some(&candidate("a")));

        assert!(slot.begin_drag());
        for dx in [20.0, 60.0, 120.0, 150.0] {
            slot.update_drag(dx, 0.0);
        }
        let commit = slot.end_drag().unwrap();
        assert_eq!(commit.direction, SwipeDirection::Right);
        assert_eq!(commit.source, CommitSource::Gesture);

        assert_eq!(
            rx.try_recv().unwrap(),
            DeckEvent::commit(CandidateId::new("a"), SwipeDirection::Right)
        );
        assert!(rx.try_recv().is_err());

        // Committed cards ignore further input
        assert!(slot.force_commit(SwipeDirection::Left).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_rebind_resets_gesture() {
        let (mut slot, _rx) = slot();
        slot.bind(Some(&candidate("a")));
        slot.force_commit(SwipeDirection::Left);
        assert!(matches!(slot.state().phase, GesturePhase::Committing(_)));

        slot.bind(Some(&candidate("a")));
        assert!(matches!(slot.state().phase, GesturePhase::Committing(_)));

        slot.bind(Some(&candidate("b")));
        assert_eq!(slot.state(), GestureState::RESTING);
        assert_eq!(slot.bound(), Some(&CandidateId::new("b")));
    }

    #[test]
    fn test_full_channel_drops_commit() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut slot = CardSlot::new(GestureConfig::for_viewport(400.0), tx);

        slot.bind(Some(&candidate("a")));
        assert!(slot.force_commit(SwipeDirection::Right).is_some());
        slot.bind(Some(&candidate("b")));
        assert!(slot.force_commit(SwipeDirection::Right).is_some());

        // The second card was not delivered and springs back to rest
        assert_eq!(slot.state(), GestureState::RESTING);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());

        // Once the channel drains the same card can be decided again
        assert!(slot.force_commit(SwipeDirection::Left).is_some());
        assert_eq!(
            rx.try_recv().unwrap(),
            DeckEvent::commit(CandidateId::new("b"), SwipeDirection::Left)
        );
    }

    #[test]
    fn test_closed_channel_does_not_strand_card() {
        let (mut slot, rx) = slot();
        drop(rx);
        slot.bind(Some(&candidate("a")));

        assert!(slot.begin_drag());
        slot.update_drag(150.0, 0.0);
        assert!(slot.end_drag().is_some());
        assert_eq!(slot.state(), GestureState::RESTING);
        assert!(slot.begin_drag());
    }

    #[test]
    fn test_sync_viewport_follows_snapshot() {
        let (mut slot, _rx) = slot();
        let mut snapshot = DeckSnapshot::default();

        slot.sync_viewport(&snapshot);
        assert_eq!(slot.tracker().config().threshold(), 100.0);

        snapshot.viewport_width = Some(800.0);
        slot.sync_viewport(&snapshot);
        assert_eq!(slot.tracker().config().threshold(), 200.0);
    }
}
