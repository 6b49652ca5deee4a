//! Catdeck Core - Headless Swipe-Deck Engine
//!
//! This crate holds everything behind a swipe-to-decide card deck: the
//! per-card gesture state machine, the candidate queue, and submission of
//! each like/dislike to The Cat API. It has no UI dependencies; a surface
//! feeds it pointer input and events and renders the snapshots it sends back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Presentation Layer                        │
//! │   ┌──────────────┐  ┌──────────────┐                          │
//! │   │ CardSlot     │  │ CardSlot     │  (current / next)        │
//! │   │ └ Gesture    │  │ └ Gesture    │                          │
//! │   └──────┬───────┘  └──────────────┘                          │
//! │          │                                                    │
//! │     DeckEvent (up)          DeckMessage (down)                │
//! └──────────┼──────────────────────────▲─────────────────────────┘
//!            │                          │
//! ┌──────────▼──────────────────────────┴─────────────────────────┐
//! │                     QueueCoordinator                          │
//! │   ┌──────────────┐  ┌───────────────────┐  ┌───────────────┐  │
//! │   │ Candidate    │  │ DecisionSubmitter │  │ CatApi        │  │
//! │   │ queue+cursor │  │ (single flight)   │  │ (TheCatApi)   │  │
//! │   └──────────────┘  └───────────────────┘  └───────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use catdeck_core::{
//!     load_config, CardSlot, DeckEvent, QueueConfig, QueueCoordinator, TheCatApi,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config()?;
//!     let api = Arc::new(TheCatApi::from_settings(&config.api)?);
//!
//!     let (msg_tx, mut msg_rx) = mpsc::channel(64);
//!     let (event_tx, event_rx) = mpsc::channel(64);
//!
//!     let coordinator = QueueCoordinator::new(api, QueueConfig::from_config(&config), msg_tx);
//!     tokio::spawn(coordinator.run(event_rx));
//!
//!     let mut top = CardSlot::new(config.gesture, event_tx.clone());
//!     event_tx.send(DeckEvent::Load).await?;
//!
//!     while let Some(msg) = msg_rx.recv().await {
//!         if let Some(snapshot) = msg.as_snapshot() {
//!             top.bind(snapshot.current.as_ref());
//!             top.sync_viewport(snapshot);
//!             // render snapshot.current / snapshot.next
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Easing curves, tweens, and range interpolation
//! - [`gesture`]: Per-card drag/commit state machine
//! - [`candidate`]: Breed + image pairings shown on cards
//! - [`backend`]: Remote service abstraction (The Cat API, scripted mock)
//! - [`submitter`]: One vote call per decision, with a busy flag
//! - [`coordinator`]: Candidate queue, cursor, loads, and advancement
//! - [`slot`]: Gesture tracker bound to the candidate shown in a card
//! - [`events`]: Events from the presentation layer
//! - [`messages`]: Messages to the presentation layer
//! - [`config`]: TOML + environment configuration

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod backend;
pub mod candidate;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod gesture;
pub mod messages;
pub mod slot;
pub mod submitter;

// Re-exports for convenience
pub use backend::{
    ApiError, Breed, CatApi, CatImage, ImageQuery, MockCatApi, TheCatApi, VoteReceipt,
    VoteRequest,
};
pub use candidate::{build_candidates, Candidate, CandidateId};
pub use coordinator::{LoadError, QueueConfig, QueueCoordinator};
pub use events::DeckEvent;
pub use gesture::{
    CommitSource, GestureConfig, GesturePhase, GestureState, GestureTracker, SwipeCommit,
    SwipeDirection,
};
pub use messages::{DeckMessage, DeckSnapshot, DeckState};
pub use slot::CardSlot;
pub use submitter::{Decision, DecisionId, DecisionSubmitter, DecisionValue, SubmitOutcome};

// Animation exports
pub use animation::{interpolate, EasingFunction, Extrapolation, Tween};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ApiSettings, ConfigError,
    ConfigOverrides, ConfigSource, DeckConfigFile, DeckToml, PoolSettings,
};
