//! Gesture Tracker
//!
//! Turns a continuous drag into a discrete like/dislike decision.
//!
//! # State Machine
//!
//! ```text
//!            begin_drag            end_drag (|x| > T)
//!   Idle ──────────────▶ Dragging ───────────────────▶ Committing(dir)
//!    ▲                      │                                ▲
//!    │                      │ end_drag (|x| <= T)            │ force_commit(dir)
//!    │   tick (finished)    ▼                                │ (any phase but Committing)
//!    └────────────── SpringingBack ──────────────────────────┘
//! ```
//!
//! The tracker runs on whatever context renders frames. It performs no I/O
//! and holds no handles to the queue: entering `Committing` returns a
//! [`SwipeCommit`] exactly once, and the caller forwards it. The fly-off
//! animation that follows is cosmetic and never delays that return.

use serde::{Deserialize, Serialize};

use crate::animation::{interpolate, EasingFunction, Extrapolation, Tween};

/// Horizontal drag distance (px) over which the card shrinks to its minimum scale
const SCALE_DRAG_DISTANCE: f32 = 100.0;

/// Card scale at full drag
const MIN_DRAG_SCALE: f32 = 0.95;

/// Card tilt at half a viewport of travel
const MAX_ROTATION_DEG: f32 = 30.0;

/// Fly-off target as a multiple of the viewport width
const FLY_OUT_RATIO: f32 = 1.5;

/// Direction of a committed swipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Dislike
    Left,
    /// Like
    Right,
}

impl SwipeDirection {
    /// -1.0 for left, 1.0 for right
    #[must_use]
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// What caused a commit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitSource {
    /// Drag released past the threshold
    Gesture,
    /// Button or other programmatic trigger
    Programmatic,
}

/// Discrete phase of a card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// At rest
    #[default]
    Idle,
    /// Following the pointer
    Dragging,
    /// Decision fixed; card flying off screen
    Committing(SwipeDirection),
    /// Drag abandoned; card returning to rest
    SpringingBack,
}

/// Per-card visual state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    /// Horizontal translation in px
    pub offset_x: f32,
    /// Vertical translation in px
    pub offset_y: f32,
    /// Uniform scale
    pub scale: f32,
    /// Discrete phase
    pub phase: GesturePhase,
}

impl GestureState {
    /// Resting state: `{0, 0, 1, Idle}`
    pub const RESTING: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        phase: GesturePhase::Idle,
    };

    /// Whether this is exactly the resting state
    #[must_use]
    pub fn is_resting(&self) -> bool {
        *self == Self::RESTING
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::RESTING
    }
}

/// Committed decision produced by the tracker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwipeCommit {
    /// Which way the card left
    pub direction: SwipeDirection,
    /// Drag release or programmatic trigger
    pub source: CommitSource,
}

/// Tuning for one tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Width of the viewport the card lives in, in px
    pub viewport_width: f32,
    /// Commit threshold as a fraction of the viewport width
    pub threshold_ratio: f32,
    /// Fly-off duration after a drag commit
    pub flick_duration_ms: u32,
    /// Fly-off duration after a programmatic commit
    pub forced_duration_ms: u32,
    /// Spring-back duration
    pub spring_duration_ms: u32,
    /// Spring-back curve
    pub spring_easing: EasingFunction,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            viewport_width: 390.0,
            threshold_ratio: 0.25,
            flick_duration_ms: 200,
            forced_duration_ms: 300,
            spring_duration_ms: 350,
            spring_easing: EasingFunction::EaseOutBack,
        }
    }
}

impl GestureConfig {
    /// Default tuning for a given viewport width
    #[must_use]
    pub fn for_viewport(viewport_width: f32) -> Self {
        Self {
            viewport_width: viewport_width.max(1.0),
            ..Self::default()
        }
    }

    /// Commit threshold in px
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold_ratio * self.viewport_width
    }
}

/// Running animation, if any
#[derive(Clone, Copy, Debug)]
enum Motion {
    Still,
    FlyOut { x: Tween },
    SpringBack { x: Tween, y: Tween, scale: Tween },
}

/// Drag-to-decide state machine for one card
#[derive(Clone, Debug)]
pub struct GestureTracker {
    config: GestureConfig,
    state: GestureState,
    motion: Motion,
}

impl GestureTracker {
    /// Fresh tracker at rest
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::RESTING,
            motion: Motion::Still,
        }
    }

    /// Current visual state
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.state.phase
    }

    /// Active tuning
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Track a new viewport width; affects thresholds from now on
    pub fn set_viewport_width(&mut self, width: f32) {
        self.config.viewport_width = width.max(1.0);
    }

    /// Drop all state and any running animation
    pub fn reset(&mut self) {
        self.state = GestureState::RESTING;
        self.motion = Motion::Still;
    }

    /// `Idle → Dragging`. Returns whether the transition happened.
    pub fn begin_drag(&mut self) -> bool {
        if self.state.phase != GesturePhase::Idle {
            return false;
        }
        self.state.phase = GesturePhase::Dragging;
        true
    }

    /// Follow the pointer. Ignored outside `Dragging`.
    pub fn update_drag(&mut self, dx: f32, dy: f32) -> bool {
        if self.state.phase != GesturePhase::Dragging {
            return false;
        }
        self.state.offset_x = dx;
        self.state.offset_y = dy;
        self.state.scale = interpolate(
            dx.abs(),
            &[0.0, SCALE_DRAG_DISTANCE],
            &[1.0, MIN_DRAG_SCALE],
            Extrapolation::Clamp,
        );
        true
    }

    /// Release the drag and apply the commit rule.
    ///
    /// Returns the commit when the release crossed the threshold; `None`
    /// when the card springs back or the tracker was not dragging.
    pub fn end_drag(&mut self) -> Option<SwipeCommit> {
        if self.state.phase != GesturePhase::Dragging {
            return None;
        }

        let threshold = self.config.threshold();
        let x = self.state.offset_x;
        if x > threshold {
            Some(self.commit(SwipeDirection::Right, CommitSource::Gesture))
        } else if x < -threshold {
            Some(self.commit(SwipeDirection::Left, CommitSource::Gesture))
        } else {
            self.spring_back();
            None
        }
    }

    /// Commit without a drag (tap buttons). No-op while already committing.
    pub fn force_commit(&mut self, direction: SwipeDirection) -> Option<SwipeCommit> {
        if matches!(self.state.phase, GesturePhase::Committing(_)) {
            return None;
        }
        Some(self.commit(direction, CommitSource::Programmatic))
    }

    /// Advance the running animation by `delta_ms`.
    ///
    /// Returns `true` while something is still moving.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        match &mut self.motion {
            Motion::Still => false,
            Motion::FlyOut { x } => {
                let done = x.update(delta_ms);
                self.state.offset_x = x.value();
                if done {
                    // Card is off screen; phase stays Committing until reset
                    self.motion = Motion::Still;
                }
                !done
            }
            Motion::SpringBack { x, y, scale } => {
                let done_x = x.update(delta_ms);
                let done_y = y.update(delta_ms);
                let done_scale = scale.update(delta_ms);
                self.state.offset_x = x.value();
                self.state.offset_y = y.value();
                self.state.scale = scale.value();

                let done = done_x && done_y && done_scale;
                if done {
                    self.state = GestureState::RESTING;
                    self.motion = Motion::Still;
                }
                !done
            }
        }
    }

    /// Whether an animation is running
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !matches!(self.motion, Motion::Still)
    }

    /// Card tilt in degrees; rendering only
    #[must_use]
    pub fn rotation_deg(&self) -> f32 {
        let half = self.config.viewport_width / 2.0;
        interpolate(
            self.state.offset_x,
            &[-half, 0.0, half],
            &[-MAX_ROTATION_DEG, 0.0, MAX_ROTATION_DEG],
            Extrapolation::Clamp,
        )
    }

    /// Opacity of the "LIKE" badge
    #[must_use]
    pub fn like_opacity(&self) -> f32 {
        interpolate(
            self.state.offset_x,
            &[0.0, self.config.threshold()],
            &[0.0, 1.0],
            Extrapolation::Clamp,
        )
    }

    /// Opacity of the "NOPE" badge
    #[must_use]
    pub fn nope_opacity(&self) -> f32 {
        interpolate(
            self.state.offset_x,
            &[-self.config.threshold(), 0.0],
            &[1.0, 0.0],
            Extrapolation::Clamp,
        )
    }

    fn commit(&mut self, direction: SwipeDirection, source: CommitSource) -> SwipeCommit {
        let duration = match source {
            CommitSource::Gesture => self.config.flick_duration_ms,
            CommitSource::Programmatic => self.config.forced_duration_ms,
        };
        let target = direction.sign() * FLY_OUT_RATIO * self.config.viewport_width;

        self.state.phase = GesturePhase::Committing(direction);
        self.motion = Motion::FlyOut {
            x: Tween::linear(self.state.offset_x, target, duration),
        };

        tracing::trace!(?direction, ?source, offset_x = self.state.offset_x, "Swipe committed");
        SwipeCommit { direction, source }
    }

    fn spring_back(&mut self) {
        let easing = self.config.spring_easing;
        let duration = self.config.spring_duration_ms;

        self.state.phase = GesturePhase::SpringingBack;
        self.motion = Motion::SpringBack {
            x: Tween::new(self.state.offset_x, 0.0, duration, easing),
            y: Tween::new(self.state.offset_y, 0.0, duration, easing),
            scale: Tween::new(self.state.scale, 1.0, duration, easing),
        };
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
