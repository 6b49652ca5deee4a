//! Tween Timing
//!
//! Frame-rate independent tweens with easing. A tween knows where a value
//! starts, where it ends and how long the trip takes; the caller feeds it
//! elapsed milliseconds from whatever clock drives rendering.

use serde::{Deserialize, Serialize};

/// Easing functions for card motion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing (constant speed)
    #[default]
    Linear,

    /// Fast start, slow end
    EaseOut,

    /// Slow start and end
    EaseInOut,

    /// Cubic ease out
    EaseOutCubic,

    /// Overshoot then settle
    EaseOutBack,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t_minus_1 = t - 1.0;
                1.0 + c3 * t_minus_1.powi(3) + c1 * t_minus_1.powi(2)
            }
        }
    }
}

/// A single value moving from `from` to `to` over a fixed duration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: u32,
    elapsed_ms: u32,
    easing: EasingFunction,
}

impl Tween {
    /// Create a tween; a zero duration completes on the first update
    #[must_use]
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// Linear tween
    #[must_use]
    pub fn linear(from: f32, to: f32, duration_ms: u32) -> Self {
        Self::new(from, to, duration_ms, EasingFunction::Linear)
    }

    /// Advance by `delta_ms`.
    ///
    /// Returns `true` once the tween has reached its end.
    pub fn update(&mut self, delta_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms).min(self.duration_ms);
        self.is_completed()
    }

    /// Progress through the duration (0.0 to 1.0), before easing
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        self.elapsed_ms as f32 / self.duration_ms as f32
    }

    /// Current eased value
    #[must_use]
    pub fn value(&self) -> f32 {
        if self.is_completed() {
            return self.to;
        }
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Target value
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Total duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Whether the end has been reached
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}
