//! Animation Primitives
//!
//! Surface-agnostic motion helpers used by the gesture tracker. Nothing in
//! here knows about cards or decisions; it maps numbers to numbers.
//!
//! - [`Tween`]: a value travelling between two points over time
//! - [`EasingFunction`]: curve applied to a tween's progress
//! - [`interpolate`]: piecewise-linear range mapping with clamping

mod timing;

pub use timing::{EasingFunction, Tween};

/// What to do with inputs outside the interpolation range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Hold the first/last output value
    #[default]
    Clamp,
    /// Continue the nearest segment's slope
    Extend,
}

/// Map `value` through a piecewise-linear function.
///
/// `input` must be sorted ascending and have the same length as `output`
/// (at least two points). Mismatched or short ranges return the first
/// output value, or `value` itself when `output` is empty.
#[must_use]
pub fn interpolate(value: f32, input: &[f32], output: &[f32], mode: Extrapolation) -> f32 {
    if input.len() < 2 || input.len() != output.len() {
        return output.first().copied().unwrap_or(value);
    }

    let last = input.len() - 1;
    if mode == Extrapolation::Clamp {
        if value <= input[0] {
            return output[0];
        }
        if value >= input[last] {
            return output[last];
        }
    }

    // Segment containing `value`, or the nearest edge segment when extending
    let segment = input
        .windows(2)
        .position(|w| value <= w[1])
        .unwrap_or(last - 1);

    let (x0, x1) = (input[segment], input[segment + 1]);
    let (y0, y1) = (output[segment], output[segment + 1]);
    if (x1 - x0).abs() < f32::EPSILON {
        return y1;
    }
    y0 + (value - x0) * (y1 - y0) / (x1 - x0)
}
