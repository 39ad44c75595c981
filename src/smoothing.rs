//! Exponential smoothing helpers.
//!
//! Every animated value in the visualizer moves toward a freshly computed
//! target by a fixed fraction per frame. The remaining error therefore shrinks
//! by `(1 - factor)` each frame and never jumps.

/// Blend `current` toward `target` by `factor`.
///
/// `factor` is expected in `(0, 1]`; 0 leaves `current` unchanged and 1 lands
/// on `target`.
#[inline]
pub fn lerp(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Linearly re-map `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Not clamped. A degenerate input range maps everything to `out_min`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// A smoothed scalar paired with the target it is chasing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Smoothed {
    pub value: f32,
    pub target: f32,
}

impl Smoothed {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
        }
    }

    /// Set a new target and advance one frame toward it
    pub fn step_toward(&mut self, target: f32, factor: f32) -> f32 {
        self.target = target;
        self.value = lerp(self.value, target, factor);
        self.value
    }
}
