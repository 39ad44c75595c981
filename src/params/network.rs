//! Particle network parameters (point motion, pulsing, connections, pointer overlay).

use std::ops::Range;

/// Network mode parameters
#[derive(Debug, Clone)]
pub struct NetworkParams {
    /// Number of points in the network
    pub point_count: usize,

    /// Connection distance at zero level (pixels)
    pub base_connect_distance: f32,

    /// Extra connection distance per unit level (pixels)
    /// Formula: threshold = base_connect_distance + level * connect_level_scale
    pub connect_level_scale: f32,

    /// Velocity multiplier per unit level
    /// Formula: boosted = velocity * (1 + level * speed_boost)
    pub speed_boost: f32,

    /// Blend from base toward boosted velocity for each step
    pub velocity_blend: f32,

    /// Pulse size gain per unit level
    /// Formula: target = size * (1 + level * pulse_gain)
    pub pulse_gain: f32,

    /// Smoothing factor for pulse size
    pub pulse_blend: f32,

    /// Line opacity for touching points (0-255)
    pub line_opacity_near: f32,

    /// Line opacity at the connection threshold (0-255)
    pub line_opacity_floor: f32,

    /// Smoothing factor for line opacity
    pub line_blend: f32,

    /// Line stroke width (pixels)
    pub line_width: f32,

    /// Initial speed range (pixels per frame)
    pub speed_range: Range<f32>,

    /// Base size range (pixel diameter)
    pub size_range: Range<f32>,

    /// Probability that a point is drawn filled
    pub filled_probability: f64,

    /// Point and line gray level (0-255)
    pub point_gray: u8,

    /// Point opacity (0-255)
    pub point_opacity: u8,

    /// Pointer disc size at zero level (pixel diameter)
    pub pointer_base_size: f32,

    /// Pointer disc size gain per unit level
    pub pointer_level_gain: f32,

    /// Smoothing factor for pointer disc size and pointer lines
    pub pointer_blend: f32,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            point_count: 35,
            base_connect_distance: 70.0,
            connect_level_scale: 200.0,
            speed_boost: 50.0,
            velocity_blend: 0.05,
            pulse_gain: 2.0,
            pulse_blend: 0.1,
            line_opacity_near: 220.0,
            line_opacity_floor: 8.0,
            line_blend: 0.2,
            line_width: 1.5,
            speed_range: 0.4..1.2,
            size_range: 5.0..16.0,
            filled_probability: 0.45,
            point_gray: 220,
            point_opacity: 180,
            pointer_base_size: 16.0,
            pointer_level_gain: 40.0,
            pointer_blend: 0.2,
        }
    }
}

impl NetworkParams {
    /// Connection threshold for the given level
    pub fn connect_distance(&self, level: f32) -> f32 {
        self.base_connect_distance + level * self.connect_level_scale
    }
}
