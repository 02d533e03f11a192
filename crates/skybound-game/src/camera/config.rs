//! Camera configuration

use serde::{Deserialize, Serialize};

/// Spring-follow camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Horizontal distance kept from the target
    pub distance: f32,
    /// Height kept above the target's center
    pub height: f32,
    /// Spring time constant for position damping
    pub smooth_lag: f32,
    /// Maximum speed of the position springs
    pub max_speed: f32,
    /// Faster time constant used while snapping onto a lock-on target
    pub snap_lag: f32,
    /// Screen-space fraction the character's head may reach before the
    /// camera pitches to keep it in frame (0.5 = center, 1.0 = top edge)
    pub clamp_head_position_screen_space: f32,
    /// Rotation interpolation rate (per second)
    pub rotation_damping: f32,
    /// Vertical field of view in degrees, used for the head-clamp rays
    pub fov_y_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 4.0,
            height: 4.0,
            smooth_lag: 0.2,
            max_speed: 10.0,
            snap_lag: 0.3,
            clamp_head_position_screen_space: 0.75,
            rotation_damping: 2.0,
            fov_y_degrees: 60.0,
        }
    }
}
