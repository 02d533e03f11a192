//! Movement configuration

use serde::{Deserialize, Serialize};

/// Locomotion tuning for the third-person controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Walking speed in meters per second
    pub walk_speed: f32,
    /// Speed after sustained walking
    pub trot_speed: f32,
    /// Speed while the run button is held
    pub run_speed: f32,
    /// Horizontal acceleration while airborne
    pub in_air_control_acceleration: f32,
    /// Jump height when tapping the jump button
    pub jump_height: f32,
    /// Extra height gained by holding the jump button
    pub extra_jump_height: f32,
    /// Gravity for the character
    pub gravity: f32,
    /// Reduced gravity during a controlled descent
    pub controlled_descent_gravity: f32,
    /// Speed smoothing rate (per second)
    pub speed_smoothing: f32,
    /// Turning rate in degrees per second
    pub rotate_speed: f32,
    /// Seconds of sustained walking before trotting
    pub trot_after_seconds: f32,
    /// Grace period for `grounded_with_timeout` after leaving the ground
    pub grounded_timeout: f32,
    /// Whether jumping is enabled at all
    pub can_jump: bool,
    /// Whether holding jump while falling slows the descent
    pub can_control_descent: bool,
    /// Whether wall jumping is enabled
    pub can_wall_jump: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            trot_speed: 4.0,
            run_speed: 6.0,
            in_air_control_acceleration: 3.0,
            jump_height: 0.5,
            extra_jump_height: 2.5,
            gravity: 20.0,
            controlled_descent_gravity: 2.0,
            speed_smoothing: 1.0,
            rotate_speed: 500.0,
            trot_after_seconds: 3.0,
            grounded_timeout: 0.25,
            can_jump: true,
            can_control_descent: false,
            can_wall_jump: false,
        }
    }
}

impl MovementConfig {
    /// The upward speed needed to peak at `target_jump_height` under this
    /// config's gravity
    pub fn jump_vertical_speed(&self, target_jump_height: f32) -> f32 {
        (2.0 * target_jump_height * self.gravity).sqrt()
    }
}
