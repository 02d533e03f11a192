//! Skybound Game - Player locomotion, camera, input, and level logic
//!
//! Provides the third-person locomotion controller, the spring-follow
//! camera that observes it, input handling, and respawn/level state.

pub mod camera;
pub mod input;
pub mod level;
pub mod player;

pub use camera::{CameraConfig, CameraError, SpringFollowCamera};
pub use input::{ControlInput, InputAction, InputBindings, InputHandler, InputState};
pub use level::{LevelContext, RespawnPoint, RespawnState};
pub use player::{
    DamageOutcome, LocomotionEvents, MovementConfig, NullEvents, PlayerController, PlayerStatus,
    RespawnOutcome, Target, TargetTracker, TargetingConfig,
};
