//! Player module
//!
//! Third-person locomotion state machine plus the status and targeting
//! systems that hang off it.

mod controller;
mod events;
mod movement;
mod status;
mod targeting;

pub use controller::PlayerController;
pub use events::{LocomotionEvents, NullEvents};
pub use movement::MovementConfig;
pub use status::{DamageOutcome, PlayerStatus, RespawnOutcome};
pub use targeting::{Target, TargetTracker, TargetingConfig};
