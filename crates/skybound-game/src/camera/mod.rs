//! Camera system module
//!
//! Spring-damped third-person follow camera with line-of-sight handling
//! and lock-on snapping.

mod config;
mod controller;

pub use config::CameraConfig;
pub use controller::{CameraError, SpringFollowCamera};
