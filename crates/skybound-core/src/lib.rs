//! Skybound Core - Core types and utilities for the Skybound simulation
//!
//! This crate provides the foundational pieces used throughout the game:
//! - Mathematical primitives (re-exported from glam)
//! - Smoothing/damping helpers for per-tick numerical integration
//! - Transform component for entity positioning
//! - Time system with fixed-timestep accumulation

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, TimeConfig};
pub use types::{EntityId, Transform};
