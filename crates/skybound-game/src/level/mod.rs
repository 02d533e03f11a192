//! Level state
//!
//! Owns the respawn points and the single "active respawn" reference that
//! used to be global state: it lives here, scoped to the level, and is
//! updated with plain last-writer-wins semantics.

mod respawn;

pub use respawn::{RespawnPoint, RespawnState};

use glam::Vec3;
use skybound_core::EntityId;
use tracing::warn;

/// Per-level shared state
pub struct LevelContext {
    points: Vec<RespawnPoint>,
    current: Option<EntityId>,
}

impl LevelContext {
    /// Create an empty level context
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            current: None,
        }
    }

    /// Register a respawn point
    pub fn add_respawn_point(&mut self, position: Vec3) -> EntityId {
        let point = RespawnPoint::new(position);
        let id = point.id;
        self.points.push(point);
        id
    }

    /// Choose the level's starting respawn point
    pub fn set_initial_respawn(&mut self, id: EntityId) {
        self.current = Some(id);
        if let Some(point) = self.point_mut(id) {
            point.set_active();
        }
    }

    /// The player touched a respawn point: it becomes the active one
    pub fn trigger(&mut self, id: EntityId) {
        if self.current == Some(id) {
            return;
        }

        match self.current {
            Some(previous) => {
                if let Some(point) = self.point_mut(previous) {
                    point.set_inactive();
                }
            }
            None => warn!("no initial respawn point set for this level"),
        }

        self.current = Some(id);
        if let Some(point) = self.point_mut(id) {
            point.set_triggered();
        }
    }

    /// The active respawn point, if any
    pub fn current_respawn(&self) -> Option<&RespawnPoint> {
        let id = self.current?;
        self.points.iter().find(|point| point.id == id)
    }

    /// Position of the active respawn point, if any
    pub fn current_respawn_position(&self) -> Option<Vec3> {
        self.current_respawn().map(|point| point.position)
    }

    /// Play the respawn flash on the active point
    pub fn fire_current_respawn_effect(&mut self) {
        if let Some(id) = self.current {
            if let Some(point) = self.point_mut(id) {
                point.fire_effect();
            }
        }
    }

    /// Advance all timed respawn effects by one tick
    pub fn update(&mut self, dt: f32) {
        for point in &mut self.points {
            point.update(dt);
        }
    }

    /// All registered respawn points
    pub fn respawn_points(&self) -> &[RespawnPoint] {
        &self.points
    }

    fn point_mut(&mut self, id: EntityId) -> Option<&mut RespawnPoint> {
        self.points.iter_mut().find(|point| point.id == id)
    }
}

impl Default for LevelContext {
    fn default() -> Self {
        Self::new()
    }
}
