//! Lock-on target tracking
//!
//! Keeps the known targets ordered by visibility and distance so the camera
//! always locks onto the best candidate. Visibility is a physics line-of-
//! sight query; anything behind geometry sorts after everything visible.

use glam::Vec3;
use rapier3d::prelude::QueryFilter;
use skybound_core::EntityId;
use skybound_physics::PhysicsWorld;

/// Targeting tuning
#[derive(Debug, Clone)]
pub struct TargetingConfig {
    /// Maximum distance at which a target can be locked on
    pub max_current_target_distance: f32,
    /// Maximum distance at which targets are tracked at all
    pub max_target_distance: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            max_current_target_distance: 20.0,
            max_target_distance: 40.0,
        }
    }
}

/// A candidate lock-on target
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub id: EntityId,
    pub position: Vec3,
}

/// Tracks lock-on candidates around the player
pub struct TargetTracker {
    pub config: TargetingConfig,
    targets: Vec<Target>,
    current: Option<EntityId>,
}

impl TargetTracker {
    /// Create an empty tracker with default config
    pub fn new() -> Self {
        Self::with_config(TargetingConfig::default())
    }

    /// Create an empty tracker with custom config
    pub fn with_config(config: TargetingConfig) -> Self {
        Self {
            config,
            targets: Vec::new(),
            current: None,
        }
    }

    /// Track a new target
    pub fn add_target(&mut self, id: EntityId, position: Vec3) {
        self.targets.push(Target { id, position });
    }

    /// Stop tracking a target (out of range, died, or hid)
    pub fn remove_target(&mut self, id: EntityId) {
        self.targets.retain(|target| target.id != id);
        if self.current == Some(id) {
            self.current = None;
        }
    }

    /// Update a tracked target's position
    pub fn set_target_position(&mut self, id: EntityId, position: Vec3) {
        if let Some(target) = self.targets.iter_mut().find(|target| target.id == id) {
            target.position = position;
        }
    }

    /// Re-rank targets from the player's point of view
    pub fn update(&mut self, from: Vec3, physics: &PhysicsWorld) {
        let visible = |target: &Target| {
            physics
                .linecast(from, target.position, QueryFilter::default())
                .is_none()
        };

        self.targets.sort_by(|a, b| {
            match (visible(a), visible(b)) {
                (false, true) => std::cmp::Ordering::Greater,
                (true, false) => std::cmp::Ordering::Less,
                _ => from
                    .distance(a.position)
                    .total_cmp(&from.distance(b.position)),
            }
        });

        self.current = self
            .targets
            .first()
            .filter(|target| from.distance(target.position) <= self.config.max_current_target_distance)
            .map(|target| target.id);
    }

    /// The best lock-on candidate from the last update, if any
    pub fn current_target(&self) -> Option<&Target> {
        let id = self.current?;
        self.targets.iter().find(|target| target.id == id)
    }

    /// All tracked targets in their last-ranked order
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}

impl Default for TargetTracker {
    fn default() -> Self {
        Self::new()
    }
}
