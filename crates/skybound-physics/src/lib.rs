//! Skybound Physics - Collision resolution using rapier3d
//!
//! Provides the static collision world, swept character movement, and the
//! ray/line queries the camera and targeting systems rely on.

mod character_controller;

pub use character_controller::{
    CharacterController, CharacterControllerConfig, CollisionFlags, MoveResult,
};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;

/// The physics world containing all collision state
pub struct PhysicsWorld {
    /// Rigid body storage (kinematic characters only; there are no dynamics)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Query pipeline for raycasts and shape casts
    pub query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new empty physics world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        self.update_queries();
        handle
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Rebuild the query acceleration structure after colliders move
    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, f32)> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
    }

    /// Cast a line between two points and return the nearest hit point, if
    /// anything occludes the segment
    pub fn linecast(&self, from: Vec3, to: Vec3, filter: QueryFilter) -> Option<Vec3> {
        let delta = to - from;
        let distance = delta.length();
        if distance <= 1e-6 {
            return None;
        }

        let direction = delta / distance;
        self.raycast(from, direction, distance, filter)
            .map(|(_, toi)| from + direction * toi)
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
