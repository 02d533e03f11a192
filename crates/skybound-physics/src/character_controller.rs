//! Kinematic character movement built on rapier3d's character controller
//!
//! The character is a capsule swept through the static world. Each move
//! reports which sides of the capsule made contact, plus the surface normal
//! of the last obstacle touched, which the locomotion layer consumes for
//! grounding and wall-jump decisions.

use glam::Vec3;
use rapier3d::control::{
    CharacterAutostep, CharacterCollision, CharacterLength, KinematicCharacterController,
};
use rapier3d::prelude::*;

/// Which sides of the character made contact during the last move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionFlags {
    /// Contact under the capsule (grounded)
    pub below: bool,
    /// Contact above the capsule (ceiling)
    pub above: bool,
    /// Contact on the capsule's sides (walls)
    pub sides: bool,
}

impl CollisionFlags {
    /// No contact at all
    pub const NONE: CollisionFlags = CollisionFlags {
        below: false,
        above: false,
        sides: false,
    };

    /// True when there was no contact this move
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// True when the only contact was on the sides
    pub fn sides_only(&self) -> bool {
        self.sides && !self.below && !self.above
    }
}

/// Result of one swept character move
#[derive(Debug, Clone, Copy)]
pub struct MoveResult {
    /// The translation actually applied after collision resolution
    pub applied: Vec3,
    /// Contact classification for this move
    pub flags: CollisionFlags,
    /// Surface normal of the last obstacle touched while not moving upward;
    /// zero when nothing qualified
    pub contact_normal: Vec3,
}

/// Character controller configuration
#[derive(Debug, Clone)]
pub struct CharacterControllerConfig {
    /// Standing capsule height (default: 2.0m)
    pub height: f32,
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Maximum slope angle in degrees (default: 45)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Whether to snap to ground when walking down slopes
    pub snap_to_ground: bool,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for CharacterControllerConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            radius: 0.4,
            max_slope_angle: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
            snap_to_ground: true,
            ground_snap_distance: 0.2,
        }
    }
}

/// Contacts steeper than this (|normal.y|) count as floor/ceiling
const SIDE_NORMAL_LIMIT: f32 = 0.7;

/// Character controller for swept movement with collision flags
pub struct CharacterController {
    /// Configuration (height here is the standing height)
    pub config: CharacterControllerConfig,
    /// Current position (feet)
    position: Vec3,
    /// Current capsule height; differs from the config while crouched/slammed
    height: f32,
    /// The collider handle for this character
    collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterController {
    /// Create a new character controller with default config
    pub fn new() -> Self {
        Self::with_config(CharacterControllerConfig::default())
    }

    /// Create a new character controller with custom config
    pub fn with_config(config: CharacterControllerConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: true,
        });
        controller.snap_to_ground = if config.snap_to_ground {
            Some(CharacterLength::Absolute(config.ground_snap_distance))
        } else {
            None
        };
        controller.offset = CharacterLength::Absolute(config.skin_width);

        let height = config.height;
        Self {
            config,
            position: Vec3::ZERO,
            height,
            collider_handle: None,
            controller,
        }
    }

    /// Spawn the character in the physics world
    pub fn spawn(&mut self, physics: &mut crate::PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;
        self.height = self.config.height;

        let collider = ColliderBuilder::new(self.capsule_shape())
            .translation(vector![
                position.x,
                position.y + self.height / 2.0,
                position.z
            ])
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        handle
    }

    fn capsule_shape(&self) -> SharedShape {
        let half_height = ((self.height - 2.0 * self.config.radius) / 2.0).max(0.01);
        SharedShape::capsule_y(half_height, self.config.radius)
    }

    /// Sweep the character by the desired translation, resolving collisions
    ///
    /// Must be called exactly once per tick with the full composed
    /// displacement for the contact flags to stay meaningful.
    pub fn move_by(
        &mut self,
        physics: &mut crate::PhysicsWorld,
        desired_translation: Vec3,
        dt: f32,
    ) -> MoveResult {
        let Some(collider_handle) = self.collider_handle else {
            return MoveResult {
                applied: Vec3::ZERO,
                flags: CollisionFlags::NONE,
                contact_normal: Vec3::ZERO,
            };
        };

        let shape = self.capsule_shape();
        let current_pos = Isometry::translation(
            self.position.x,
            self.position.y + self.height / 2.0,
            self.position.z,
        );

        let move_dir = desired_translation.normalize_or_zero();
        let mut flags = CollisionFlags::NONE;
        let mut contact_normal = Vec3::ZERO;

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            &physics.query_pipeline,
            &*shape,
            &current_pos,
            vector![
                desired_translation.x,
                desired_translation.y,
                desired_translation.z
            ],
            QueryFilter::default().exclude_collider(collider_handle),
            |collision: CharacterCollision| {
                let n = collision.hit.normal1;
                let normal = Vec3::new(n.x, n.y, n.z);

                if normal.y > SIDE_NORMAL_LIMIT {
                    flags.below = true;
                } else if normal.y < -SIDE_NORMAL_LIMIT {
                    flags.above = true;
                } else {
                    flags.sides = true;
                }

                // Contacts while moving upward don't count as wall touches
                if move_dir.y <= 0.01 {
                    contact_normal = normal;
                }
            },
        );

        flags.below |= movement.grounded;

        let applied = Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );
        self.position += applied;

        if let Some(collider) = physics.collider_set.get_mut(collider_handle) {
            collider.set_translation(vector![
                self.position.x,
                self.position.y + self.height / 2.0,
                self.position.z
            ]);
        }
        physics.update_queries();

        MoveResult {
            applied,
            flags,
            contact_normal,
        }
    }

    /// Set the character's position directly (teleport)
    pub fn set_position(&mut self, physics: &mut crate::PhysicsWorld, position: Vec3) {
        self.position = position;

        if let Some(handle) = self.collider_handle {
            if let Some(collider) = physics.collider_set.get_mut(handle) {
                collider.set_translation(vector![
                    position.x,
                    position.y + self.height / 2.0,
                    position.z
                ]);
            }
            physics.update_queries();
        }
    }

    /// Resize the capsule in place (crouch/slam footprint changes)
    pub fn set_height(&mut self, physics: &mut crate::PhysicsWorld, height: f32) {
        self.height = height.max(2.0 * self.config.radius + 0.02);

        if let Some(handle) = self.collider_handle {
            if let Some(collider) = physics.collider_set.get_mut(handle) {
                collider.set_shape(self.capsule_shape());
                collider.set_translation(vector![
                    self.position.x,
                    self.position.y + self.height / 2.0,
                    self.position.z
                ]);
            }
            physics.update_queries();
        }
    }

    /// Current position of the character's feet
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current capsule height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Get the center position (middle of capsule)
    pub fn center_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.height / 2.0,
            self.position.z,
        )
    }

    /// The collider backing this character, once spawned
    pub fn collider_handle(&self) -> Option<ColliderHandle> {
        self.collider_handle
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new()
    }
}
