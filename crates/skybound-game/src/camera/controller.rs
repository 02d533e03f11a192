//! Spring-damped third-person follow camera
//!
//! The camera is a read-only observer of the locomotion controller: it
//! keeps a constant horizontal distance with per-axis critically-damped
//! springs, holds its height steady through small jump arcs, stays out of
//! geometry via a line-of-sight check, and pitches just enough to keep the
//! character's head inside a configurable screen band.

use glam::{Quat, Vec3};
use rapier3d::prelude::{ColliderHandle, QueryFilter};
use skybound_core::math;
use skybound_core::Transform;
use skybound_physics::{CharacterController, PhysicsWorld};
use thiserror::Error;

use crate::player::PlayerController;

use super::config::CameraConfig;

/// Yaw error below which lock-on snapping ends
const SNAP_EXIT_ANGLE: f32 = 3.0 * std::f32::consts::PI / 180.0;

/// Height rises smaller than this are ignored while jumping
const JUMP_HEIGHT_DEADBAND: f32 = 5.0;

/// Configuration problems caught when the camera is created
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera distance must be positive (got {0})")]
    InvalidDistance(f32),

    #[error("damping lags must be positive (smooth {0}, snap {1})")]
    InvalidLag(f32, f32),

    #[error("head clamp must lie in (0.5, 1.0] (got {0})")]
    InvalidHeadClamp(f32),

    #[error("field of view must lie in (0, 180) degrees (got {0})")]
    InvalidFov(f32),

    #[error("camera target has no collider; spawn the character first")]
    TargetNotSpawned,

    #[error("camera target has degenerate bounds (height {0})")]
    DegenerateBounds(f32),
}

/// Spring-damped follow camera
pub struct SpringFollowCamera {
    /// Configuration
    pub config: CameraConfig,

    transform: Transform,
    /// Per-axis spring velocities; x doubles as angular velocity while
    /// snapping
    velocity: Vec3,
    /// Hysteretic target for the camera height
    target_height: f32,
    /// Local offset from character origin to its bounds center
    center_offset: Vec3,
    /// Local offset from character origin to the top of its head
    head_offset: Vec3,
    /// Lock-on snap mode
    snapping: bool,
    /// The character's own collider, ignored by line-of-sight checks
    target_collider: ColliderHandle,
}

impl SpringFollowCamera {
    /// Create a camera following the given character
    ///
    /// The head/center offsets are captured from the character's standing
    /// bounds once, here. Invalid configuration fails immediately rather
    /// than misbehaving some ticks later.
    pub fn new(
        config: CameraConfig,
        character: &CharacterController,
        target: &Transform,
    ) -> Result<Self, CameraError> {
        if config.distance <= 0.0 {
            return Err(CameraError::InvalidDistance(config.distance));
        }
        if config.smooth_lag <= 0.0 || config.snap_lag <= 0.0 {
            return Err(CameraError::InvalidLag(config.smooth_lag, config.snap_lag));
        }
        let clamp = config.clamp_head_position_screen_space;
        if !(clamp > 0.5 && clamp <= 1.0) {
            return Err(CameraError::InvalidHeadClamp(clamp));
        }
        if !(config.fov_y_degrees > 0.0 && config.fov_y_degrees < 180.0) {
            return Err(CameraError::InvalidFov(config.fov_y_degrees));
        }

        let target_collider = character
            .collider_handle()
            .ok_or(CameraError::TargetNotSpawned)?;

        let bounds_height = character.config.height;
        if bounds_height <= 0.0 {
            return Err(CameraError::DegenerateBounds(bounds_height));
        }

        let center_offset = Vec3::new(0.0, bounds_height / 2.0, 0.0);
        let head_offset = Vec3::new(0.0, bounds_height, 0.0);

        // Start behind the character at the configured offsets
        let center = target.position + center_offset;
        let behind = -target.forward();
        let position = Vec3::new(
            center.x + behind.x * config.distance,
            center.y + config.height,
            center.z + behind.z * config.distance,
        );
        let rotation = Self::frame_rotation(position, center, &config).unwrap_or(Quat::IDENTITY);

        Ok(Self {
            config,
            transform: Transform::from_position_rotation(position, rotation),
            velocity: Vec3::ZERO,
            target_height: 100000.0,
            center_offset,
            head_offset,
            snapping: false,
            target_collider,
        })
    }

    /// Advance the camera by one tick
    ///
    /// Runs after the controller's step so it observes the post-resolution
    /// transform. `lock_on` supplies the current lock-on target's position
    /// while `snap_held` is true.
    pub fn step(
        &mut self,
        dt: f32,
        target: &Transform,
        controller: &PlayerController,
        physics: &PhysicsWorld,
        snap_held: bool,
        lock_on: Option<Vec3>,
    ) {
        let target_center = target.position + self.center_offset;
        let target_head = target.position + self.head_offset;

        self.update_target_height(target_center.y, controller.is_jumping());

        if snap_held && lock_on.is_some() {
            self.snapping = true;
        }

        if self.snapping {
            self.apply_snapping(dt, physics, target, target_center);
        } else {
            let damp_target = Vec3::new(target_center.x, self.target_height, target_center.z);
            self.apply_position_damping(dt, physics, damp_target);
        }

        // While locked on, frame the locked target instead of the character
        let look_center = match (self.snapping, lock_on) {
            (true, Some(position)) => position,
            _ => target_center,
        };
        self.update_rotation(dt, look_center, target_head);
    }

    /// While jumping the camera only rises for genuinely large height
    /// changes; descents always track
    fn update_target_height(&mut self, center_y: f32, is_jumping: bool) {
        let new_target_height = center_y + self.config.height;
        if is_jumping {
            if new_target_height < self.target_height
                || new_target_height - self.target_height > JUMP_HEIGHT_DEADBAND
            {
                self.target_height = new_target_height;
            }
        } else {
            self.target_height = new_target_height;
        }
    }

    /// Constant-distance springs on the horizontal plane, a separate spring
    /// on the vertical axis
    fn apply_position_damping(&mut self, dt: f32, physics: &PhysicsWorld, damp_target: Vec3) {
        let position = self.transform.position;
        let mut offset = position - damp_target;
        offset.y = 0.0;
        let flat_direction = offset.try_normalize().unwrap_or(Vec3::Z);
        let spring_target = flat_direction * self.config.distance + damp_target;

        let new_position = Vec3::new(
            math::smooth_damp(
                position.x,
                spring_target.x,
                &mut self.velocity.x,
                self.config.smooth_lag,
                self.config.max_speed,
                dt,
            ),
            math::smooth_damp(
                position.y,
                damp_target.y,
                &mut self.velocity.y,
                self.config.smooth_lag,
                self.config.max_speed,
                dt,
            ),
            math::smooth_damp(
                position.z,
                spring_target.z,
                &mut self.velocity.z,
                self.config.smooth_lag,
                self.config.max_speed,
                dt,
            ),
        );

        self.transform.position = self.adjust_line_of_sight(physics, new_position, damp_target);
    }

    /// Swing behind the character with the faster snap constants, exiting
    /// once the yaw lines up
    fn apply_snapping(
        &mut self,
        dt: f32,
        physics: &PhysicsWorld,
        target: &Transform,
        target_center: Vec3,
    ) {
        let position = self.transform.position;
        let mut offset = position - target_center;
        offset.y = 0.0;
        let current_distance = offset.length();

        let facing = target.forward();
        let target_angle = (-facing.x).atan2(-facing.z);
        let current_angle = if offset.length_squared() > 1e-8 {
            offset.x.atan2(offset.z)
        } else {
            target_angle
        };

        let angle = math::smooth_damp_angle(
            current_angle,
            target_angle,
            &mut self.velocity.x,
            self.config.snap_lag,
            f32::INFINITY,
            dt,
        );
        let distance = math::smooth_damp(
            current_distance,
            self.config.distance,
            &mut self.velocity.z,
            self.config.snap_lag,
            f32::INFINITY,
            dt,
        );

        let mut new_position = target_center + Quat::from_rotation_y(angle) * (Vec3::Z * distance);
        new_position.y = math::smooth_damp(
            position.y,
            self.target_height,
            &mut self.velocity.y,
            self.config.smooth_lag,
            self.config.max_speed,
            dt,
        );

        self.transform.position = self.adjust_line_of_sight(physics, new_position, target_center);

        // Close enough behind the character; hand back to the normal springs
        if math::delta_angle(angle, target_angle).abs() < SNAP_EXIT_ANGLE {
            self.snapping = false;
            self.velocity = Vec3::ZERO;
        }
    }

    /// Snap to the nearest obstruction between target and camera, killing
    /// the spring velocity so the next tick doesn't overshoot back out
    fn adjust_line_of_sight(
        &mut self,
        physics: &PhysicsWorld,
        new_position: Vec3,
        target: Vec3,
    ) -> Vec3 {
        let filter = QueryFilter::default().exclude_collider(self.target_collider);
        if let Some(hit) = physics.linecast(target, new_position, filter) {
            self.velocity = Vec3::ZERO;
            return hit;
        }
        new_position
    }

    /// Yaw toward the target, keep the fixed pitch offset, and pitch extra
    /// only when the head would leave the clamp band
    fn update_rotation(&mut self, dt: f32, center_pos: Vec3, head_pos: Vec3) {
        if let Some(frame) = Self::frame_rotation(self.transform.position, center_pos, &self.config)
        {
            let t = (dt * self.config.rotation_damping).min(1.0);
            self.transform.rotation = self.transform.rotation.slerp(frame, t);
        }

        // Project the screen center and the clamp line into world rays at
        // the camera distance
        let rotation = self.transform.rotation;
        let forward = rotation * -Vec3::Z;
        let up = rotation * Vec3::Y;
        let tan_half_fov = (self.config.fov_y_degrees.to_radians() * 0.5).tan();
        let clamp_ndc = self.config.clamp_head_position_screen_space * 2.0 - 1.0;
        let top_direction = (forward + up * (clamp_ndc * tan_half_fov)).normalize();

        let center_ray_pos = self.transform.position + forward * self.config.distance;
        let top_ray_pos = self.transform.position + top_direction * self.config.distance;
        let center_to_top_angle = forward.angle_between(top_direction);

        let span_height = top_ray_pos.y - center_ray_pos.y;
        if span_height.abs() <= f32::EPSILON {
            return;
        }

        let angle_per_height = center_to_top_angle / span_height;
        let needed_angle = angle_per_height * (head_pos.y - center_ray_pos.y);
        if needed_angle > center_to_top_angle {
            let extra_look_angle = needed_angle - center_to_top_angle;
            self.transform.rotation = self.transform.rotation * Quat::from_rotation_x(extra_look_angle);
        }
    }

    /// The yaw-toward-target rotation composed with the fixed pitch offset;
    /// `None` when the camera sits exactly above the target
    fn frame_rotation(position: Vec3, center: Vec3, config: &CameraConfig) -> Option<Quat> {
        let offset_to_center = center - position;
        let flat = Vec3::new(offset_to_center.x, 0.0, offset_to_center.z);
        if flat.length_squared() < 1e-8 {
            return None;
        }

        let y_rotation = math::look_rotation_y(flat);
        let pitch = Quat::from_rotation_x(-(config.height / config.distance).atan());
        Some(y_rotation * pitch)
    }

    /// Current camera pose
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Current camera position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Current camera rotation
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Whether lock-on snapping is active
    pub fn is_snapping(&self) -> bool {
        self.snapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::NullEvents;
    use crate::ControlInput;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (PhysicsWorld, PlayerController) {
        let mut physics = PhysicsWorld::new();
        physics.create_ground(0.0);

        let mut controller = PlayerController::new();
        controller.spawn(&mut physics, Vec3::ZERO);

        let mut events = NullEvents;
        for _ in 0..5 {
            controller.step(&mut physics, &ControlInput::default(), -Vec3::Z, DT, &mut events);
        }
        assert!(controller.is_grounded());
        (physics, controller)
    }

    fn camera_for(controller: &PlayerController) -> SpringFollowCamera {
        SpringFollowCamera::new(CameraConfig::default(), &controller.character, &controller.transform())
            .expect("valid camera config")
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (_physics, controller) = setup();
        let target = controller.transform();

        let bad_clamp = CameraConfig {
            clamp_head_position_screen_space: 0.3,
            ..CameraConfig::default()
        };
        assert!(matches!(
            SpringFollowCamera::new(bad_clamp, &controller.character, &target),
            Err(CameraError::InvalidHeadClamp(_))
        ));

        let bad_distance = CameraConfig {
            distance: 0.0,
            ..CameraConfig::default()
        };
        assert!(matches!(
            SpringFollowCamera::new(bad_distance, &controller.character, &target),
            Err(CameraError::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_unspawned_target_is_rejected() {
        let character = CharacterController::new();
        let result =
            SpringFollowCamera::new(CameraConfig::default(), &character, &Transform::default());
        assert!(matches!(result, Err(CameraError::TargetNotSpawned)));
    }

    #[test]
    fn test_target_height_hysteresis() {
        let (_physics, controller) = setup();
        let mut camera = camera_for(&controller);

        // Walking always tracks
        camera.update_target_height(1.0, false);
        assert_eq!(camera.target_height, 1.0 + camera.config.height);

        // A small rise while jumping is held back
        camera.update_target_height(1.1, true);
        assert_eq!(camera.target_height, 1.0 + camera.config.height);

        // A large rise tracks immediately
        camera.update_target_height(7.0, true);
        assert_eq!(camera.target_height, 7.0 + camera.config.height);

        // Any descent tracks immediately
        camera.update_target_height(0.5, true);
        assert_eq!(camera.target_height, 0.5 + camera.config.height);
    }

    #[test]
    fn test_camera_converges_behind_stationary_target() {
        let (mut physics, mut controller) = setup();
        let mut camera = camera_for(&controller);

        let mut events = NullEvents;
        for _ in 0..600 {
            controller.step(&mut physics, &ControlInput::default(), camera.transform().forward(), DT, &mut events);
            camera.step(DT, &controller.transform(), &controller, &physics, false, None);
        }

        let center = controller.position() + Vec3::new(0.0, 1.0, 0.0);
        let mut offset = camera.position() - center;
        offset.y = 0.0;
        assert!((offset.length() - camera.config.distance).abs() < 0.2);
        assert!((camera.position().y - (center.y + camera.config.height)).abs() < 0.2);

        // Looking at the character
        let to_center = (center - camera.position()).normalize();
        assert!(camera.transform().forward().angle_between(to_center) < 0.1);
    }

    #[test]
    fn test_occlusion_snaps_camera_to_hit_point() {
        let (mut physics, controller) = setup();
        let mut camera = camera_for(&controller);

        // Wall between the character and the camera's resting spot
        physics.create_static_box(Vec3::new(5.0, 5.0, 0.1), Vec3::new(0.0, 5.0, 2.0));

        camera.step(DT, &controller.transform(), &controller, &physics, false, None);

        // The camera lands exactly on the obstruction, never behind it
        assert!(camera.position().z < 2.0);
        assert!((camera.position().z - 1.9).abs() < 0.05);
        assert!(camera.position().x.abs() < 0.05);
        assert_eq!(camera.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_snapping_swings_behind_target_and_exits() {
        let (physics, controller) = setup();
        let mut camera = camera_for(&controller);

        // Character suddenly faces +X; the camera starts directly behind -Z
        let yaw = std::f32::consts::FRAC_PI_2;
        let turned = Transform::from_position_rotation(
            controller.position(),
            Quat::from_rotation_y(-yaw),
        );
        let lock_on = Some(Vec3::new(10.0, 1.0, 0.0));

        camera.step(DT, &turned, &controller, &physics, true, lock_on);
        assert!(camera.is_snapping());

        for _ in 0..600 {
            camera.step(DT, &turned, &controller, &physics, false, lock_on);
            if !camera.is_snapping() {
                break;
            }
        }
        assert!(!camera.is_snapping());
        assert_eq!(camera.velocity, Vec3::ZERO);

        // Settled behind the turned character: opposite its facing
        let mut offset = camera.position() - controller.position();
        offset.y = 0.0;
        let behind = -turned.forward();
        assert!(offset.normalize().angle_between(behind) < 0.1);
    }
}
