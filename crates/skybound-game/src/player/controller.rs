//! Third-person locomotion state machine
//!
//! The controller owns the character's heading, speed, and jump/gravity
//! state. Each tick it composes a displacement request, hands it to the
//! physics character controller, and updates its state from the resulting
//! collision flags - those flags are the sole source of grounded truth.

use glam::{Quat, Vec3};
use skybound_core::math;
use skybound_core::Transform;
use skybound_physics::{CharacterController, CollisionFlags, PhysicsWorld};

use crate::input::ControlInput;

use super::events::LocomotionEvents;
use super::movement::MovementConfig;

/// Minimum delay between two jumps
pub const JUMP_REPEAT_TIME: f32 = 0.5;
/// Half-width of the coincidence window between wall touch and jump press
pub const WALL_JUMP_TIMEOUT: f32 = 0.15;
/// How long a jump press stays buffered before landing
pub const JUMP_TIMEOUT: f32 = 0.15;

/// Capsule height while slammed flat
const SLAM_HEIGHT: f32 = 0.5;

/// Third-person locomotion controller
pub struct PlayerController {
    /// Movement configuration
    pub config: MovementConfig,
    /// Physics character controller
    pub character: CharacterController,

    /// Accumulated simulation time; every window below is measured in it
    time: f32,
    /// Facing rotation (yaw only)
    rotation: Quat,

    /// Normalized horizontal heading; kept valid while standing still
    move_direction: Vec3,
    /// Smoothed horizontal speed
    move_speed: f32,
    /// Signed vertical speed, positive when ascending
    vertical_speed: f32,
    /// Horizontal drift accumulated while airborne
    in_air_velocity: Vec3,

    /// Last tick's collision resolver output
    collision_flags: CollisionFlags,
    /// Contact normal from the last move, consumed by wall jumping
    wall_contact_normal: Vec3,

    jumping: bool,
    jump_reached_apex: bool,
    moving_back: bool,
    is_moving: bool,
    slammed: bool,
    controllable: bool,

    /// Where to put the character back after a slam ends, if anywhere
    slam_recovery: Option<Vec3>,
    /// Jump button level from the last processed tick
    last_jump_held: bool,

    lock_camera_timer: f32,
    walk_time_start: f32,
    last_jump_button_time: f32,
    last_jump_time: f32,
    last_jump_start_height: f32,
    touch_wall_jump_time: f32,
    last_grounded_time: f32,
}

impl PlayerController {
    /// Create a new controller with default config
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default())
    }

    /// Create a new controller with custom config
    pub fn with_config(config: MovementConfig) -> Self {
        Self {
            config,
            character: CharacterController::new(),
            time: 0.0,
            rotation: Quat::IDENTITY,
            move_direction: -Vec3::Z,
            move_speed: 0.0,
            vertical_speed: 0.0,
            in_air_velocity: Vec3::ZERO,
            collision_flags: CollisionFlags::NONE,
            wall_contact_normal: Vec3::ZERO,
            jumping: false,
            jump_reached_apex: false,
            moving_back: false,
            is_moving: false,
            slammed: false,
            controllable: true,
            slam_recovery: None,
            last_jump_held: false,
            lock_camera_timer: 0.0,
            walk_time_start: 0.0,
            last_jump_button_time: -10.0,
            last_jump_time: -1.0,
            last_jump_start_height: 0.0,
            touch_wall_jump_time: -1.0,
            last_grounded_time: 0.0,
        }
    }

    /// Spawn the character in the world at a position
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.character.spawn(physics, position);
        self.move_direction = self.rotation * -Vec3::Z;
        self.move_speed = 0.0;
        self.vertical_speed = 0.0;
        self.in_air_velocity = Vec3::ZERO;
        self.collision_flags = CollisionFlags::NONE;
    }

    /// Advance the controller by one tick
    ///
    /// `camera_forward` is the viewing camera's forward vector; only its
    /// horizontal components matter.
    pub fn step(
        &mut self,
        physics: &mut PhysicsWorld,
        input: &ControlInput,
        camera_forward: Vec3,
        dt: f32,
        events: &mut dyn LocomotionEvents,
    ) {
        self.time += dt;

        // An uncontrollable character processes no input at all
        let input = if self.controllable {
            *input
        } else {
            ControlInput::default()
        };
        self.last_jump_held = input.jump_held;

        if input.jump_pressed {
            self.last_jump_button_time = self.time;
        }

        self.update_smoothed_direction(&input, camera_forward, dt);
        self.apply_gravity(&input, dt, events);

        if self.config.can_wall_jump {
            self.apply_wall_jump(events);
        }
        self.apply_jumping(events);

        let movement = (self.move_direction * self.move_speed
            + Vec3::new(0.0, self.vertical_speed, 0.0)
            + self.in_air_velocity)
            * dt;

        let result = self.character.move_by(physics, movement, dt);
        self.collision_flags = result.flags;
        self.wall_contact_normal = result.contact_normal;

        if self.is_grounded() {
            if self.slammed {
                // Knockdown recovery: stand the capsule back up
                self.slammed = false;
                self.character.set_height(physics, self.character.config.height);
                if let Some(position) = self.slam_recovery.take() {
                    self.character.set_position(physics, position);
                }
            }

            self.rotation = math::look_rotation_y(self.move_direction);
        } else if !self.slammed {
            let xz_move = Vec3::new(result.applied.x, 0.0, result.applied.z);
            if xz_move.length_squared() > 0.001 {
                self.rotation = math::look_rotation_y(xz_move);
            }
        }

        if self.is_grounded() {
            self.last_grounded_time = self.time;
            self.in_air_velocity = Vec3::ZERO;
            if self.jumping {
                self.jumping = false;
                events.did_land();
            }
        }
    }

    fn update_smoothed_direction(&mut self, input: &ControlInput, camera_forward: Vec3, dt: f32) {
        let grounded = self.is_grounded();

        // Camera-relative basis on the horizontal plane
        let forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z)
            .try_normalize()
            .unwrap_or(-Vec3::Z);
        let right = Vec3::new(-forward.z, 0.0, forward.x);

        let h = input.move_axes.x;
        let v = input.move_axes.y;

        self.moving_back = v < -0.2;

        let was_moving = self.is_moving;
        self.is_moving = h.abs() > 0.1 || v.abs() > 0.1;

        let target_direction = right * h + forward * v;

        if grounded {
            // The follow camera holds still for a moment around move/stop
            // transitions; this timer feeds that
            self.lock_camera_timer += dt;
            if self.is_moving != was_moving {
                self.lock_camera_timer = 0.0;
            }

            // Speed and direction are stored separately so an idle character
            // keeps a valid heading
            if target_direction != Vec3::ZERO {
                if self.move_speed < self.config.walk_speed * 0.9 {
                    // Near standstill, snap instead of turning slowly
                    if let Some(direction) = target_direction.try_normalize() {
                        self.move_direction = direction;
                    }
                } else {
                    let rotated = math::rotate_towards(
                        self.move_direction,
                        target_direction,
                        self.config.rotate_speed.to_radians() * dt,
                    );
                    self.move_direction = rotated.try_normalize().unwrap_or(self.move_direction);
                }
            }

            // Analog input scales the target speed, but diagonals never
            // exceed straight-line speed
            let mut target_speed = target_direction.length().min(1.0);
            if input.run_held {
                target_speed *= self.config.run_speed;
            } else if self.time - self.config.trot_after_seconds > self.walk_time_start {
                target_speed *= self.config.trot_speed;
            } else {
                target_speed *= self.config.walk_speed;
            }

            let smooth = (self.config.speed_smoothing * dt).min(1.0);
            self.move_speed += (target_speed - self.move_speed) * smooth;

            // Trot requires sustained walking, not a momentary speed spike
            if self.move_speed < self.config.walk_speed * 0.3 {
                self.walk_time_start = self.time;
            }
        } else {
            if self.jumping {
                self.lock_camera_timer = 0.0;
            }
            if self.is_moving {
                self.in_air_velocity += target_direction.normalize_or_zero()
                    * dt
                    * self.config.in_air_control_acceleration;
            }
        }
    }

    fn apply_gravity(&mut self, input: &ControlInput, dt: f32, events: &mut dyn LocomotionEvents) {
        // Frozen characters keep their vertical state untouched
        if !self.controllable {
            return;
        }

        let controlled_descent = self.config.can_control_descent
            && self.vertical_speed < 0.0
            && input.jump_held
            && self.jumping;

        if self.jumping && !self.jump_reached_apex && self.vertical_speed <= 0.0 {
            self.jump_reached_apex = true;
            events.did_reach_apex();
        }

        // Holding the button keeps gravity off until the extra height is
        // spent - this is how variable jump height works
        let extra_power_jump = self.is_jumping()
            && self.vertical_speed > 0.0
            && input.jump_held
            && self.character.position().y < self.last_jump_start_height + self.config.extra_jump_height;

        if controlled_descent {
            self.vertical_speed -= self.config.controlled_descent_gravity * dt;
        } else if extra_power_jump {
            // No gravity this tick
        } else if self.is_grounded() {
            self.vertical_speed = 0.0;
        } else {
            self.vertical_speed -= self.config.gravity * dt;
        }
    }

    fn apply_wall_jump(&mut self, events: &mut dyn LocomotionEvents) {
        // Wall jumps only redirect an existing jump
        if !self.jumping {
            return;
        }

        // Remember the first wall touch of this jump
        if self.collision_flags.sides_only() {
            self.touch_wall_jump_time = self.time;
        }

        // The press may come shortly before or shortly after the touch
        let may_jump = self.last_jump_button_time > self.touch_wall_jump_time - WALL_JUMP_TIMEOUT
            && self.last_jump_button_time < self.touch_wall_jump_time + WALL_JUMP_TIMEOUT;
        if !may_jump {
            return;
        }

        if self.last_jump_time + JUMP_REPEAT_TIME > self.time {
            return;
        }

        if self.wall_contact_normal.y.abs() < 0.2 {
            let flat = Vec3::new(self.wall_contact_normal.x, 0.0, self.wall_contact_normal.z);
            if let Some(direction) = flat.try_normalize() {
                self.move_direction = direction;
            }
            // A wall jump launches at trot speed or better
            self.move_speed = (self.move_speed * 1.5).clamp(self.config.trot_speed, self.config.run_speed);
        } else {
            // Near-flat contact gives no horizontal boost
            self.move_speed = 0.0;
        }

        self.vertical_speed = self.config.jump_vertical_speed(self.config.jump_height);
        self.start_jump();
        events.did_wall_jump();
    }

    fn apply_jumping(&mut self, events: &mut dyn LocomotionEvents) {
        if self.last_jump_time + JUMP_REPEAT_TIME > self.time {
            return;
        }

        if self.is_grounded() {
            // A press buffered up to JUMP_TIMEOUT before this tick still
            // counts
            if self.config.can_jump && self.time < self.last_jump_button_time + JUMP_TIMEOUT {
                self.vertical_speed = self.config.jump_vertical_speed(self.config.jump_height);
                self.start_jump();
                events.did_jump();
            }
        }
    }

    fn start_jump(&mut self) {
        self.jumping = true;
        self.jump_reached_apex = false;
        self.last_jump_time = self.time;
        self.last_jump_start_height = self.character.position().y;
        self.touch_wall_jump_time = -1.0;
        self.last_jump_button_time = -10.0;
    }

    /// Launch straight up to an explicit height, ignoring the normal jump
    /// tuning
    pub fn super_jump(&mut self, height: f32, events: &mut dyn LocomotionEvents) {
        self.vertical_speed = self.config.jump_vertical_speed(height);
        self.collision_flags = CollisionFlags::NONE;
        self.start_jump();
        events.did_jump();
    }

    /// [`Self::super_jump`] with an injected horizontal velocity
    pub fn super_jump_with_velocity(
        &mut self,
        height: f32,
        velocity: Vec3,
        events: &mut dyn LocomotionEvents,
    ) {
        self.in_air_velocity = velocity;
        self.super_jump(height, events);
    }

    /// Knock the character down: a flat hop with a strong horizontal shove
    /// and a shrunken collision footprint until it lands
    ///
    /// `recovery` optionally relocates the character once it touches down.
    pub fn slam(
        &mut self,
        physics: &mut PhysicsWorld,
        direction: Vec3,
        recovery: Option<Vec3>,
        events: &mut dyn LocomotionEvents,
    ) {
        self.vertical_speed = self.config.jump_vertical_speed(1.0);
        self.in_air_velocity = direction * 6.0;
        self.character.set_height(physics, SLAM_HEIGHT);
        self.slammed = true;
        self.slam_recovery = recovery;
        self.collision_flags = CollisionFlags::NONE;
        self.start_jump();
        events.did_jump();
    }

    /// Teleport the character, clearing all motion
    pub fn teleport(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.character.set_position(physics, position);
        self.move_speed = 0.0;
        self.vertical_speed = 0.0;
        self.in_air_velocity = Vec3::ZERO;
    }

    /// Enable or disable input processing (cutscenes, death sequences)
    pub fn set_controllable(&mut self, controllable: bool) {
        self.controllable = controllable;
    }

    /// Whether input is currently processed
    pub fn is_controllable(&self) -> bool {
        self.controllable
    }

    /// Current smoothed horizontal speed
    pub fn speed(&self) -> f32 {
        self.move_speed
    }

    /// Current normalized heading
    pub fn direction(&self) -> Vec3 {
        self.move_direction
    }

    /// Whether a self-initiated jump is in progress
    pub fn is_jumping(&self) -> bool {
        self.jumping && !self.slammed
    }

    /// Whether the character was knocked down and hasn't landed yet
    pub fn is_slammed(&self) -> bool {
        self.slammed
    }

    /// Whether the resolver reported ground contact this tick
    pub fn is_grounded(&self) -> bool {
        self.collision_flags.below
    }

    /// Grounded, or was within the grace period
    pub fn is_grounded_with_timeout(&self) -> bool {
        self.last_grounded_time + self.config.grounded_timeout > self.time
    }

    /// Whether the current jump already peaked
    pub fn has_jump_reached_apex(&self) -> bool {
        self.jump_reached_apex
    }

    /// Whether movement input is currently applied
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Whether the character is backing up (the camera avoids spinning
    /// around in that case)
    pub fn is_moving_backwards(&self) -> bool {
        self.moving_back
    }

    /// Whether reduced gravity is active this tick
    pub fn is_controlled_descent(&self) -> bool {
        self.config.can_control_descent
            && self.vertical_speed < 0.0
            && self.last_jump_held
            && self.jumping
    }

    /// Seconds since the last move/stop transition while grounded
    pub fn lock_camera_timer(&self) -> f32 {
        self.lock_camera_timer
    }

    /// Current position of the character's feet
    pub fn position(&self) -> Vec3 {
        self.character.position()
    }

    /// Facing rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Position and facing as a transform
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.character.position(), self.rotation)
    }

    /// Current vertical speed (positive when ascending)
    pub fn vertical_speed(&self) -> f32 {
        self.vertical_speed
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::NullEvents;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct EventLog {
        jumps: u32,
        wall_jumps: u32,
        lands: u32,
        apexes: u32,
    }

    impl LocomotionEvents for EventLog {
        fn did_jump(&mut self) {
            self.jumps += 1;
        }
        fn did_wall_jump(&mut self) {
            self.wall_jumps += 1;
        }
        fn did_land(&mut self) {
            self.lands += 1;
        }
        fn did_reach_apex(&mut self) {
            self.apexes += 1;
        }
    }

    fn world_with_ground() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world
    }

    fn spawned(world: &mut PhysicsWorld) -> PlayerController {
        let mut controller = PlayerController::new();
        controller.spawn(world, Vec3::ZERO);
        controller
    }

    fn idle() -> ControlInput {
        ControlInput::default()
    }

    fn jump_press() -> ControlInput {
        ControlInput {
            jump_pressed: true,
            jump_held: false,
            ..ControlInput::default()
        }
    }

    fn forward_input() -> ControlInput {
        ControlInput {
            move_axes: Vec2::new(0.0, 1.0),
            ..ControlInput::default()
        }
    }

    /// Step with no input until the resolver reports ground contact
    fn settle(controller: &mut PlayerController, world: &mut PhysicsWorld) {
        let mut events = NullEvents;
        for _ in 0..10 {
            controller.step(world, &idle(), -Vec3::Z, DT, &mut events);
            if controller.is_grounded() {
                return;
            }
        }
        panic!("character never settled on the ground");
    }

    #[test]
    fn test_jump_vertical_speed_is_deterministic() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = EventLog::default();
        controller.step(&mut world, &jump_press(), -Vec3::Z, DT, &mut events);

        assert_eq!(events.jumps, 1);
        // v = sqrt(2 * 0.5 * 20), minus one tick of gravity already applied
        assert!((controller.vertical_speed() - 4.472136).abs() < 20.0 * DT + 1e-3);
        assert!(controller.is_jumping() || controller.is_grounded());
    }

    #[test]
    fn test_landing_notifies_exactly_once() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = EventLog::default();
        controller.step(&mut world, &jump_press(), -Vec3::Z, DT, &mut events);
        assert_eq!(events.jumps, 1);

        for _ in 0..120 {
            controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        }

        assert!(controller.is_grounded());
        assert!(!controller.is_jumping());
        assert_eq!(events.lands, 1);
        assert_eq!(events.apexes, 1);
    }

    #[test]
    fn test_jump_buffering_inside_window() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = EventLog::default();
        controller.step(&mut world, &jump_press(), -Vec3::Z, DT, &mut events);

        // Press again just before touching down; the buffered press must
        // produce a second jump once the repeat lockout expires
        let mut pressed = false;
        for _ in 0..150 {
            let airborne_and_low = !controller.is_grounded()
                && controller.vertical_speed() < 0.0
                && controller.position().y < 0.1;
            let input = if airborne_and_low && !pressed {
                pressed = true;
                jump_press()
            } else {
                idle()
            };
            controller.step(&mut world, &input, -Vec3::Z, DT, &mut events);
        }

        assert!(pressed);
        assert_eq!(events.jumps, 2);
    }

    #[test]
    fn test_jump_buffering_outside_window() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = EventLog::default();
        controller.step(&mut world, &jump_press(), -Vec3::Z, DT, &mut events);

        // Press at the apex - far earlier than JUMP_TIMEOUT before landing
        let mut pressed = false;
        for _ in 0..150 {
            let at_apex = controller.has_jump_reached_apex() && !controller.is_grounded();
            let input = if at_apex && !pressed {
                pressed = true;
                jump_press()
            } else {
                idle()
            };
            controller.step(&mut world, &input, -Vec3::Z, DT, &mut events);
        }

        assert!(pressed);
        assert_eq!(events.jumps, 1);
    }

    #[test]
    fn test_jump_repeat_lockout() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        // Mash the button every tick; jumps must stay JUMP_REPEAT_TIME apart
        let mut events = EventLog::default();
        let mut jump_ticks = Vec::new();
        let mut was_jumping = false;
        for tick in 0..180 {
            controller.step(&mut world, &jump_press(), -Vec3::Z, DT, &mut events);
            let jumping = controller.is_jumping();
            if jumping && !was_jumping {
                jump_ticks.push(tick);
            }
            was_jumping = jumping;
        }

        assert!(jump_ticks.len() >= 2);
        for pair in jump_ticks.windows(2) {
            let gap = (pair[1] - pair[0]) as f32 * DT;
            assert!(gap >= JUMP_REPEAT_TIME - DT, "jumps only {gap}s apart");
        }
    }

    #[test]
    fn test_move_speed_stays_in_bounds() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = NullEvents;
        let run = ControlInput {
            move_axes: Vec2::new(0.0, 1.0),
            run_held: true,
            ..ControlInput::default()
        };
        for _ in 0..300 {
            controller.step(&mut world, &run, -Vec3::Z, DT, &mut events);
            assert!(controller.speed() >= 0.0);
            assert!(controller.speed() <= controller.config.run_speed + 1e-3);
        }
        assert!(controller.speed() > 2.0);
    }

    #[test]
    fn test_idle_grounded_step_is_idempotent() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = NullEvents;
        for _ in 0..5 {
            controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        }

        let position = controller.position();
        let direction = controller.direction();
        for _ in 0..10 {
            controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        }

        assert!((controller.position() - position).length() < 1e-4);
        assert!((controller.direction() - direction).length() < 1e-6);
    }

    #[test]
    fn test_moving_backwards_flag() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = NullEvents;
        let back = ControlInput {
            move_axes: Vec2::new(0.0, -1.0),
            ..ControlInput::default()
        };
        controller.step(&mut world, &back, -Vec3::Z, DT, &mut events);
        assert!(controller.is_moving_backwards());
        assert!(controller.is_moving());

        controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        assert!(!controller.is_moving_backwards());
    }

    #[test]
    fn test_uncontrollable_freezes_vertical_motion() {
        let mut world = world_with_ground();
        let mut controller = PlayerController::new();
        controller.spawn(&mut world, Vec3::new(0.0, 20.0, 0.0));

        let mut events = NullEvents;
        controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        assert!(controller.vertical_speed() < 0.0);

        controller.set_controllable(false);
        let frozen_speed = controller.vertical_speed();
        controller.step(&mut world, &forward_input(), -Vec3::Z, DT, &mut events);
        assert_eq!(controller.vertical_speed(), frozen_speed);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_grounded_with_timeout() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);
        assert!(controller.is_grounded_with_timeout());

        let mut events = NullEvents;
        controller.super_jump(3.0, &mut events);
        for _ in 0..6 {
            controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        }
        assert!(!controller.is_grounded());
        assert!(controller.is_grounded_with_timeout());

        for _ in 0..14 {
            controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
        }
        assert!(!controller.is_grounded_with_timeout());
    }

    #[test]
    fn test_super_jump_clears_ground_contact() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let mut events = EventLog::default();
        controller.super_jump(2.0, &mut events);

        assert_eq!(events.jumps, 1);
        assert!(!controller.is_grounded());
        assert!(controller.is_jumping());
        assert!((controller.vertical_speed() - (2.0 * 2.0 * 20.0_f32).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_wall_jump_redirects_off_wall() {
        let mut world = world_with_ground();
        // Wall to the +X side, reaching well above the flight path
        world.create_static_box(Vec3::new(0.5, 10.0, 10.0), Vec3::new(2.0, 10.0, 0.0));

        let mut controller = PlayerController::with_config(MovementConfig {
            can_wall_jump: true,
            ..MovementConfig::default()
        });
        controller.spawn(&mut world, Vec3::ZERO);
        settle(&mut controller, &mut world);

        // Launch up and drift into the wall, mashing jump on the way down
        let mut events = EventLog::default();
        controller.super_jump_with_velocity(3.0, Vec3::new(1.5, 0.0, 0.0), &mut events);

        for _ in 0..120 {
            let input = if controller.has_jump_reached_apex() {
                jump_press()
            } else {
                idle()
            };
            controller.step(&mut world, &input, -Vec3::Z, DT, &mut events);
            if events.wall_jumps > 0 {
                break;
            }
        }

        assert_eq!(events.wall_jumps, 1);
        // Redirected along the wall normal, away from the wall
        assert!(controller.direction().x < -0.9);
        // Launched at trot speed at least
        assert!(controller.speed() >= controller.config.trot_speed - 1e-3);
        assert!(controller.vertical_speed() > 0.0);
    }

    #[test]
    fn test_slam_and_recovery() {
        let mut world = world_with_ground();
        let mut controller = spawned(&mut world);
        settle(&mut controller, &mut world);

        let recovery = Vec3::new(0.0, 0.75, 0.0);
        let mut events = EventLog::default();
        controller.slam(&mut world, Vec3::new(1.0, 0.0, 0.0), Some(recovery), &mut events);

        assert!(controller.is_slammed());
        assert!(!controller.is_jumping());
        // The capsule flattens as far as its radius allows
        assert!(controller.character.height() < 1.0);

        for _ in 0..240 {
            controller.step(&mut world, &idle(), -Vec3::Z, DT, &mut events);
            if !controller.is_slammed() && controller.is_grounded() {
                break;
            }
        }

        assert!(!controller.is_slammed());
        assert_eq!(events.lands, 1);
        assert!((controller.character.height() - controller.character.config.height).abs() < 1e-5);
        assert!((controller.position() - recovery).length() < 1e-4);
    }
}
