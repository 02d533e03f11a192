//! Skybound - third-person movement and camera simulation
//!
//! Runs a scripted headless session: the character walks, runs, jumps,
//! locks on, gets slammed, dies, and respawns, with the spring camera
//! following throughout. State is logged so the whole loop can be watched
//! from a terminal.

mod settings;

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use skybound_core::{EntityId, GameTime};
use skybound_game::{
    ControlInput, DamageOutcome, LevelContext, LocomotionEvents, PlayerController, PlayerStatus,
    SpringFollowCamera, TargetTracker,
};
use skybound_physics::PhysicsWorld;

use settings::SimSettings;

/// Event sink that narrates the controller's notifications
struct LogEvents;

impl LocomotionEvents for LogEvents {
    fn did_jump(&mut self) {
        info!("event: jumped");
    }

    fn did_wall_jump(&mut self) {
        info!("event: wall jumped");
    }

    fn did_land(&mut self) {
        info!("event: landed");
    }

    fn did_reach_apex(&mut self) {
        info!("event: reached jump apex");
    }
}

/// Scripted input feed standing in for a real input device
struct InputScript {
    prev_jump_held: bool,
}

impl InputScript {
    fn new() -> Self {
        Self {
            prev_jump_held: false,
        }
    }

    fn sample(&mut self, t: f64) -> ControlInput {
        let forward = (0.5..7.0).contains(&t);
        let run_held = (2.0..4.0).contains(&t);
        let jump_held = (4.0..4.4).contains(&t) || (6.2..6.3).contains(&t);
        let lock_on_held = (5.0..5.6).contains(&t);

        let input = ControlInput {
            move_axes: glam::Vec2::new(0.0, if forward { 1.0 } else { 0.0 }),
            jump_pressed: jump_held && !self.prev_jump_held,
            jump_held,
            run_held,
            lock_on_held,
        };
        self.prev_jump_held = jump_held;
        input
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting Skybound simulation...");

    let settings = SimSettings::load();
    run_simulation(settings).context("simulation failed")
}

fn run_simulation(settings: SimSettings) -> Result<()> {
    // Static level: a floor, a wall to bounce off, and two respawn points
    let mut physics = PhysicsWorld::new();
    physics.create_ground(0.0);
    physics.create_static_box(Vec3::new(0.5, 6.0, 8.0), Vec3::new(0.0, 6.0, -24.0));

    let mut level = LevelContext::new();
    let start_point = level.add_respawn_point(Vec3::ZERO);
    level.add_respawn_point(Vec3::new(0.0, 0.0, -12.0));
    level.set_initial_respawn(start_point);

    let mut controller = PlayerController::with_config(settings.movement);
    controller.spawn(&mut physics, Vec3::new(0.0, 0.0, 4.0));

    let mut camera =
        SpringFollowCamera::new(settings.camera, &controller.character, &controller.transform())
            .context("camera setup failed")?;

    let mut status = PlayerStatus::new();

    // One practice dummy ahead of the player for the lock-on phase
    let mut tracker = TargetTracker::new();
    let dummy = EntityId::new();
    tracker.add_target(dummy, Vec3::new(3.0, 1.0, -10.0));

    let mut time = GameTime::new(settings.time);
    let mut script = InputScript::new();
    let mut events = LogEvents;

    let mut slammed_once = false;
    let mut died_once = false;
    let raw_delta = time.config.fixed_timestep;

    for _frame in 0..720 {
        time.update(raw_delta);

        for _ in 0..time.fixed_steps() {
            let t = time.total_time;
            let dt = time.config.fixed_timestep;
            let input = script.sample(t);

            // Scripted mishaps: a knockdown, then a lethal hit
            if t >= 8.0 && !slammed_once {
                slammed_once = true;
                info!("ouch: slammed by an enemy");
                controller.slam(&mut physics, Vec3::new(1.0, 0.0, 1.0), None, &mut events);
            }
            if t >= 9.5 && !died_once {
                died_once = true;
                if status.apply_damage(status.max_health) == DamageOutcome::Dead {
                    info!("player died, respawning");
                    status.begin_respawn(&mut controller, &mut physics, &level);
                }
            }

            controller.step(
                &mut physics,
                &input,
                camera.transform().forward(),
                dt,
                &mut events,
            );

            // Walking over a respawn point claims it
            let touched = level
                .respawn_points()
                .iter()
                .find(|point| (controller.position() - point.position).length() < 1.5)
                .map(|point| point.id);
            if let Some(id) = touched {
                if level.current_respawn().map(|point| point.id) != Some(id) {
                    info!("respawn point claimed");
                    level.trigger(id);
                }
            }

            tracker.update(controller.character.center_position(), &physics);
            let lock_on = if input.lock_on_held {
                tracker.current_target().map(|target| target.position)
            } else {
                None
            };

            camera.step(
                dt,
                &controller.transform(),
                &controller,
                &physics,
                input.lock_on_held,
                lock_on,
            );

            status.update(dt, &mut controller, &mut level);
            level.update(dt);
        }

        if time.frame_count % 60 == 0 {
            let position = controller.position();
            info!(
                "t={:.1}s pos=({:.2}, {:.2}, {:.2}) speed={:.2} grounded={} jumping={} snapping={}",
                time.total_time,
                position.x,
                position.y,
                position.z,
                controller.speed(),
                controller.is_grounded(),
                controller.is_jumping(),
                camera.is_snapping(),
            );
        }
    }

    info!(
        "Simulation complete: health={} lives={}",
        status.health, status.lives
    );
    Ok(())
}
