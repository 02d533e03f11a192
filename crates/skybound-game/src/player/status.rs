//! Player health, lives, and the death/respawn sequence
//!
//! The respawn sequence is explicit timestamped state advanced each tick:
//! the character is relocated and made uncontrollable, then revealed again
//! after a fixed delay while the respawn point fires its effect.

use glam::Vec3;
use skybound_physics::PhysicsWorld;
use tracing::warn;

use crate::level::LevelContext;

use super::controller::PlayerController;

/// How long the player stays hidden/uncontrollable after dying
const RESPAWN_HIDE_SECONDS: f32 = 1.6;

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Still alive
    Alive,
    /// Health reached zero
    Dead,
}

/// Result of starting a respawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnOutcome {
    /// The player is respawning at the active respawn point
    Respawning,
    /// No lives left
    GameOver,
}

enum RespawnPhase {
    None,
    Hidden { remaining: f32 },
}

/// Health, lives, and respawn bookkeeping for the player
pub struct PlayerStatus {
    pub health: i32,
    pub max_health: i32,
    pub lives: i32,
    phase: RespawnPhase,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            health: 6,
            max_health: 6,
            lives: 4,
            phase: RespawnPhase::None,
        }
    }
}

impl PlayerStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply damage; reports whether the player died
    pub fn apply_damage(&mut self, damage: i32) -> DamageOutcome {
        self.health = (self.health - damage).clamp(0, self.max_health);
        if self.health == 0 {
            DamageOutcome::Dead
        } else {
            DamageOutcome::Alive
        }
    }

    /// Restore health; overhealing converts into an extra life
    pub fn add_health(&mut self, amount: i32) {
        self.health += amount;
        if self.health > self.max_health {
            self.lives += 1;
        }
        self.health = self.health.clamp(0, self.max_health);
    }

    /// Start the death/respawn sequence
    ///
    /// Consumes a life, moves the character to the active respawn point,
    /// and hides it until [`Self::update`] finishes the sequence.
    pub fn begin_respawn(
        &mut self,
        controller: &mut PlayerController,
        physics: &mut PhysicsWorld,
        level: &LevelContext,
    ) -> RespawnOutcome {
        self.lives -= 1;
        self.health = self.max_health;

        if self.lives < 0 {
            return RespawnOutcome::GameOver;
        }

        let Some(respawn_position) = level.current_respawn_position() else {
            warn!("no active respawn point; player stays where it died");
            return RespawnOutcome::Respawning;
        };

        controller.set_controllable(false);
        controller.teleport(physics, respawn_position + Vec3::Y);
        self.phase = RespawnPhase::Hidden {
            remaining: RESPAWN_HIDE_SECONDS,
        };
        RespawnOutcome::Respawning
    }

    /// Advance the respawn sequence by one tick
    pub fn update(&mut self, dt: f32, controller: &mut PlayerController, level: &mut LevelContext) {
        if let RespawnPhase::Hidden { remaining } = &mut self.phase {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.phase = RespawnPhase::None;
                controller.set_controllable(true);
                level.fire_current_respawn_effect();
            }
        }
    }

    /// Whether the death sequence is still playing
    pub fn is_respawning(&self) -> bool {
        matches!(self.phase, RespawnPhase::Hidden { .. })
    }
}
