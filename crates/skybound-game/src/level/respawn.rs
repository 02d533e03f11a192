//! Respawn points
//!
//! A point is Inactive until the player touches it, Active while it is the
//! place the player will respawn, and Respawn while its flash effect plays.
//! The flash is a timed phase advanced each tick; the light intensity is
//! plain state a renderer can read.

use glam::Vec3;
use skybound_core::EntityId;

/// Lifecycle state of a respawn point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnState {
    /// The player hasn't reached this point; it will not respawn here
    Inactive,
    /// The player will respawn here
    Active,
    /// The player is respawning here right now (flash effect playing)
    Respawn,
    /// Just touched this tick; promoted to Active on the next update
    Triggered,
}

/// Seconds the respawn flash burns at full intensity
const FIRE_EFFECT_SECONDS: f32 = 2.0;

enum EffectPhase {
    Idle,
    Firing { remaining: f32 },
}

/// A point the player can respawn at
pub struct RespawnPoint {
    pub id: EntityId,
    pub position: Vec3,
    pub state: RespawnState,
    /// Spotlight intensity for the renderer to pick up
    pub light_intensity: f32,
    effect: EffectPhase,
}

impl RespawnPoint {
    /// Create an inactive respawn point
    pub fn new(position: Vec3) -> Self {
        Self {
            id: EntityId::new(),
            position,
            state: RespawnState::Inactive,
            light_intensity: 0.0,
            effect: EffectPhase::Idle,
        }
    }

    /// This point is now where the player respawns
    pub fn set_active(&mut self) {
        self.state = RespawnState::Active;
        self.light_intensity = 1.5;
    }

    /// Another point took over
    pub fn set_inactive(&mut self) {
        self.state = RespawnState::Inactive;
        self.light_intensity = 0.0;
    }

    /// The player just touched this point
    pub fn set_triggered(&mut self) {
        self.state = RespawnState::Triggered;
        self.light_intensity = 1.5;
    }

    /// Play the respawn flash: full brightness now, settling down after a
    /// fixed burn time
    pub fn fire_effect(&mut self) {
        self.state = RespawnState::Respawn;
        self.light_intensity = 3.5;
        self.effect = EffectPhase::Firing {
            remaining: FIRE_EFFECT_SECONDS,
        };
    }

    /// Advance timed state by one tick
    pub fn update(&mut self, dt: f32) {
        if self.state == RespawnState::Triggered {
            self.set_active();
        }

        if let EffectPhase::Firing { remaining } = &mut self.effect {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.effect = EffectPhase::Idle;
                self.light_intensity = 2.0;
                self.state = RespawnState::Active;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_effect_phases() {
        let mut point = RespawnPoint::new(Vec3::ZERO);
        point.set_active();
        assert_eq!(point.light_intensity, 1.5);

        point.fire_effect();
        assert_eq!(point.state, RespawnState::Respawn);
        assert_eq!(point.light_intensity, 3.5);

        // Still burning halfway through
        point.update(1.0);
        assert_eq!(point.state, RespawnState::Respawn);
        assert_eq!(point.light_intensity, 3.5);

        // Settles once the burn time elapses
        point.update(1.1);
        assert_eq!(point.state, RespawnState::Active);
        assert_eq!(point.light_intensity, 2.0);
    }

    #[test]
    fn test_triggered_promotes_to_active() {
        let mut point = RespawnPoint::new(Vec3::ZERO);
        point.set_triggered();
        assert_eq!(point.state, RespawnState::Triggered);

        point.update(1.0 / 60.0);
        assert_eq!(point.state, RespawnState::Active);
    }
}
