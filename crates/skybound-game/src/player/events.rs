//! Locomotion event sink
//!
//! The controller fires these as fire-and-forget notifications for
//! animation/audio collaborators. Every method defaults to a no-op, so a
//! receiver that only cares about landings implements just `did_land`.

/// Observer for locomotion state transitions
pub trait LocomotionEvents {
    /// A ground jump, boosted jump, or slam launched the character
    fn did_jump(&mut self) {}

    /// A wall jump redirected the character
    fn did_wall_jump(&mut self) {}

    /// The character landed after a jump
    fn did_land(&mut self) {}

    /// The current jump passed its apex
    fn did_reach_apex(&mut self) {}
}

/// Event sink that ignores everything
pub struct NullEvents;

impl LocomotionEvents for NullEvents {}
