//! Per-frame systems.
//!
//! Systems are the "decide" half of a frame. Each one reads the [`Arena`],
//! moves the entities it owns through the collision resolver, and emits
//! [`Output`](crate::output::Output)s for everything that crosses entity
//! boundaries (damage, spawns, notifications):
//!
//! - [`PlayerController`]: movement from held intent, actions on rising edges
//! - [`EnemyBehavior`]: the patrol / chase / attack state machine
//! - [`ProjectileSystem`]: spawning, flight and animation-bounded expiry
//!
//! Systems run in that order; resolvers then apply what they emitted.
//!
//! [`Arena`]: crate::arena::Arena

mod behavior;
mod player;
mod projectile;

pub use behavior::EnemyBehavior;
pub use player::PlayerController;
pub use projectile::ProjectileSystem;

/// Timing shared by every system during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Tick being simulated.
    pub tick: u64,
    /// Wall time covered by this frame.
    pub elapsed_ms: f32,
    /// Multiplier on per-tick displacement; see
    /// [`SimConfig::motion_scale`](crate::config::SimConfig::motion_scale).
    pub motion_scale: f32,
}

impl FrameContext {
    /// Context for a frame-rate-coupled tick (`motion_scale == 1`).
    #[must_use]
    pub const fn fixed(tick: u64, elapsed_ms: f32) -> Self {
        Self {
            tick,
            elapsed_ms,
            motion_scale: 1.0,
        }
    }
}
