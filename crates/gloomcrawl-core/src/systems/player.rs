//! Player movement and actions.

use glam::Vec2;

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::intent::Intent;
use crate::output::{Command, Modifier, OutputQueue, SystemId};

use super::FrameContext;

/// Turns an [`Intent`] into player motion and action outputs.
///
/// Movement applies every frame the direction is held. Casting, melee and
/// healing fire once per press.
///
/// # Example
///
/// ```
/// use gloomcrawl_core::systems::PlayerController;
/// use gloomcrawl_core::config::SimConfig;
///
/// let controller = PlayerController::new(&SimConfig::default());
/// assert_eq!(controller.melee_radius(), 48.0);
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    melee_radius: f32,
    melee_damage: i32,
    melee_cooldown_ms: f32,
    heal_amount: i32,
}

impl PlayerController {
    /// Creates a controller from the player section of `config`.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            melee_radius: config.player.melee_radius,
            melee_damage: config.player.melee_damage,
            melee_cooldown_ms: config.player.melee_cooldown_ms,
            heal_amount: config.player.heal_amount,
        }
    }

    /// Reach of a melee strike.
    #[must_use]
    pub const fn melee_radius(&self) -> f32 {
        self.melee_radius
    }

    /// Moves the player and emits action outputs for this frame.
    pub fn update(
        &self,
        ctx: &FrameContext,
        intent: Intent,
        previous: Intent,
        arena: &mut Arena,
        out: &mut OutputQueue,
    ) {
        let (player, grid, collision) = arena.player_and_terrain();
        let id = player.id();
        player.melee_cooldown_ms -= ctx.elapsed_ms;

        let step = player.speed * ctx.motion_scale;
        let delta = Vec2::new(intent.horizontal(), intent.vertical()) * step;
        if delta != Vec2::ZERO {
            player.combatant.move_by(delta, grid, collision);
        }

        if intent.triggered(previous, Intent::CAST_PRIMARY) {
            out.push(
                SystemId::Player,
                id,
                Command::SpawnProjectile {
                    source: id,
                    direction_sign: player.combatant.facing().sign(),
                },
            );
        }

        if intent.triggered(previous, Intent::MELEE) && player.melee_cooldown_ms <= 0.0 {
            player.melee_cooldown_ms = self.melee_cooldown_ms;
            out.push(
                SystemId::Player,
                id,
                Command::MeleeStrike {
                    source: id,
                    radius: self.melee_radius,
                    damage: self.melee_damage,
                },
            );
        }

        if intent.triggered(previous, Intent::CAST_HEAL) {
            out.push(
                SystemId::Player,
                id,
                Modifier::ApplyHealing {
                    target: id,
                    amount: self.heal_amount,
                },
            );
        }
    }
}
