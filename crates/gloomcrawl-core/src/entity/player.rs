//! The player-controlled hero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::ConfigError;

use super::{Combatant, EntityId};

/// The hero. Always entity id 0 of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub(crate) combatant: Combatant,
    pub(crate) speed: f32,
    /// Remaining melee cooldown; `<= 0` means a strike may fire.
    pub(crate) melee_cooldown_ms: f32,
}

impl Player {
    /// Creates the player at `position` with full health.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid player tuning or a non-finite
    /// position.
    pub fn spawn(id: EntityId, position: Vec2, config: &SimConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            combatant: Combatant::new(id, position, config.actor_size(), config.player.max_health)?,
            speed: crate::error::non_negative("player.speed", config.player.speed)?,
            melee_cooldown_ms: 0.0,
        })
    }

    /// Shared combatant state.
    #[must_use]
    pub const fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    /// Mutable combatant state.
    pub fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.combatant.id()
    }

    /// Distance moved per tick on each held axis.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Remaining melee cooldown.
    #[must_use]
    pub const fn melee_cooldown_ms(&self) -> f32 {
        self.melee_cooldown_ms
    }

    /// True while the player has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.combatant.is_alive()
    }
}
