//! Enemy entities and their data-driven profiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimConfig;
use crate::error::{non_negative, non_negative_int, ConfigError};

use super::{Combatant, EntityId};

/// Enemy kind. Kinds differ only in their [`EnemyProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Slow, fragile.
    Skeleton,
    /// Faster and tougher.
    Vampire,
}

impl EnemyKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 2] = [Self::Skeleton, Self::Vampire];

    /// Built-in profile for this kind.
    #[must_use]
    pub const fn default_profile(self) -> EnemyProfile {
        match self {
            Self::Skeleton => EnemyProfile {
                base_speed: 0.5,
                base_health: 30,
                damage: 5,
                aggro_radius: 40.0,
            },
            Self::Vampire => EnemyProfile {
                base_speed: 0.8,
                base_health: 50,
                damage: 10,
                aggro_radius: 40.0,
            },
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skeleton => write!(f, "skeleton"),
            Self::Vampire => write!(f, "vampire"),
        }
    }
}

/// Tuning values selected by [`EnemyKind`] at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    /// Distance moved per tick (world units).
    pub base_speed: f32,
    /// Health at spawn.
    pub base_health: i32,
    /// Damage of one contact attack on the player.
    pub damage: i32,
    /// Distance at which the enemy notices the player (base units).
    pub aggro_radius: f32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        EnemyKind::Skeleton.default_profile()
    }
}

impl EnemyProfile {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        non_negative("enemy_profile.base_speed", self.base_speed)?;
        if self.base_health <= 0 {
            return Err(ConfigError::NonPositive {
                field: "enemy_profile.base_health",
                value: f64::from(self.base_health),
            });
        }
        non_negative_int("enemy_profile.damage", self.damage)?;
        non_negative("enemy_profile.aggro_radius", self.aggro_radius)?;
        Ok(())
    }
}

/// Behavior state of an enemy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChaseState {
    /// Oscillating around the spawn anchor.
    #[default]
    Patrolling,
    /// Pursuing the player.
    Chasing,
}

/// An autonomous enemy.
///
/// Fields are driven by [`crate::systems::EnemyBehavior`]; outside the crate
/// they are read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub(crate) combatant: Combatant,
    pub(crate) kind: EnemyKind,
    pub(crate) speed: f32,
    pub(crate) damage: i32,
    /// World units.
    pub(crate) aggro_radius: f32,
    pub(crate) state: ChaseState,
    pub(crate) disengage_timer_ms: f32,
    /// Spawn position; patrol oscillates around its x.
    pub(crate) anchor: Vec2,
    /// World units.
    pub(crate) patrol_half_range: f32,
    /// `1.0` or `-1.0`.
    pub(crate) patrol_direction: f32,
    pub(crate) attack_cooldown_ms: f32,
}

impl Enemy {
    /// Creates an enemy at `position` using `kind`'s profile from `config`.
    ///
    /// `patrol_direction` is normalized to its sign; zero means right.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid profile or position.
    pub fn spawn(
        id: EntityId,
        position: Vec2,
        kind: EnemyKind,
        config: &SimConfig,
        patrol_direction: f32,
    ) -> Result<Self, ConfigError> {
        let profile = config.enemy_profiles.get(kind);
        profile.validate()?;
        let combatant = Combatant::new(id, position, config.actor_size(), profile.base_health)?;
        Ok(Self {
            combatant,
            kind,
            speed: profile.base_speed,
            damage: profile.damage,
            aggro_radius: config.scaled(profile.aggro_radius),
            state: ChaseState::Patrolling,
            disengage_timer_ms: 0.0,
            anchor: position,
            patrol_half_range: config.scaled(config.enemy.patrol_half_range),
            patrol_direction: if patrol_direction < 0.0 { -1.0 } else { 1.0 },
            attack_cooldown_ms: 0.0,
        })
    }

    /// Shared combatant state.
    #[must_use]
    pub const fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    /// Mutable combatant state (damage application).
    pub fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.combatant.id()
    }

    /// Enemy kind.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Behavior state.
    #[must_use]
    pub const fn state(&self) -> ChaseState {
        self.state
    }

    /// Time spent outside aggro radius while chasing.
    #[must_use]
    pub const fn disengage_timer_ms(&self) -> f32 {
        self.disengage_timer_ms
    }

    /// Remaining attack cooldown; `<= 0` means ready.
    #[must_use]
    pub const fn attack_cooldown_ms(&self) -> f32 {
        self.attack_cooldown_ms
    }

    /// Aggro radius in world units.
    #[must_use]
    pub const fn aggro_radius(&self) -> f32 {
        self.aggro_radius
    }

    /// Patrol anchor (spawn position).
    #[must_use]
    pub const fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Patrol half-range in world units.
    #[must_use]
    pub const fn patrol_half_range(&self) -> f32 {
        self.patrol_half_range
    }

    /// Current patrol direction, `1.0` or `-1.0`.
    #[must_use]
    pub const fn patrol_direction(&self) -> f32 {
        self.patrol_direction
    }

    /// Current patrol target x.
    #[must_use]
    pub fn patrol_target_x(&self) -> f32 {
        self.anchor.x + self.patrol_direction * self.patrol_half_range
    }

    /// Base speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Contact damage.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_differ_by_kind() {
        let skeleton = EnemyKind::Skeleton.default_profile();
        let vampire = EnemyKind::Vampire.default_profile();
        assert!(vampire.base_speed > skeleton.base_speed);
        assert!(vampire.base_health > skeleton.base_health);
        assert!(vampire.damage > skeleton.damage);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EnemyKind::Skeleton).unwrap(), "\"skeleton\"");
        let kind: EnemyKind = serde_json::from_str("\"vampire\"").unwrap();
        assert_eq!(kind, EnemyKind::Vampire);
    }

    #[test]
    fn spawn_scales_lengths() {
        let config = SimConfig::default();
        let enemy = Enemy::spawn(
            EntityId::new(1),
            Vec2::new(64.0, 64.0),
            EnemyKind::Vampire,
            &config,
            -1.0,
        )
        .unwrap();
        assert_eq!(enemy.aggro_radius(), 80.0);
        assert_eq!(enemy.patrol_half_range(), 128.0);
        assert_eq!(enemy.patrol_direction(), -1.0);
        assert_eq!(enemy.patrol_target_x(), 64.0 - 128.0);
        assert_eq!(enemy.combatant().health().current(), 50);
        assert_eq!(enemy.state(), ChaseState::Patrolling);
        assert_eq!(enemy.anchor(), Vec2::new(64.0, 64.0));
    }

    #[test]
    fn zero_direction_means_right() {
        let enemy = Enemy::spawn(
            EntityId::new(1),
            Vec2::ZERO,
            EnemyKind::Skeleton,
            &SimConfig::default(),
            0.0,
        )
        .unwrap();
        assert_eq!(enemy.patrol_direction(), 1.0);
    }

    #[test]
    fn spawn_rejects_invalid_profile() {
        let mut config = SimConfig::default();
        config.enemy_profiles.skeleton.damage = -1;
        let result = Enemy::spawn(EntityId::new(1), Vec2::ZERO, EnemyKind::Skeleton, &config, 1.0);
        assert!(matches!(result, Err(ConfigError::Negative { .. })));
    }
}
