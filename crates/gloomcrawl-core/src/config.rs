//! Simulation tuning.
//!
//! [`SimConfig`] collects every constant the simulation reads: tile and actor
//! sizes, player and enemy tuning, projectile behavior, and timing policy.
//! All sections are `#[serde(default)]`, so a JSON document only needs to
//! name the values it overrides.
//!
//! # Units
//!
//! Lengths suffixed "base units" are multiplied by [`SimConfig::scale`] before
//! use (the grid, actor boxes, patrol range, aggro radius). Lengths documented
//! as "world units" are used as-is. Times are milliseconds.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "scale": 3.0, "player": { "speed": 2.0 } }"#)
//!     .unwrap();
//! assert_eq!(config.tile_size(), 48.0);
//! assert_eq!(config.player.speed, 2.0);
//! assert_eq!(config.player.max_health, 100);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::{EnemyKind, EnemyProfile};
use crate::error::{non_negative, non_negative_int, positive, ConfigError};

/// Reference frame duration used when frame-rate scaling is enabled.
pub const DEFAULT_TARGET_FRAME_MS: f32 = 1000.0 / 60.0;

// =============================================================================
// SimConfig
// =============================================================================

/// Complete tuning for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Edge length of one tile in base units.
    pub base_tile_size: f32,
    /// Multiplier turning base units into world units.
    pub scale: f32,
    /// Seed for the default random source (spawn tiles, patrol directions).
    pub seed: u64,
    /// Force edge collision sampling for every actor, not only for actors
    /// larger than a tile.
    pub strict_sampling: bool,
    /// Scale per-tick motion by `elapsed / target_frame_ms`.
    ///
    /// Off by default: motion is a fixed distance per tick, as the game was
    /// tuned against.
    pub frame_rate_scaling: bool,
    /// Frame duration that one tick of motion corresponds to when
    /// `frame_rate_scaling` is on.
    pub target_frame_ms: f32,
    /// Player tuning.
    pub player: PlayerConfig,
    /// Enemy behavior tuning shared by every enemy kind.
    pub enemy: EnemyConfig,
    /// Per-kind enemy profiles.
    pub enemy_profiles: EnemyProfiles,
    /// Projectile tuning.
    pub projectile: ProjectileConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            base_tile_size: 16.0,
            scale: 2.0,
            seed: 0,
            strict_sampling: false,
            frame_rate_scaling: false,
            target_frame_ms: DEFAULT_TARGET_FRAME_MS,
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            enemy_profiles: EnemyProfiles::default(),
            projectile: ProjectileConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parses a (possibly partial) JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error reported by [`SimConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value for range and finiteness.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_tile_size.is_finite() && self.base_tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.base_tile_size));
        }
        positive("scale", self.scale)?;
        positive("target_frame_ms", self.target_frame_ms)?;
        self.player.validate()?;
        self.enemy.validate()?;
        for kind in EnemyKind::ALL {
            self.enemy_profiles.get(kind).validate()?;
        }
        self.projectile.validate()
    }

    /// World size of one tile.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.base_tile_size * self.scale
    }

    /// Edge length of every combatant's bounding box (one tile).
    #[must_use]
    pub fn actor_size(&self) -> f32 {
        self.tile_size()
    }

    /// Converts a length in base units into world units.
    #[must_use]
    pub fn scaled(&self, base_units: f32) -> f32 {
        base_units * self.scale
    }

    /// Multiplier applied to per-tick displacement for a frame of `elapsed_ms`.
    ///
    /// Always `1.0` unless `frame_rate_scaling` is enabled.
    #[must_use]
    pub fn motion_scale(&self, elapsed_ms: f32) -> f32 {
        if self.frame_rate_scaling {
            elapsed_ms / self.target_frame_ms
        } else {
            1.0
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Player tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Distance moved per tick on each held axis (world units).
    pub speed: f32,
    /// Health at spawn and the healing cap.
    pub max_health: i32,
    /// Damage dealt to each enemy caught by a melee strike.
    pub melee_damage: i32,
    /// Center-to-center reach of a melee strike (world units).
    pub melee_radius: f32,
    /// Minimum time between two melee strikes. `0` means only the input edge
    /// gates the strike.
    pub melee_cooldown_ms: f32,
    /// Health restored by the heal spell.
    pub heal_amount: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_health: 100,
            melee_damage: 10,
            melee_radius: 48.0,
            melee_cooldown_ms: 0.0,
            heal_amount: 20,
        }
    }
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("player.speed", self.speed)?;
        if self.max_health <= 0 {
            return Err(ConfigError::NonPositive {
                field: "player.max_health",
                value: f64::from(self.max_health),
            });
        }
        non_negative_int("player.melee_damage", self.melee_damage)?;
        non_negative("player.melee_radius", self.melee_radius)?;
        non_negative("player.melee_cooldown_ms", self.melee_cooldown_ms)?;
        non_negative_int("player.heal_amount", self.heal_amount)?;
        Ok(())
    }
}

/// Behavior tuning shared by all enemy kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Maximum horizontal patrol distance from the spawn anchor (base units).
    pub patrol_half_range: f32,
    /// Time outside aggro radius after which a chasing enemy gives up.
    pub disengage_ms: f32,
    /// Cooldown between two contact attacks.
    pub attack_rate_ms: f32,
    /// Center-to-center distance below which a chasing enemy attacks
    /// (world units).
    pub melee_distance: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            patrol_half_range: 64.0,
            disengage_ms: 3000.0,
            attack_rate_ms: 1000.0,
            melee_distance: 20.0,
        }
    }
}

impl EnemyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("enemy.patrol_half_range", self.patrol_half_range)?;
        non_negative("enemy.disengage_ms", self.disengage_ms)?;
        non_negative("enemy.attack_rate_ms", self.attack_rate_ms)?;
        non_negative("enemy.melee_distance", self.melee_distance)?;
        Ok(())
    }
}

/// Profile table indexed by [`EnemyKind`].
///
/// A partial profile in JSON is merged onto that kind's built-in profile,
/// not onto a generic default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfiles {
    /// Profile used for [`EnemyKind::Skeleton`].
    #[serde(deserialize_with = "skeleton_profile")]
    pub skeleton: EnemyProfile,
    /// Profile used for [`EnemyKind::Vampire`].
    #[serde(deserialize_with = "vampire_profile")]
    pub vampire: EnemyProfile,
}

impl Default for EnemyProfiles {
    fn default() -> Self {
        Self {
            skeleton: EnemyKind::Skeleton.default_profile(),
            vampire: EnemyKind::Vampire.default_profile(),
        }
    }
}

impl EnemyProfiles {
    /// Returns the profile for `kind`.
    #[must_use]
    pub fn get(&self, kind: EnemyKind) -> &EnemyProfile {
        match kind {
            EnemyKind::Skeleton => &self.skeleton,
            EnemyKind::Vampire => &self.vampire,
        }
    }
}

/// Field-wise override of an [`EnemyProfile`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProfileOverride {
    base_speed: Option<f32>,
    base_health: Option<i32>,
    damage: Option<i32>,
    aggro_radius: Option<f32>,
}

impl ProfileOverride {
    fn apply(self, base: EnemyProfile) -> EnemyProfile {
        EnemyProfile {
            base_speed: self.base_speed.unwrap_or(base.base_speed),
            base_health: self.base_health.unwrap_or(base.base_health),
            damage: self.damage.unwrap_or(base.damage),
            aggro_radius: self.aggro_radius.unwrap_or(base.aggro_radius),
        }
    }
}

fn skeleton_profile<'de, D: Deserializer<'de>>(de: D) -> Result<EnemyProfile, D::Error> {
    ProfileOverride::deserialize(de).map(|o| o.apply(EnemyKind::Skeleton.default_profile()))
}

fn vampire_profile<'de, D: Deserializer<'de>>(de: D) -> Result<EnemyProfile, D::Error> {
    ProfileOverride::deserialize(de).map(|o| o.apply(EnemyKind::Vampire.default_profile()))
}

/// Projectile (fireball) tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Distance per tick along the direction vector (world units).
    pub speed: f32,
    /// Damage dealt to each enemy struck.
    pub damage: i32,
    /// Edge length of the projectile sprite, used for spawn offset and visual
    /// center (world units).
    pub size: f32,
    /// Distance from visual center to an enemy center that counts as a hit
    /// (world units).
    pub impact_radius: f32,
    /// Time each animation frame is shown.
    pub frame_interval_ms: f32,
    /// Number of animation frames; the projectile expires after the last.
    pub frame_count: u32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            damage: 15,
            size: 16.0,
            impact_radius: 20.0,
            frame_interval_ms: 60.0,
            frame_count: 6,
        }
    }
}

impl ProjectileConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("projectile.speed", self.speed)?;
        non_negative_int("projectile.damage", self.damage)?;
        non_negative("projectile.size", self.size)?;
        non_negative("projectile.impact_radius", self.impact_radius)?;
        positive("projectile.frame_interval_ms", self.frame_interval_ms)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
