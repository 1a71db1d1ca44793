//! Entity types for the simulation.
//!
//! - [`EntityId`]: unique identifier, monotonically assigned by the arena
//! - [`EntityTag`]: what kind of entity an id refers to
//! - [`Combatant`]: the body, health and facing shared by player and enemies
//! - [`Player`], [`Enemy`], [`Projectile`]: the concrete entities
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::entity::{Combatant, EntityId};
//! use glam::Vec2;
//!
//! let body = Combatant::new(EntityId::new(0), Vec2::new(32.0, 32.0), 32.0, 100).unwrap();
//! assert_eq!(body.center(), Vec2::new(48.0, 48.0));
//! assert_eq!(body.health().current(), 100);
//! ```

pub mod components;
mod enemy;
mod player;
mod projectile;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collision::{Aabb, CollisionResolver, MoveOutcome};
use crate::error::ConfigError;
use crate::grid::TileGrid;

pub use components::{Facing, Health};
pub use enemy::{ChaseState, Enemy, EnemyKind, EnemyProfile};
pub use player::Player;
pub use projectile::{Projectile, RemovalReason};

// =============================================================================
// EntityId / EntityTag
// =============================================================================

/// Unique identifier for an entity within one run.
///
/// Ids are assigned in spawn order and never reused, so ordering by id is
/// ordering by spawn time.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity classification used in snapshots and events.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player-controlled hero.
    Player,
    /// An autonomous enemy.
    Enemy(EnemyKind),
    /// An in-flight projectile.
    Projectile,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy(kind) => write!(f, "Enemy({kind})"),
            Self::Projectile => write!(f, "Projectile"),
        }
    }
}

// =============================================================================
// Combatant
// =============================================================================

/// Position, box, health and facing shared by the player and enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    id: EntityId,
    body: Aabb,
    health: Health,
    facing: Facing,
}

impl Combatant {
    /// Creates a square combatant of edge `size` at full health.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `max_health <= 0`, if `size` is not
    /// positive, or if `position` is not finite.
    pub fn new(
        id: EntityId,
        position: Vec2,
        size: f32,
        max_health: i32,
    ) -> Result<Self, ConfigError> {
        crate::error::positive("size", size)?;
        if !position.is_finite() {
            return Err(ConfigError::NonFinite { field: "position" });
        }
        Ok(Self {
            id,
            body: Aabb::new(position, Vec2::splat(size)),
            health: Health::full(max_health)?,
            facing: Facing::default(),
        })
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Top-left corner in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.body.min
    }

    /// Bounding box.
    #[must_use]
    pub const fn aabb(&self) -> Aabb {
        self.body
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Hit points.
    #[must_use]
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Mutable hit points.
    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// True while hit points are above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Turns to match a horizontal displacement; zero leaves facing as is.
    pub fn face_towards(&mut self, dx: f32) {
        if let Some(facing) = Facing::from_dx(dx) {
            self.facing = facing;
        }
    }

    /// Center-to-center distance.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.center().distance(point)
    }

    /// Moves by `delta` through the collision resolver, axis by axis.
    pub fn move_by(
        &mut self,
        delta: Vec2,
        grid: &TileGrid,
        resolver: &CollisionResolver,
    ) -> MoveOutcome {
        let outcome = resolver.resolve_move(self.body, delta, grid);
        self.body.min = outcome.position;
        self.face_towards(delta.x);
        outcome
    }

    /// Moves along X only. Returns true if the move was applied.
    ///
    /// Facing turns toward `dx` before the move is tried, so a blocked actor
    /// still ends up facing the wall it walked into.
    pub fn move_x(&mut self, dx: f32, grid: &TileGrid, resolver: &CollisionResolver) -> bool {
        self.face_towards(dx);
        match resolver.try_axis_x(self.body, dx, grid) {
            Some(next) => {
                self.body = next;
                true
            }
            None => false,
        }
    }

    /// Moves along Y only. Returns true if the move was applied.
    pub fn move_y(&mut self, dy: f32, grid: &TileGrid, resolver: &CollisionResolver) -> bool {
        match resolver.try_axis_y(self.body, dy, grid) {
            Some(next) => {
                self.body = next;
                true
            }
            None => false,
        }
    }

    /// Teleports without collision checks. Setup and tests only.
    pub fn set_position(&mut self, position: Vec2) {
        self.body.min = position;
    }
}
