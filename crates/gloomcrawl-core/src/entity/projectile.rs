//! In-flight projectiles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Why a projectile is leaving play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Its animation ran out.
    Expired,
    /// It hit at least one enemy.
    Struck,
}

/// A projectile. Lifetime is bounded by its animation, not by distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub(crate) id: EntityId,
    pub(crate) position: Vec2,
    /// Unit length.
    pub(crate) direction: Vec2,
    pub(crate) speed: f32,
    pub(crate) damage: i32,
    pub(crate) size: f32,
    pub(crate) frame_index: u32,
    pub(crate) frame_timer_ms: f32,
    pub(crate) frame_interval_ms: f32,
    pub(crate) frame_count: u32,
    pub(crate) marked: Option<RemovalReason>,
}

impl Projectile {
    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Unit direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Distance per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Damage per enemy struck.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Sprite edge length.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Visual center, the point impacts are measured from.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size / 2.0)
    }

    /// Current animation frame.
    #[must_use]
    pub const fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Time accumulated towards the next animation frame.
    #[must_use]
    pub const fn frame_timer_ms(&self) -> f32 {
        self.frame_timer_ms
    }

    /// Removal mark, if any.
    #[must_use]
    pub const fn marked(&self) -> Option<RemovalReason> {
        self.marked
    }

    /// True once the projectile has been marked for removal.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.marked.is_some()
    }

    /// True if the animation ran out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.marked == Some(RemovalReason::Expired)
    }

    /// Marks the projectile as having struck a target. An existing
    /// `Expired` mark wins.
    pub fn mark_struck(&mut self) {
        self.marked.get_or_insert(RemovalReason::Struck);
    }
}
