//! Render snapshots.
//!
//! A [`FrameResult`] is everything a host needs after a frame: where every
//! live entity is, how it looks (facing, animation frame, behavior state),
//! the player's health, whether the run is over, and what happened. Health
//! in snapshots is clamped at zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{ChaseState, Enemy, EntityId, EntityTag, Facing, Player, Projectile};
use crate::output::Event;

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress; `start` has not been called since construction
    /// or the last `reset`.
    #[default]
    Idle,
    /// Frames are being simulated.
    Running,
    /// The player died. Frames are frozen until `reset`.
    Defeated,
}

/// One live entity as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity id.
    pub id: EntityId,
    /// What the entity is.
    pub tag: EntityTag,
    /// Top-left corner.
    pub position: Vec2,
    /// Box (or sprite) size.
    pub size: Vec2,
    /// Health clamped at zero; `None` for projectiles.
    pub health: Option<i32>,
    /// Maximum health; `None` for projectiles.
    pub max_health: Option<i32>,
    /// Facing of combatants.
    pub facing: Option<Facing>,
    /// Behavior state of enemies.
    pub chase_state: Option<ChaseState>,
    /// Animation frame of projectiles.
    pub frame_index: Option<u32>,
}

impl EntitySnapshot {
    /// Snapshot of the player.
    #[must_use]
    pub fn player(player: &Player) -> Self {
        let body = player.combatant();
        Self {
            id: player.id(),
            tag: EntityTag::Player,
            position: body.position(),
            size: body.aabb().size,
            health: Some(body.health().clamped()),
            max_health: Some(body.health().max()),
            facing: Some(body.facing()),
            chase_state: None,
            frame_index: None,
        }
    }

    /// Snapshot of an enemy.
    #[must_use]
    pub fn enemy(enemy: &Enemy) -> Self {
        let body = enemy.combatant();
        Self {
            id: enemy.id(),
            tag: EntityTag::Enemy(enemy.kind()),
            position: body.position(),
            size: body.aabb().size,
            health: Some(body.health().clamped()),
            max_health: Some(body.health().max()),
            facing: Some(body.facing()),
            chase_state: Some(enemy.state()),
            frame_index: None,
        }
    }

    /// Snapshot of a projectile.
    #[must_use]
    pub fn projectile(projectile: &Projectile) -> Self {
        Self {
            id: projectile.id(),
            tag: EntityTag::Projectile,
            position: projectile.position(),
            size: Vec2::splat(projectile.size()),
            health: None,
            max_health: None,
            facing: None,
            chase_state: None,
            frame_index: Some(projectile.frame_index()),
        }
    }
}

/// Outcome of one `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// Frames completed in this run.
    pub tick: u64,
    /// Phase after the frame.
    pub phase: RunPhase,
    /// Player, then enemies, then projectiles, each in spawn order.
    pub entities: Vec<EntitySnapshot>,
    /// Player health clamped at zero.
    pub player_hp: i32,
    /// True once the run is lost.
    pub is_defeated: bool,
    /// Events of this frame in emission order. Empty for frozen frames.
    pub events: Vec<Event>,
}

impl FrameResult {
    /// Captures the arena after a frame.
    #[must_use]
    pub fn capture(arena: &Arena, phase: RunPhase, events: Vec<Event>) -> Self {
        let entities = std::iter::once(EntitySnapshot::player(arena.player()))
            .chain(arena.enemies().iter().map(EntitySnapshot::enemy))
            .chain(arena.projectiles().iter().map(EntitySnapshot::projectile))
            .collect();
        Self {
            tick: arena.current_tick(),
            phase,
            entities,
            player_hp: arena.player().combatant().health().clamped(),
            is_defeated: phase == RunPhase::Defeated,
            events,
        }
    }

    /// Snapshot of one entity, if it is still live.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Snapshots of live enemies.
    pub fn enemies(&self) -> impl Iterator<Item = &EntitySnapshot> + '_ {
        self.entities
            .iter()
            .filter(|e| matches!(e.tag, EntityTag::Enemy(_)))
    }

    /// Snapshots of in-flight projectiles.
    pub fn projectiles(&self) -> impl Iterator<Item = &EntitySnapshot> + '_ {
        self.entities
            .iter()
            .filter(|e| e.tag == EntityTag::Projectile)
    }
}
