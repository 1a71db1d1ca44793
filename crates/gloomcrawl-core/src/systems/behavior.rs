//! Enemy behavior state machine.
//!
//! Every enemy is in one of two states:
//!
//! ```text
//!              d < aggro_radius
//!  Patrolling ──────────────────▶ Chasing
//!      ▲                             │
//!      └─────────────────────────────┘
//!        outside aggro_radius for more
//!        than disengage_ms (cumulative,
//!        reset whenever back in range)
//! ```
//!
//! A tick runs five steps in a fixed order: cooldown, distance, transition,
//! motion, attack. Distances are measured center to center.
//!
//! # Patrol
//!
//! Patrolling enemies walk horizontally between `anchor.x - half_range` and
//! `anchor.x + half_range`, never stepping past the current end. They turn
//! around on reaching it, on starting the tick at or past it, or on bumping
//! into terrain.
//!
//! # Chase
//!
//! Chasing enemies step along the axis with the larger displacement to the
//! player. The other axis is only tried if that step is blocked, which lets
//! them slide around corners without pathfinding.
//!
//! # Attack
//!
//! A chasing enemy that ends its move closer than `melee_distance` to the
//! player, with its cooldown elapsed, emits an
//! [`ApplyDamage`](crate::output::Modifier::ApplyDamage) modifier and restarts
//! its cooldown.

use glam::Vec2;
use tracing::debug;

use crate::arena::Arena;
use crate::collision::CollisionResolver;
use crate::config::SimConfig;
use crate::entity::{ChaseState, Enemy, EntityId};
use crate::grid::TileGrid;
use crate::output::{Event, Modifier, OutputQueue, SystemId};

use super::FrameContext;

/// The patrol / chase / attack state machine shared by every enemy kind.
#[derive(Debug, Clone)]
pub struct EnemyBehavior {
    disengage_ms: f32,
    attack_rate_ms: f32,
    melee_distance: f32,
}

/// What the behavior needs to know about the player.
#[derive(Debug, Clone, Copy)]
struct Quarry {
    id: EntityId,
    center: Vec2,
}

impl EnemyBehavior {
    /// Creates the behavior from the enemy section of `config`.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            disengage_ms: config.enemy.disengage_ms,
            attack_rate_ms: config.enemy.attack_rate_ms,
            melee_distance: config.enemy.melee_distance,
        }
    }

    /// Runs one tick for every live enemy, in spawn order.
    pub fn update(&self, ctx: &FrameContext, arena: &mut Arena, out: &mut OutputQueue) {
        let (enemies, player, grid, collision) = arena.enemies_and_terrain();
        let quarry = Quarry {
            id: player.id(),
            center: player.combatant().center(),
        };
        for enemy in enemies.iter_mut().filter(|e| e.combatant().is_alive()) {
            self.tick(enemy, quarry, ctx, grid, collision, out);
        }
    }

    fn tick(
        &self,
        enemy: &mut Enemy,
        quarry: Quarry,
        ctx: &FrameContext,
        grid: &TileGrid,
        collision: &CollisionResolver,
        out: &mut OutputQueue,
    ) {
        enemy.attack_cooldown_ms -= ctx.elapsed_ms;

        let distance = enemy.combatant.distance_to(quarry.center);
        self.transition(enemy, distance, ctx.elapsed_ms, out);

        let speed = enemy.speed * ctx.motion_scale;
        match enemy.state {
            ChaseState::Patrolling => Self::patrol(enemy, speed, grid, collision),
            ChaseState::Chasing => Self::chase(enemy, quarry.center, speed, grid, collision),
        }

        if enemy.state == ChaseState::Chasing
            && enemy.combatant.distance_to(quarry.center) < self.melee_distance
            && enemy.attack_cooldown_ms <= 0.0
        {
            enemy.attack_cooldown_ms = self.attack_rate_ms;
            out.push(
                SystemId::Behavior,
                enemy.id(),
                Modifier::ApplyDamage {
                    source: enemy.id(),
                    target: quarry.id,
                    amount: enemy.damage,
                },
            );
        }
    }

    fn transition(&self, enemy: &mut Enemy, distance: f32, elapsed_ms: f32, out: &mut OutputQueue) {
        let in_range = distance < enemy.aggro_radius;
        match enemy.state {
            ChaseState::Patrolling => {
                if in_range {
                    enemy.state = ChaseState::Chasing;
                    enemy.disengage_timer_ms = 0.0;
                    debug!(enemy = %enemy.id(), distance, "enemy aggroed");
                    out.push(
                        SystemId::Behavior,
                        enemy.id(),
                        Event::EnemyAggroed { enemy: enemy.id() },
                    );
                }
            }
            ChaseState::Chasing => {
                if in_range {
                    enemy.disengage_timer_ms = 0.0;
                } else {
                    enemy.disengage_timer_ms += elapsed_ms;
                    if enemy.disengage_timer_ms > self.disengage_ms {
                        enemy.state = ChaseState::Patrolling;
                        enemy.disengage_timer_ms = 0.0;
                        debug!(enemy = %enemy.id(), "enemy disengaged");
                        out.push(
                            SystemId::Behavior,
                            enemy.id(),
                            Event::EnemyDisengaged { enemy: enemy.id() },
                        );
                    }
                }
            }
        }
    }

    fn patrol(enemy: &mut Enemy, speed: f32, grid: &TileGrid, collision: &CollisionResolver) {
        let x = enemy.combatant.position().x;
        let target = enemy.patrol_target_x();
        let remaining = (target - x) * enemy.patrol_direction;
        if remaining <= 0.0 {
            enemy.patrol_direction = -enemy.patrol_direction;
            return;
        }

        let step = speed.min(remaining);
        if step <= 0.0 {
            return;
        }
        let moved = enemy
            .combatant
            .move_x(step * enemy.patrol_direction, grid, collision);
        if !moved {
            enemy.patrol_direction = -enemy.patrol_direction;
        } else if step >= remaining {
            // Land exactly on the end so rounding never leaves the range.
            let y = enemy.combatant.position().y;
            enemy.combatant.set_position(Vec2::new(target, y));
            enemy.patrol_direction = -enemy.patrol_direction;
        }
    }

    fn chase(
        enemy: &mut Enemy,
        target: Vec2,
        speed: f32,
        grid: &TileGrid,
        collision: &CollisionResolver,
    ) {
        let delta = target - enemy.combatant.center();
        let distance = delta.length();
        if distance == 0.0 {
            return;
        }
        let unit = delta / distance;
        let body = &mut enemy.combatant;
        if unit.x.abs() >= unit.y.abs() {
            if !body.move_x(unit.x * speed, grid, collision) {
                body.move_y(unit.y * speed, grid, collision);
            }
        } else if !body.move_y(unit.y * speed, grid, collision) {
            body.move_x(unit.x * speed, grid, collision);
        }
    }
}
