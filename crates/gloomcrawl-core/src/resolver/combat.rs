//! Combat resolver for damage, healing, melee and projectile impacts.
//!
//! The `CombatResolver` handles:
//! - `ApplyDamage` / `ApplyHealing` modifiers
//! - `MeleeStrike` commands
//! - projectile-vs-enemy impacts (every unmarked projectile, every frame)
//! - removal of dead enemies and marked projectiles
//!
//! # Processing Order
//!
//! 1. Modifiers, in emission order
//! 2. Melee strikes
//! 3. Projectile impacts. A projectile damages *every* enemy within
//!    `impact_radius` of its visual center in the frame it first hits, then
//!    is marked `Struck`. Projectiles that expired this frame never strike.
//! 4. Pruning
//! 5. Player death check
//!
//! Enemies already at or below zero health are skipped by every damage step:
//! they are dead and only waiting for step 4.

use tracing::debug;

use crate::arena::Arena;
use crate::entity::{EntityId, RemovalReason};
use crate::output::{Command, Event, Modifier, Output, OutputEnvelope, OutputKind};

use super::Resolver;

/// Resolver for everything that changes health.
///
/// # Example
///
/// ```
/// use gloomcrawl_core::resolver::{CombatResolver, Resolver};
/// use gloomcrawl_core::output::OutputKind;
///
/// let resolver = CombatResolver::new(20.0);
/// assert!(resolver.handles().contains(&OutputKind::Modifier));
/// assert!(resolver.handles().contains(&OutputKind::Command));
/// ```
#[derive(Debug, Clone)]
pub struct CombatResolver {
    impact_radius: f32,
}

impl CombatResolver {
    /// Creates a combat resolver with the given projectile impact radius.
    #[must_use]
    pub const fn new(impact_radius: f32) -> Self {
        Self { impact_radius }
    }

    fn apply_damage(
        arena: &mut Arena,
        source: EntityId,
        target: EntityId,
        amount: i32,
        events: &mut Vec<Output>,
    ) {
        let is_player = target == arena.player().id();
        let Some(combatant) = arena.combatant_mut(target) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let dealt = combatant.health_mut().damage(amount);
        let remaining = combatant.health().current();
        if is_player {
            debug!(%source, amount = dealt, remaining, "player hit");
            events.push(
                Event::PlayerHit {
                    source,
                    amount: dealt,
                    remaining,
                }
                .into(),
            );
        } else {
            events.push(
                Event::EnemyHit {
                    enemy: target,
                    source,
                    amount: dealt,
                }
                .into(),
            );
        }
    }

    fn apply_healing(arena: &mut Arena, target: EntityId, amount: i32, events: &mut Vec<Output>) {
        let is_player = target == arena.player().id();
        let Some(combatant) = arena.combatant_mut(target) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let restored = combatant.health_mut().heal(amount);
        if is_player {
            events.push(Event::PlayerHealed { amount: restored }.into());
        }
    }

    fn melee(arena: &mut Arena, source: EntityId, radius: f32, damage: i32, events: &mut Vec<Output>) {
        let Some(center) = arena.combatant(source).map(|c| c.center()) else {
            return;
        };
        let mut hits = 0;
        for enemy in arena.enemies_mut() {
            if enemy.id() == source || !enemy.combatant().is_alive() {
                continue;
            }
            if enemy.combatant().distance_to(center) < radius {
                let dealt = enemy.combatant_mut().health_mut().damage(damage);
                hits += 1;
                events.push(
                    Event::EnemyHit {
                        enemy: enemy.id(),
                        source,
                        amount: dealt,
                    }
                    .into(),
                );
            }
        }
        events.push(Event::MeleeSwung { source, hits }.into());
    }

    fn projectile_impacts(&self, arena: &mut Arena, events: &mut Vec<Output>) {
        let (projectiles, enemies) = arena.projectiles_and_enemies_mut();
        for projectile in projectiles.iter_mut().filter(|p| !p.is_marked()) {
            let center = projectile.center();
            let mut hits = 0;
            for enemy in enemies.iter_mut() {
                if !enemy.combatant().is_alive()
                    || enemy.combatant().distance_to(center) >= self.impact_radius
                {
                    continue;
                }
                let dealt = enemy.combatant_mut().health_mut().damage(projectile.damage());
                hits += 1;
                events.push(
                    Event::EnemyHit {
                        enemy: enemy.id(),
                        source: projectile.id(),
                        amount: dealt,
                    }
                    .into(),
                );
            }
            if hits > 0 {
                projectile.mark_struck();
                events.push(
                    Event::ProjectileStruck {
                        projectile: projectile.id(),
                        hits,
                    }
                    .into(),
                );
            }
        }
    }

    fn prune(arena: &mut Arena, events: &mut Vec<Output>) {
        let pruned = arena.prune();
        for (enemy, kind) in pruned.enemies {
            debug!(%enemy, %kind, "enemy killed");
            events.push(Event::EnemyKilled { enemy, kind }.into());
        }
        for (projectile, reason) in pruned.projectiles {
            if reason == RemovalReason::Struck {
                debug!(%projectile, "projectile consumed");
            }
        }
    }
}

impl Resolver for CombatResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Command, OutputKind::Modifier]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], arena: &mut Arena) -> Vec<Output> {
        let mut events = Vec::new();

        for envelope in outputs {
            match envelope.output().as_modifier() {
                Some(Modifier::ApplyDamage {
                    source,
                    target,
                    amount,
                }) => Self::apply_damage(arena, *source, *target, *amount, &mut events),
                Some(Modifier::ApplyHealing { target, amount }) => {
                    Self::apply_healing(arena, *target, *amount, &mut events);
                }
                None => {}
            }
        }

        for envelope in outputs {
            if let Some(Command::MeleeStrike {
                source,
                radius,
                damage,
            }) = envelope.output().as_command()
            {
                Self::melee(arena, *source, *radius, *damage, &mut events);
            }
        }

        self.projectile_impacts(arena, &mut events);
        Self::prune(arena, &mut events);

        if !arena.player().is_alive() {
            events.push(Event::PlayerDefeated.into());
        }
        events
    }
}
