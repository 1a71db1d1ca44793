//! Projectile spawning, flight and expiry.
//!
//! Projectiles fly in a straight line at a fixed distance per tick and live
//! exactly as long as their animation: each frame is shown for more than
//! `frame_interval_ms`, and after `frame_count` frames the projectile is
//! marked [`RemovalReason::Expired`]. The animation steps at most one frame
//! per tick, so a long frame never skips ahead. Terrain and world bounds do not stop
//! them.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::collision::Aabb;
//! use gloomcrawl_core::config::ProjectileConfig;
//! use gloomcrawl_core::entity::EntityId;
//! use gloomcrawl_core::systems::{FrameContext, ProjectileSystem};
//! use glam::Vec2;
//!
//! let system = ProjectileSystem::new(&ProjectileConfig::default());
//! let caster = Aabb::new(Vec2::new(64.0, 64.0), Vec2::splat(32.0));
//!
//! let mut fireball = system.spawn(EntityId::new(5), &caster, 1.0).unwrap();
//! assert_eq!(fireball.position(), Vec2::new(96.0, 72.0));
//!
//! system.advance(&mut fireball, &FrameContext::fixed(0, 16.0));
//! assert_eq!(fireball.position(), Vec2::new(99.0, 72.0));
//! ```

use glam::Vec2;
use tracing::debug;

use crate::arena::Arena;
use crate::collision::Aabb;
use crate::config::ProjectileConfig;
use crate::entity::{EntityId, Projectile, RemovalReason};
use crate::error::ConfigError;
use crate::output::{Command, Event, OutputKind, OutputQueue, SystemId};

use super::FrameContext;

/// Builds and advances projectiles.
#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    speed: f32,
    damage: i32,
    size: f32,
    frame_interval_ms: f32,
    frame_count: u32,
}

impl ProjectileSystem {
    /// Creates the system from projectile tuning.
    #[must_use]
    pub fn new(config: &ProjectileConfig) -> Self {
        Self {
            speed: config.speed,
            damage: config.damage,
            size: config.size,
            frame_interval_ms: config.frame_interval_ms,
            frame_count: config.frame_count,
        }
    }

    /// Builds a horizontal projectile beside `origin`: against its right
    /// edge for a positive sign, against its left edge for a negative one,
    /// vertically centered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDirection`] if `direction_sign` is zero or
    /// not finite.
    pub fn spawn(
        &self,
        id: EntityId,
        origin: &Aabb,
        direction_sign: f32,
    ) -> Result<Projectile, ConfigError> {
        if !direction_sign.is_finite() || direction_sign == 0.0 {
            return Err(ConfigError::ZeroDirection);
        }
        self.spawn_directed(id, origin, Vec2::new(direction_sign.signum(), 0.0))
    }

    /// Builds a projectile flying along `direction` (normalized here),
    /// placed just outside `origin` on that side.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDirection`] if `direction` has zero length
    /// or a non-finite component.
    pub fn spawn_directed(
        &self,
        id: EntityId,
        origin: &Aabb,
        direction: Vec2,
    ) -> Result<Projectile, ConfigError> {
        let direction = direction.try_normalize().ok_or(ConfigError::ZeroDirection)?;
        let half = self.size / 2.0;
        // Push the sprite center out to where it just clears the caster's box.
        let reach = (origin.size / 2.0 + Vec2::splat(half)) * direction;
        let position = origin.center() + reach - Vec2::splat(half);
        Ok(Projectile {
            id,
            position,
            direction,
            speed: self.speed,
            damage: self.damage,
            size: self.size,
            frame_index: 0,
            frame_timer_ms: 0.0,
            frame_interval_ms: self.frame_interval_ms,
            frame_count: self.frame_count,
            marked: None,
        })
    }

    /// Moves `projectile` one tick and runs its animation clock. Returns true
    /// if this call expired it.
    pub fn advance(&self, projectile: &mut Projectile, ctx: &FrameContext) -> bool {
        if projectile.is_marked() {
            return false;
        }
        projectile.position += projectile.direction * projectile.speed * ctx.motion_scale;
        projectile.frame_timer_ms += ctx.elapsed_ms;
        // One frame per tick at most; leftover time is dropped.
        if projectile.frame_timer_ms > projectile.frame_interval_ms
            && projectile.frame_index < projectile.frame_count
        {
            projectile.frame_index += 1;
            projectile.frame_timer_ms = 0.0;
        }
        if projectile.frame_index >= projectile.frame_count {
            projectile.marked = Some(RemovalReason::Expired);
            return true;
        }
        false
    }

    /// Spawns a projectile from the combatant `source` into the arena.
    ///
    /// Returns `Ok(None)` if `source` is not a live combatant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroDirection`] for a zero or non-finite sign.
    pub fn spawn_from(
        &self,
        arena: &mut Arena,
        source: EntityId,
        direction_sign: f32,
    ) -> Result<Option<EntityId>, ConfigError> {
        let Some(body) = arena.combatant(source).map(|c| c.aabb()) else {
            return Ok(None);
        };
        let id = arena.allocate_id();
        let projectile = self.spawn(id, &body, direction_sign)?;
        debug!(%id, %source, x = projectile.position.x, y = projectile.position.y, "projectile spawned");
        arena.push_projectile(projectile);
        Ok(Some(id))
    }

    /// Runs the projectile phase of a frame: spawns everything requested by
    /// `SpawnProjectile` commands in `out`, then advances every projectile.
    pub fn update(&self, ctx: &FrameContext, arena: &mut Arena, out: &mut OutputQueue) {
        let requests: Vec<(EntityId, f32)> = out
            .of_kinds(&[OutputKind::Command])
            .into_iter()
            .filter_map(|envelope| match envelope.output().as_command() {
                Some(Command::SpawnProjectile {
                    source,
                    direction_sign,
                }) => Some((*source, *direction_sign)),
                _ => None,
            })
            .collect();

        for (source, sign) in requests {
            match self.spawn_from(arena, source, sign) {
                Ok(Some(projectile)) => out.push(
                    SystemId::Projectile,
                    projectile,
                    Event::ProjectileSpawned { projectile, source },
                ),
                Ok(None) => {}
                Err(err) => debug!(%source, %err, "projectile request dropped"),
            }
        }

        for projectile in arena.projectiles_mut() {
            if self.advance(projectile, ctx) {
                let id = projectile.id();
                out.push(
                    SystemId::Projectile,
                    id,
                    Event::ProjectileExpired { projectile: id },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::grid::TileGrid;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn system() -> ProjectileSystem {
        ProjectileSystem::new(&ProjectileConfig::default())
    }

    fn caster() -> Aabb {
        Aabb::new(Vec2::new(64.0, 64.0), Vec2::splat(32.0))
    }

    mod spawn_tests {
        use super::*;

        #[test]
        fn left_spawn_sits_against_left_edge() {
            let p = system().spawn(EntityId::new(1), &caster(), -1.0).unwrap();
            assert_eq!(p.position(), Vec2::new(48.0, 72.0));
            assert_eq!(p.direction(), Vec2::new(-1.0, 0.0));
            assert_eq!(p.damage(), 15);
            assert!(!p.is_marked());
        }

        #[test]
        fn sign_magnitude_is_ignored() {
            let p = system().spawn(EntityId::new(1), &caster(), 7.5).unwrap();
            assert_eq!(p.direction(), Vec2::X);
            assert_eq!(p.position(), Vec2::new(96.0, 72.0));
        }

        #[test]
        fn zero_or_nan_sign_is_rejected() {
            for sign in [0.0, -0.0, f32::NAN, f32::INFINITY] {
                assert!(matches!(
                    system().spawn(EntityId::new(1), &caster(), sign),
                    Err(ConfigError::ZeroDirection)
                ));
            }
        }

        #[test]
        fn directed_spawn_normalizes() {
            let p = system()
                .spawn_directed(EntityId::new(1), &caster(), Vec2::new(0.0, -4.0))
                .unwrap();
            assert_eq!(p.direction(), Vec2::new(0.0, -1.0));
            assert_eq!(p.position(), Vec2::new(72.0, 48.0));
            assert!(system()
                .spawn_directed(EntityId::new(1), &caster(), Vec2::ZERO)
                .is_err());
        }

        #[test]
        fn spawn_from_unknown_source_is_noop() {
            let config = SimConfig::default();
            let grid = Arc::new(TileGrid::walled_room(8, 8, config.tile_size()).unwrap());
            let mut arena = Arena::new(grid, Vec2::new(64.0, 64.0), &config).unwrap();
            let result = system().spawn_from(&mut arena, EntityId::new(42), 1.0);
            assert_eq!(result.unwrap(), None);
            assert!(arena.projectiles().is_empty());
        }
    }

    mod advance_tests {
        use super::*;

        #[test]
        fn frame_advances_only_past_interval() {
            let s = system();
            let mut p = s.spawn(EntityId::new(1), &caster(), 1.0).unwrap();
            s.advance(&mut p, &FrameContext::fixed(0, 60.0));
            assert_eq!(p.frame_index(), 0);
            s.advance(&mut p, &FrameContext::fixed(1, 1.0));
            assert_eq!(p.frame_index(), 1);
            assert!(p.frame_timer_ms().abs() < 1e-4);
        }

        #[test]
        fn long_frame_advances_one_frame() {
            let s = system();
            let mut p = s.spawn(EntityId::new(1), &caster(), 1.0).unwrap();
            assert!(!s.advance(&mut p, &FrameContext::fixed(0, 400.0)));
            assert_eq!(p.frame_index(), 1);
            assert!(p.frame_timer_ms().abs() < 1e-4);
            assert!(!p.is_marked());
        }

        #[test]
        fn long_frames_expire_after_one_tick_per_frame() {
            let s = system();
            let mut p = s.spawn(EntityId::new(1), &caster(), 1.0).unwrap();
            for tick in 0..5 {
                assert!(!s.advance(&mut p, &FrameContext::fixed(tick, 1000.0)));
            }
            assert_eq!(p.frame_index(), 5);
            assert!(s.advance(&mut p, &FrameContext::fixed(5, 1000.0)));
            assert!(p.is_expired());
        }

        #[test]
        fn expires_after_animation_not_before() {
            let s = system();
            let mut p = s.spawn(EntityId::new(1), &caster(), 1.0).unwrap();
            let mut elapsed = 0.0;
            let mut tick = 0;
            while !p.is_marked() {
                s.advance(&mut p, &FrameContext::fixed(tick, 16.0));
                elapsed += 16.0;
                tick += 1;
            }
            assert!(elapsed >= 360.0);
            assert!(p.is_expired());
            // Marked projectiles no longer move.
            let at = p.position();
            assert!(!s.advance(&mut p, &FrameContext::fixed(tick, 16.0)));
            assert_eq!(p.position(), at);
        }

        #[test]
        fn ignores_terrain() {
            let s = system();
            let mut p = s.spawn(EntityId::new(1), &caster(), -1.0).unwrap();
            for tick in 0..5 {
                s.advance(&mut p, &FrameContext::fixed(tick, 16.0));
            }
            assert_eq!(p.position(), Vec2::new(33.0, 72.0));
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn position_is_linear_in_ticks(
                n in 0u64..20,
                x in 32.0f32..400.0,
                y in 32.0f32..400.0,
                right in any::<bool>(),
            ) {
                let s = system();
                let origin = Aabb::new(Vec2::new(x, y), Vec2::splat(32.0));
                let sign = if right { 1.0 } else { -1.0 };
                let mut p = s.spawn(EntityId::new(1), &origin, sign).unwrap();
                let start = p.position();
                for tick in 0..n {
                    s.advance(&mut p, &FrameContext::fixed(tick, 16.0));
                }
                #[allow(clippy::cast_precision_loss)]
                let expected = start + p.direction() * 3.0 * n as f32;
                prop_assert!((p.position() - expected).length() < 1e-2);
            }
        }
    }
}
