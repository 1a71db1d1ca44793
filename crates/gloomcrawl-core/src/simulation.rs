//! Simulation module with the run lifecycle and the per-frame loop.
//!
//! The `Simulation` owns one run at a time and drives it frame by frame:
//!
//! ```text
//!  Idle ──start──▶ Running ──player dies──▶ Defeated
//!   ▲                 │                        │
//!   └─────reset───────┴────────reset───────────┘
//! ```
//!
//! # Frame Phases
//!
//! Every [`Simulation::step`] runs, in order:
//!
//! 1. **PLAYER**: movement from held intent; cast, melee and heal on rising
//!    edges against the previous frame's intent
//! 2. **BEHAVIOR**: each enemy's patrol / chase / attack tick
//! 3. **PROJECTILES**: spawn requested projectiles, advance all of them
//! 4. **RESOLUTION**: resolvers apply the frame's outputs in registration
//!    order (combat first), then the event log records every event
//! 5. **APPLY**: advance the tick, check for defeat, capture the snapshot
//!
//! `elapsed_ms` is the only clock. Nothing in a step blocks or spawns
//! threads.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::config::SimConfig;
//! use gloomcrawl_core::entity::EnemyKind;
//! use gloomcrawl_core::grid::TileGrid;
//! use gloomcrawl_core::intent::Intent;
//! use gloomcrawl_core::simulation::{EnemySpawn, Simulation};
//! use gloomcrawl_core::snapshot::RunPhase;
//! use glam::Vec2;
//!
//! let config = SimConfig::default();
//! let grid = TileGrid::walled_room(12, 12, config.tile_size()).unwrap();
//! let mut sim = Simulation::new(config).unwrap();
//!
//! sim.start(
//!     grid,
//!     Vec2::new(64.0, 64.0),
//!     &[EnemySpawn::at(EnemyKind::Skeleton, Vec2::new(256.0, 256.0))],
//! )
//! .unwrap();
//!
//! let frame = sim.step(16.0, Intent::MOVE_RIGHT).unwrap();
//! assert_eq!(frame.tick, 1);
//! assert_eq!(frame.phase, RunPhase::Running);
//! assert_eq!(frame.entities.len(), 2);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{EnemyKind, EntityId};
use crate::error::{ConfigError, SimError};
use crate::grid::TileGrid;
use crate::intent::Intent;
use crate::output::{Event, OutputQueue, SystemId};
use crate::random::{RandomSource, SeededRandom};
use crate::resolver::{CombatResolver, EventResolver, Resolver};
use crate::snapshot::{FrameResult, RunPhase};
use crate::systems::{EnemyBehavior, FrameContext, PlayerController, ProjectileSystem};

// =============================================================================
// Spawn descriptions
// =============================================================================

/// Where an enemy appears.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPoint {
    /// Top-left corner of the enemy's box, in world units.
    At(Vec2),
    /// The origin of a uniformly chosen walkable tile.
    RandomFreeTile,
}

/// An enemy to place when a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Profile to use.
    pub kind: EnemyKind,
    /// Placement.
    pub at: SpawnPoint,
}

impl EnemySpawn {
    /// Spawn at a fixed position.
    #[must_use]
    pub const fn at(kind: EnemyKind, position: Vec2) -> Self {
        Self {
            kind,
            at: SpawnPoint::At(position),
        }
    }

    /// Spawn on a random walkable tile.
    #[must_use]
    pub const fn random(kind: EnemyKind) -> Self {
        Self {
            kind,
            at: SpawnPoint::RandomFreeTile,
        }
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Owner of the run lifecycle and the per-frame loop.
///
/// The simulation exclusively owns the [`Arena`]; hosts observe it through
/// [`FrameResult`]s or read-only accessors.
pub struct Simulation {
    config: SimConfig,
    random: Box<dyn RandomSource>,
    phase: RunPhase,
    arena: Option<Arena>,
    previous_intent: Intent,
    player: PlayerController,
    behavior: EnemyBehavior,
    projectiles: ProjectileSystem,
    /// Run in registration order; combat is always first.
    resolvers: Vec<Box<dyn Resolver>>,
    /// Runs after every other resolver.
    events: EventResolver,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("phase", &self.phase)
            .field("arena", &self.arena)
            .field("previous_intent", &self.previous_intent)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates an idle simulation whose randomness is seeded from
    /// `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found by [`SimConfig::validate`].
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let random = Box::new(SeededRandom::new(config.seed));
        Self::with_random(config, random)
    }

    /// Creates an idle simulation with an injected random source.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found by [`SimConfig::validate`].
    pub fn with_random(
        config: SimConfig,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            player: PlayerController::new(&config),
            behavior: EnemyBehavior::new(&config),
            projectiles: ProjectileSystem::new(&config.projectile),
            resolvers: vec![Box::new(CombatResolver::new(
                config.projectile.impact_radius,
            ))],
            events: EventResolver::new(),
            config,
            random,
            phase: RunPhase::Idle,
            arena: None,
            previous_intent: Intent::empty(),
        })
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Starts a run on `grid` with the player at `player_spawn` and the given
    /// enemies. A run already in progress is discarded.
    ///
    /// For each enemy, a random tile is drawn first (if requested), then its
    /// initial patrol direction.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if a spawn overlaps terrain, a random
    /// spawn finds no walkable tile, or a profile is invalid. The simulation
    /// is left idle.
    pub fn start(
        &mut self,
        grid: TileGrid,
        player_spawn: Vec2,
        enemy_spawns: &[EnemySpawn],
    ) -> Result<(), SimError> {
        self.reset();
        let grid = Arc::new(grid);
        let mut arena = Arena::new(Arc::clone(&grid), player_spawn, &self.config)?;
        for spawn in enemy_spawns {
            let position = match spawn.at {
                SpawnPoint::At(position) => position,
                SpawnPoint::RandomFreeTile => grid.random_free_tile(self.random.as_mut())?,
            };
            let direction = self.random.pick_sign();
            arena.spawn_enemy(position, spawn.kind, &self.config, direction)?;
        }
        info!(
            width = grid.width(),
            height = grid.height(),
            enemies = arena.enemies().len(),
            "run started"
        );
        self.arena = Some(arena);
        self.phase = RunPhase::Running;
        Ok(())
    }

    /// Discards the current run, if any, and returns to idle.
    ///
    /// The random source is not reseeded.
    pub fn reset(&mut self) {
        if let Some(arena) = self.arena.take() {
            info!(tick = arena.current_tick(), phase = ?self.phase, "run reset");
        }
        self.events.clear();
        self.phase = RunPhase::Idle;
        self.previous_intent = Intent::empty();
    }

    /// Simulates one frame of `elapsed_ms` with the given input snapshot.
    ///
    /// Once the run is defeated, every call returns the same frozen frame
    /// (no events, tick unchanged) until [`Simulation::reset`].
    ///
    /// # Errors
    ///
    /// - [`SimError::NotStarted`] if no run is in progress.
    /// - [`SimError::InvalidElapsed`] if `elapsed_ms` is negative or not
    ///   finite.
    pub fn step(&mut self, elapsed_ms: f32, intent: Intent) -> Result<FrameResult, SimError> {
        let Some(arena) = self.arena.as_mut() else {
            return Err(SimError::NotStarted);
        };
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            return Err(SimError::InvalidElapsed(elapsed_ms));
        }
        if self.phase == RunPhase::Defeated {
            return Ok(FrameResult::capture(arena, self.phase, Vec::new()));
        }

        let ctx = FrameContext {
            tick: arena.current_tick(),
            elapsed_ms,
            motion_scale: self.config.motion_scale(elapsed_ms),
        };
        let mut queue = OutputQueue::new(ctx.tick);

        // PLAYER, BEHAVIOR, PROJECTILES
        self.player
            .update(&ctx, intent, self.previous_intent, arena, &mut queue);
        self.previous_intent = intent;
        self.behavior.update(&ctx, arena, &mut queue);
        self.projectiles.update(&ctx, arena, &mut queue);

        // RESOLUTION
        for resolver in &self.resolvers {
            let follow_ups = {
                let routed = queue.of_kinds(resolver.handles());
                resolver.resolve(&routed, arena)
            };
            let player = arena.player().id();
            for output in follow_ups {
                let entity = output
                    .as_event()
                    .and_then(Event::primary_entity)
                    .unwrap_or(player);
                queue.push(SystemId::Combat, entity, output);
            }
        }
        {
            let routed = queue.of_kinds(self.events.handles());
            self.events.resolve(&routed, arena);
        }

        // APPLY
        arena.advance_tick();
        if !arena.player().is_alive() {
            self.phase = RunPhase::Defeated;
            info!(tick = arena.current_tick(), "player defeated");
        }

        let events = self
            .events
            .take_events()
            .into_iter()
            .filter_map(|envelope| envelope.into_output().as_event().cloned())
            .collect();
        Ok(FrameResult::capture(arena, self.phase, events))
    }

    // -------------------------------------------------------------------------
    // Spawn requests
    // -------------------------------------------------------------------------

    /// Adds an enemy to the running game.
    ///
    /// # Errors
    ///
    /// - [`SimError::NotStarted`] if no run is in progress.
    /// - [`SimError::Config`] if the position overlaps terrain.
    pub fn spawn_enemy(&mut self, position: Vec2, kind: EnemyKind) -> Result<EntityId, SimError> {
        let arena = self.arena.as_mut().ok_or(SimError::NotStarted)?;
        let direction = self.random.pick_sign();
        Ok(arena.spawn_enemy(position, kind, &self.config, direction)?)
    }

    /// Fires a projectile from the combatant `origin`.
    ///
    /// Returns `Ok(None)` if `origin` is not a live combatant.
    ///
    /// # Errors
    ///
    /// - [`SimError::NotStarted`] if no run is in progress.
    /// - [`SimError::Config`] with [`ConfigError::ZeroDirection`] for a zero
    ///   or non-finite sign.
    pub fn spawn_projectile(
        &mut self,
        origin: EntityId,
        direction_sign: f32,
    ) -> Result<Option<EntityId>, SimError> {
        let arena = self.arena.as_mut().ok_or(SimError::NotStarted)?;
        if !direction_sign.is_finite() || direction_sign == 0.0 {
            return Err(ConfigError::ZeroDirection.into());
        }
        let id = self.projectiles.spawn_from(arena, origin, direction_sign)?;
        if id.is_none() {
            debug!(%origin, "projectile origin not found");
        }
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Adds a resolver after the built-in ones.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of resolvers, the event log excluded.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Configuration this simulation was built with.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// World state of the current run.
    #[must_use]
    pub const fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    /// Mutable world state. Intended for setup and tests; prefer spawn
    /// requests and `step`.
    pub fn arena_mut(&mut self) -> Option<&mut Arena> {
        self.arena.as_mut()
    }

    /// Frames completed in the current run (0 when idle).
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.arena.as_ref().map_or(0, Arena::current_tick)
    }

    /// Snapshot of the current state without simulating a frame.
    #[must_use]
    pub fn snapshot(&self) -> Option<FrameResult> {
        self.arena
            .as_ref()
            .map(|arena| FrameResult::capture(arena, self.phase, Vec::new()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn room() -> TileGrid {
        TileGrid::walled_room(12, 12, 32.0).unwrap()
    }

    fn started() -> Simulation {
        let mut sim = Simulation::new(SimConfig::default()).unwrap();
        sim.start(room(), Vec2::new(64.0, 64.0), &[]).unwrap();
        sim
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_is_idle() {
            let sim = Simulation::new(SimConfig::default()).unwrap();
            assert_eq!(sim.phase(), RunPhase::Idle);
            assert_eq!(sim.tick(), 0);
            assert!(sim.arena().is_none());
            assert!(sim.snapshot().is_none());
            assert_eq!(sim.resolver_count(), 1);
        }

        #[test]
        fn new_rejects_invalid_config() {
            let mut config = SimConfig::default();
            config.player.speed = -2.0;
            assert!(Simulation::new(config).is_err());
        }

        #[test]
        fn step_before_start_fails() {
            let mut sim = Simulation::new(SimConfig::default()).unwrap();
            assert!(matches!(
                sim.step(16.0, Intent::empty()),
                Err(SimError::NotStarted)
            ));
        }

        #[test]
        fn step_rejects_bad_elapsed() {
            let mut sim = started();
            assert!(matches!(
                sim.step(-1.0, Intent::empty()),
                Err(SimError::InvalidElapsed(_))
            ));
            assert!(matches!(
                sim.step(f32::NAN, Intent::empty()),
                Err(SimError::InvalidElapsed(_))
            ));
            assert_eq!(sim.tick(), 0);
        }

        #[test]
        fn zero_elapsed_is_a_valid_frame() {
            let mut sim = started();
            let frame = sim.step(0.0, Intent::empty()).unwrap();
            assert_eq!(frame.tick, 1);
        }

        #[test]
        fn reset_returns_to_idle() {
            let mut sim = started();
            sim.step(16.0, Intent::empty()).unwrap();
            sim.reset();
            assert_eq!(sim.phase(), RunPhase::Idle);
            assert!(sim.arena().is_none());
            assert!(matches!(
                sim.step(16.0, Intent::empty()),
                Err(SimError::NotStarted)
            ));
        }

        #[test]
        fn failed_start_leaves_simulation_idle() {
            let mut sim = Simulation::new(SimConfig::default()).unwrap();
            let result = sim.start(
                room(),
                Vec2::new(64.0, 64.0),
                &[EnemySpawn::at(EnemyKind::Skeleton, Vec2::new(0.0, 0.0))],
            );
            assert!(matches!(
                result,
                Err(SimError::Config(ConfigError::SpawnBlocked { .. }))
            ));
            assert_eq!(sim.phase(), RunPhase::Idle);
        }

        #[test]
        fn player_spawn_in_wall_fails() {
            let mut sim = Simulation::new(SimConfig::default()).unwrap();
            assert!(sim.start(room(), Vec2::new(5.0, 64.0), &[]).is_err());
        }

        #[test]
        fn restart_replaces_run() {
            let mut sim = started();
            sim.step(16.0, Intent::empty()).unwrap();
            sim.start(room(), Vec2::new(96.0, 96.0), &[]).unwrap();
            assert_eq!(sim.tick(), 0);
            assert_eq!(
                sim.arena().unwrap().player().combatant().position(),
                Vec2::new(96.0, 96.0)
            );
        }
    }

    mod spawn_tests {
        use super::*;

        #[test]
        fn random_spawns_use_random_source() {
            // Grid with exactly two floor tiles.
            let grid = TileGrid::from_rows(
                vec![
                    vec![1, 1, 1, 1],
                    vec![1, 0, 0, 1],
                    vec![1, 1, 1, 1],
                ],
                32.0,
            )
            .unwrap();
            // Tile index 1, then patrol sign index 1 (left).
            let random = Box::new(ScriptedRandom::new([1, 1]));
            let mut sim = Simulation::with_random(SimConfig::default(), random).unwrap();
            sim.start(
                grid,
                Vec2::new(32.0, 32.0),
                &[EnemySpawn::random(EnemyKind::Vampire)],
            )
            .unwrap();
            let enemy = &sim.arena().unwrap().enemies()[0];
            assert_eq!(enemy.combatant().position(), Vec2::new(64.0, 32.0));
            assert_eq!(enemy.patrol_direction(), -1.0);
        }

        #[test]
        fn random_spawn_ignores_player_position() {
            // The only floor tile is under the player; enemies may overlap it.
            let grid = TileGrid::from_rows(vec![vec![0, 1]], 32.0).unwrap();
            let mut sim = Simulation::new(SimConfig::default()).unwrap();
            sim.start(grid, Vec2::ZERO, &[EnemySpawn::random(EnemyKind::Skeleton)])
                .unwrap();
            let enemy = &sim.arena().unwrap().enemies()[0];
            assert_eq!(enemy.combatant().position(), Vec2::ZERO);
        }

        #[test]
        fn spawn_point_serializes_snake_case() {
            let spawn = EnemySpawn::random(EnemyKind::Vampire);
            let json = serde_json::to_string(&spawn).unwrap();
            assert_eq!(json, r#"{"kind":"vampire","at":"random_free_tile"}"#);
            let parsed: EnemySpawn =
                serde_json::from_str(r#"{"kind":"skeleton","at":{"at":[32.0,64.0]}}"#).unwrap();
            assert_eq!(parsed, EnemySpawn::at(EnemyKind::Skeleton, Vec2::new(32.0, 64.0)));
        }

        #[test]
        fn spawn_requests_need_a_run() {
            let mut sim = Simulation::new(SimConfig::default()).unwrap();
            assert!(matches!(
                sim.spawn_enemy(Vec2::new(64.0, 64.0), EnemyKind::Skeleton),
                Err(SimError::NotStarted)
            ));
            assert!(matches!(
                sim.spawn_projectile(EntityId::new(0), 1.0),
                Err(SimError::NotStarted)
            ));
        }

        #[test]
        fn spawn_enemy_mid_run() {
            let mut sim = started();
            let id = sim
                .spawn_enemy(Vec2::new(200.0, 200.0), EnemyKind::Skeleton)
                .unwrap();
            assert_eq!(id, EntityId::new(1));
            let frame = sim.step(16.0, Intent::empty()).unwrap();
            assert!(frame.entity(id).is_some());
        }

        #[test]
        fn spawn_projectile_validation() {
            let mut sim = started();
            assert!(matches!(
                sim.spawn_projectile(EntityId::new(0), 0.0),
                Err(SimError::Config(ConfigError::ZeroDirection))
            ));
            assert_eq!(sim.spawn_projectile(EntityId::new(55), 1.0).unwrap(), None);
            let id = sim.spawn_projectile(EntityId::new(0), -1.0).unwrap();
            assert_eq!(id, Some(EntityId::new(1)));
        }
    }

    mod resolver_tests {
        use super::*;
        use crate::output::{Output, OutputEnvelope, OutputKind};
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingResolver(Arc<AtomicUsize>);

        impl Resolver for CountingResolver {
            fn handles(&self) -> &[OutputKind] {
                &[OutputKind::Event]
            }

            fn resolve(&self, outputs: &[&OutputEnvelope], _arena: &mut Arena) -> Vec<Output> {
                self.0.fetch_add(outputs.len(), Ordering::SeqCst);
                Vec::new()
            }
        }

        #[test]
        fn custom_resolver_sees_events() {
            let count = Arc::new(AtomicUsize::new(0));
            let mut sim = started();
            sim.add_resolver(Box::new(CountingResolver(Arc::clone(&count))));
            assert_eq!(sim.resolver_count(), 2);
            sim.step(16.0, Intent::CAST_HEAL).unwrap();
            // PlayerHealed from the combat resolver.
            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }
}
