//! # Gloomcrawl Core
//!
//! Deterministic simulation core for a single-player, top-down tile-grid
//! action game.
//!
//! This crate owns the rules of a run: a player and enemies moving through a
//! grid of floor and wall tiles, projectiles flying in straight lines, and
//! damage exchanged through melee strikes, projectile impacts and enemy
//! contact. Rendering, audio, and input capture stay with the host, which
//! calls [`Simulation::step`] once per frame with the elapsed time and an
//! [`Intent`] snapshot and draws the returned [`FrameResult`].
//!
//! ## Architecture
//!
//! - **Arena**: the world of one run (grid, player, enemies, projectiles)
//! - **Systems**: player control, enemy behavior, projectile flight; they
//!   only read the arena's intent and emit outputs
//! - **Resolvers**: apply outputs in a fixed order (combat, then the event log)
//!
//! ## Usage
//!
//! ```
//! use gloomcrawl_core::{EnemyKind, EnemySpawn, Intent, SimConfig, Simulation, TileGrid};
//! use glam::Vec2;
//!
//! let config = SimConfig::default();
//! let grid = TileGrid::walled_room(16, 12, config.tile_size()).unwrap();
//! let mut sim = Simulation::new(config).unwrap();
//! sim.start(
//!     grid,
//!     Vec2::new(64.0, 64.0),
//!     &[EnemySpawn::random(EnemyKind::Vampire)],
//! )
//! .unwrap();
//!
//! for _ in 0..60 {
//!     let frame = sim.step(16.0, Intent::MOVE_RIGHT).unwrap();
//!     if frame.is_defeated {
//!         break;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod grid;
pub mod intent;
pub mod output;
pub mod random;
pub mod resolver;
pub mod simulation;
pub mod snapshot;
pub mod systems;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use config::SimConfig;
pub use entity::{EnemyKind, EntityId};
pub use error::{ConfigError, SimError};
pub use grid::TileGrid;
pub use intent::Intent;
pub use simulation::{EnemySpawn, Simulation, SpawnPoint};
pub use snapshot::{FrameResult, RunPhase};
