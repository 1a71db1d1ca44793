//! Test helper functions for building rooms and driving simulations.

use glam::Vec2;

use crate::config::SimConfig;
use crate::entity::{EntityId, Enemy};
use crate::grid::TileGrid;
use crate::intent::Intent;
use crate::output::Event;
use crate::random::ScriptedRandom;
use crate::simulation::{EnemySpawn, Simulation};
use crate::snapshot::FrameResult;

// =============================================================================
// Setup
// =============================================================================

/// World size of one tile under the default config.
pub const TILE: f32 = 32.0;

/// Where tests park the player unless they say otherwise.
pub const PLAYER_AT: Vec2 = Vec2::new(64.0, 64.0);

/// 16×16 room bordered by walls.
pub fn room() -> TileGrid {
    TileGrid::walled_room(16, 16, TILE).unwrap()
}

/// Simulation whose random source always answers 0 (patrol right).
pub fn scripted_sim() -> Simulation {
    Simulation::with_random(SimConfig::default(), Box::new(ScriptedRandom::default())).unwrap()
}

/// Started simulation with the player at `player_at` and the given enemies.
pub fn started_with(player_at: Vec2, enemies: &[EnemySpawn]) -> Simulation {
    let mut sim = scripted_sim();
    sim.start(room(), player_at, enemies).unwrap();
    sim
}

// =============================================================================
// Driving
// =============================================================================

/// Steps `frames` times with the same intent and returns every frame.
pub fn run(sim: &mut Simulation, frames: usize, elapsed_ms: f32, intent: Intent) -> Vec<FrameResult> {
    (0..frames)
        .map(|_| sim.step(elapsed_ms, intent).unwrap())
        .collect()
}

/// Moves the player to `position` without simulating a frame.
pub fn place_player(sim: &mut Simulation, position: Vec2) {
    sim.arena_mut()
        .unwrap()
        .player_mut()
        .combatant_mut()
        .set_position(position);
}

/// The enemy with `id`, which must still be live.
pub fn enemy(sim: &Simulation, id: EntityId) -> &Enemy {
    sim.arena().unwrap().enemy(id).unwrap()
}

// =============================================================================
// Event queries
// =============================================================================

/// Number of events in `frame` matching `pred`.
pub fn count_events(frame: &FrameResult, pred: impl Fn(&Event) -> bool) -> usize {
    frame.events.iter().filter(|e| pred(e)).count()
}

/// Total damage dealt to the player over `frames`.
pub fn player_damage(frames: &[FrameResult]) -> i32 {
    frames
        .iter()
        .flat_map(|f| &f.events)
        .filter_map(|e| match e {
            Event::PlayerHit { amount, .. } => Some(*amount),
            _ => None,
        })
        .sum()
}
