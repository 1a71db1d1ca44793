//! Crate-level scenario and determinism tests.
//!
//! Unit tests live next to each module; these drive a whole [`Simulation`]
//! through its public lifecycle.
//!
//! # Test Structure
//!
//! - `scenarios.rs`: enemy aggro and contact attacks, projectile lifetime
//!   and multi-hit, defeat and restart
//! - `integration.rs`: player input end to end (movement, melee, heal)
//! - `determinism.rs`: same seed and inputs give the same frames
//! - `helpers.rs`: setup utilities
//!
//! [`Simulation`]: crate::simulation::Simulation

mod helpers;

pub use helpers::*;
