//! Resolvers apply system outputs to the arena.
//!
//! Resolvers are the write phase of a frame. Systems only propose damage,
//! spawns and strikes; resolvers carry them out in a fixed order so the
//! outcome of a frame never depends on which entity happened to act first.
//!
//! # Architecture
//!
//! Each resolver declares which output kinds it handles via
//! [`Resolver::handles()`]. During resolution:
//! 1. Outputs of the frame are filtered by kind for each resolver
//! 2. Resolvers run in registration order against the same arena
//! 3. Outputs a resolver returns (follow-up events) join the frame's queue
//!    and are visible to the resolvers after it
//!
//! # Invariants
//!
//! - Resolvers must be deterministic given the same arena and output order
//! - Outputs naming an entity that no longer exists are ignored, not errors
//!
//! # Available Resolvers
//!
//! - [`CombatResolver`]: damage, healing, melee, projectile impact, pruning
//! - [`EventResolver`]: records events for the frame result and the log

mod combat;
mod event;

pub use combat::CombatResolver;
pub use event::EventResolver;

use crate::arena::Arena;
use crate::output::{Output, OutputEnvelope, OutputKind};

/// Applies routed outputs to the arena.
///
/// # Example
///
/// ```
/// use gloomcrawl_core::arena::Arena;
/// use gloomcrawl_core::output::{Output, OutputEnvelope, OutputKind};
/// use gloomcrawl_core::resolver::Resolver;
///
/// struct CountingResolver;
///
/// impl Resolver for CountingResolver {
///     fn handles(&self) -> &[OutputKind] {
///         &[OutputKind::Event]
///     }
///
///     fn resolve(&self, outputs: &[&OutputEnvelope], _arena: &mut Arena) -> Vec<Output> {
///         println!("{} events this frame", outputs.len());
///         Vec::new()
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Output kinds routed to this resolver.
    fn handles(&self) -> &[OutputKind];

    /// Applies `outputs` (already filtered by [`Resolver::handles`], in
    /// emission order) and returns any follow-up outputs.
    fn resolve(&self, outputs: &[&OutputEnvelope], arena: &mut Arena) -> Vec<Output>;
}
