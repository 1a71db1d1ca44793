//! Event resolver for the frame log.
//!
//! The `EventResolver` records event outputs without touching game state.
//! The simulation drains it with `take_events()` at the end of every frame
//! and hands the events to the host in the
//! [`FrameResult`](crate::snapshot::FrameResult).

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::arena::Arena;
use crate::output::{Output, OutputEnvelope, OutputKind};

use super::Resolver;

/// Resolver that records event outputs.
///
/// # Thread Safety
///
/// The log sits behind a `Mutex` to satisfy the `Send + Sync` bound of
/// [`Resolver`]; the simulation itself is single-threaded.
///
/// # Example
///
/// ```
/// use gloomcrawl_core::resolver::{EventResolver, Resolver};
/// use gloomcrawl_core::output::OutputKind;
///
/// let resolver = EventResolver::new();
/// assert!(resolver.handles().contains(&OutputKind::Event));
/// assert!(resolver.take_events().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventResolver {
    event_log: Mutex<Vec<OutputEnvelope>>,
}

impl EventResolver {
    /// Creates a resolver with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<OutputEnvelope>> {
        // The log holds plain data; a panic elsewhere cannot leave it torn.
        self.event_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Drains the log, oldest first.
    pub fn take_events(&self) -> Vec<OutputEnvelope> {
        std::mem::take(&mut *self.log())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.log().len()
    }

    /// True if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }

    /// Discards the log.
    pub fn clear(&self) {
        self.log().clear();
    }
}

impl Resolver for EventResolver {
    fn handles(&self) -> &[OutputKind] {
        &[OutputKind::Event]
    }

    fn resolve(&self, outputs: &[&OutputEnvelope], _arena: &mut Arena) -> Vec<Output> {
        let mut log = self.log();
        for envelope in outputs {
            if let Some(event) = envelope.output().as_event() {
                trace!(
                    tick = envelope.tick(),
                    system = %envelope.system(),
                    entity = %envelope.entity(),
                    ?event,
                    "event"
                );
                log.push((*envelope).clone());
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::entity::EntityId;
    use crate::grid::TileGrid;
    use crate::output::{Event, Modifier, OutputQueue, SystemId};
    use glam::Vec2;
    use std::sync::Arc;

    fn arena() -> Arena {
        let config = SimConfig::default();
        let grid = Arc::new(TileGrid::walled_room(6, 6, config.tile_size()).unwrap());
        Arena::new(grid, Vec2::new(64.0, 64.0), &config).unwrap()
    }

    #[test]
    fn records_only_events_in_order() {
        let mut queue = OutputQueue::new(3);
        queue.push(
            SystemId::Behavior,
            EntityId::new(1),
            Event::EnemyAggroed {
                enemy: EntityId::new(1),
            },
        );
        queue.push(
            SystemId::Behavior,
            EntityId::new(1),
            Modifier::ApplyDamage {
                source: EntityId::new(1),
                target: EntityId::new(0),
                amount: 5,
            },
        );
        queue.push(SystemId::Combat, EntityId::new(0), Event::PlayerDefeated);

        let resolver = EventResolver::new();
        let mut arena = arena();
        let all: Vec<_> = queue.envelopes().iter().collect();
        let follow_ups = resolver.resolve(&all, &mut arena);
        assert!(follow_ups.is_empty());
        assert_eq!(resolver.event_count(), 2);

        let events = resolver.take_events();
        assert_eq!(
            events[0].output().as_event(),
            Some(&Event::EnemyAggroed {
                enemy: EntityId::new(1)
            })
        );
        assert_eq!(events[1].output().as_event(), Some(&Event::PlayerDefeated));
        assert!(resolver.is_empty());
    }

    #[test]
    fn clear_discards() {
        let mut queue = OutputQueue::new(0);
        queue.push(SystemId::Combat, EntityId::new(0), Event::PlayerDefeated);
        let resolver = EventResolver::new();
        let all: Vec<_> = queue.envelopes().iter().collect();
        resolver.resolve(&all, &mut arena());
        resolver.clear();
        assert_eq!(resolver.event_count(), 0);
    }

    #[test]
    fn does_not_touch_arena() {
        let mut queue = OutputQueue::new(0);
        queue.push(
            SystemId::Player,
            EntityId::new(0),
            Event::PlayerHealed { amount: 20 },
        );
        let resolver = EventResolver::new();
        let mut arena = arena();
        let all: Vec<_> = queue.envelopes().iter().collect();
        resolver.resolve(&all, &mut arena);
        assert_eq!(arena.player().combatant().health().current(), 100);
    }
}
