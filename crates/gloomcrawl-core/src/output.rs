//! Outputs emitted by systems and consumed by resolvers.
//!
//! Systems never apply damage or spawn entities directly. They describe what
//! should happen as an [`Output`], and the resolution phase applies it:
//!
//! - [`Command`]: actions that need world context to carry out (a melee
//!   strike, a projectile spawn)
//! - [`Modifier`]: value changes on one target (damage, healing)
//! - [`Event`]: notifications of things that happened, recorded for the
//!   frame result and the log
//!
//! Every output travels in an [`OutputEnvelope`] that records which system
//! and entity emitted it, and in what order.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::entity::EntityId;
//! use gloomcrawl_core::output::{Modifier, Output, OutputEnvelope, OutputKind, SystemId};
//!
//! let envelope = OutputEnvelope::new(
//!     Output::Modifier(Modifier::ApplyDamage {
//!         source: EntityId::new(3),
//!         target: EntityId::new(0),
//!         amount: 10,
//!     }),
//!     SystemId::Behavior,
//!     EntityId::new(3),
//!     12,
//!     0,
//! );
//!
//! assert_eq!(envelope.kind(), OutputKind::Modifier);
//! assert_eq!(envelope.output().target(), Some(EntityId::new(0)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{EnemyKind, EntityId};

// =============================================================================
// Output Categories
// =============================================================================

/// Actions that need world context to carry out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Strike every enemy within `radius` of the source's center.
    MeleeStrike {
        /// Striking entity
        source: EntityId,
        /// Center-to-center reach (world units)
        radius: f32,
        /// Damage per enemy hit
        damage: i32,
    },
    /// Spawn a projectile beside the source's box.
    SpawnProjectile {
        /// Casting entity
        source: EntityId,
        /// `1.0` to fire right, `-1.0` to fire left
        direction_sign: f32,
    },
}

impl Command {
    /// Entity issuing the command.
    #[must_use]
    pub const fn source(&self) -> EntityId {
        match self {
            Self::MeleeStrike { source, .. } | Self::SpawnProjectile { source, .. } => *source,
        }
    }
}

/// Value changes on a single target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    /// Subtract health.
    ApplyDamage {
        /// Entity dealing the damage
        source: EntityId,
        /// Entity to damage
        target: EntityId,
        /// Damage amount
        amount: i32,
    },
    /// Restore health, capped at the target's maximum.
    ApplyHealing {
        /// Entity to heal
        target: EntityId,
        /// Healing amount
        amount: i32,
    },
}

impl Modifier {
    /// Entity the modifier applies to.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::ApplyDamage { target, .. } | Self::ApplyHealing { target, .. } => *target,
        }
    }
}

/// Notifications of things that happened during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An enemy noticed the player and started chasing.
    EnemyAggroed {
        /// The enemy
        enemy: EntityId,
    },
    /// A chasing enemy lost interest and resumed patrolling.
    EnemyDisengaged {
        /// The enemy
        enemy: EntityId,
    },
    /// The player took damage.
    PlayerHit {
        /// Entity that dealt the damage
        source: EntityId,
        /// Damage applied
        amount: i32,
        /// Player health afterwards (may be negative)
        remaining: i32,
    },
    /// The player was healed.
    PlayerHealed {
        /// Health actually restored
        amount: i32,
    },
    /// An enemy took damage.
    EnemyHit {
        /// The enemy
        enemy: EntityId,
        /// Player or projectile that dealt the damage
        source: EntityId,
        /// Damage applied
        amount: i32,
    },
    /// An enemy's health reached zero and it was removed.
    EnemyKilled {
        /// The enemy
        enemy: EntityId,
        /// Its kind
        kind: EnemyKind,
    },
    /// A melee strike fired.
    MeleeSwung {
        /// Striking entity
        source: EntityId,
        /// Number of enemies hit
        hits: usize,
    },
    /// A projectile entered play.
    ProjectileSpawned {
        /// The projectile
        projectile: EntityId,
        /// Casting entity
        source: EntityId,
    },
    /// A projectile's animation ran out.
    ProjectileExpired {
        /// The projectile
        projectile: EntityId,
    },
    /// A projectile hit one or more enemies.
    ProjectileStruck {
        /// The projectile
        projectile: EntityId,
        /// Number of enemies hit
        hits: usize,
    },
    /// The player's health reached zero; the run is over.
    PlayerDefeated,
}

impl Event {
    /// The entity the event is mainly about, if any.
    #[must_use]
    pub const fn primary_entity(&self) -> Option<EntityId> {
        match self {
            Self::EnemyAggroed { enemy }
            | Self::EnemyDisengaged { enemy }
            | Self::EnemyHit { enemy, .. }
            | Self::EnemyKilled { enemy, .. } => Some(*enemy),
            Self::PlayerHit { source, .. } | Self::MeleeSwung { source, .. } => Some(*source),
            Self::ProjectileSpawned { projectile, .. }
            | Self::ProjectileExpired { projectile }
            | Self::ProjectileStruck { projectile, .. } => Some(*projectile),
            Self::PlayerHealed { .. } | Self::PlayerDefeated => None,
        }
    }
}

// =============================================================================
// Top-Level Output Enum
// =============================================================================

/// Output kind for resolver routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Command outputs
    Command,
    /// Modifier outputs
    Modifier,
    /// Event outputs
    Event,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "Command"),
            Self::Modifier => write!(f, "Modifier"),
            Self::Event => write!(f, "Event"),
        }
    }
}

/// A system output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// A command
    Command(Command),
    /// A modifier
    Modifier(Modifier),
    /// An event
    Event(Event),
}

impl Output {
    /// Returns the kind of this output for resolver routing.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        match self {
            Self::Command(_) => OutputKind::Command,
            Self::Modifier(_) => OutputKind::Modifier,
            Self::Event(_) => OutputKind::Event,
        }
    }

    /// Returns the command if this is a command output.
    #[must_use]
    pub const fn as_command(&self) -> Option<&Command> {
        match self {
            Self::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// Returns the modifier if this is a modifier output.
    #[must_use]
    pub const fn as_modifier(&self) -> Option<&Modifier> {
        match self {
            Self::Modifier(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the event if this is an event output.
    #[must_use]
    pub const fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }

    /// Target of a modifier output.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::Modifier(m) => Some(m.target()),
            _ => None,
        }
    }
}

impl From<Command> for Output {
    fn from(cmd: Command) -> Self {
        Self::Command(cmd)
    }
}

impl From<Modifier> for Output {
    fn from(m: Modifier) -> Self {
        Self::Modifier(m)
    }
}

impl From<Event> for Output {
    fn from(e: Event) -> Self {
        Self::Event(e)
    }
}

// =============================================================================
// Output Envelope
// =============================================================================

/// The system that produced an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemId {
    /// Player controller
    Player,
    /// Enemy behavior state machine
    Behavior,
    /// Projectile system
    Projectile,
    /// Combat resolver (follow-up events)
    Combat,
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Behavior => write!(f, "behavior"),
            Self::Projectile => write!(f, "projectile"),
            Self::Combat => write!(f, "combat"),
        }
    }
}

/// An [`Output`] plus where and when it was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEnvelope {
    output: Output,
    system: SystemId,
    entity: EntityId,
    tick: u64,
    /// Position within the frame's output stream.
    sequence: u32,
}

impl OutputEnvelope {
    /// Wraps an output.
    #[must_use]
    pub const fn new(
        output: Output,
        system: SystemId,
        entity: EntityId,
        tick: u64,
        sequence: u32,
    ) -> Self {
        Self {
            output,
            system,
            entity,
            tick,
            sequence,
        }
    }

    /// The wrapped output.
    #[must_use]
    pub const fn output(&self) -> &Output {
        &self.output
    }

    /// Consumes the envelope and returns the wrapped output.
    #[must_use]
    pub fn into_output(self) -> Output {
        self.output
    }

    /// Emitting system.
    #[must_use]
    pub const fn system(&self) -> SystemId {
        self.system
    }

    /// Entity on whose behalf the output was emitted.
    #[must_use]
    pub const fn entity(&self) -> EntityId {
        self.entity
    }

    /// Tick of emission.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Sequence number within the frame.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Kind of the wrapped output.
    #[must_use]
    pub const fn kind(&self) -> OutputKind {
        self.output.kind()
    }
}

/// Collects outputs during a frame, numbering them in emission order.
#[derive(Debug, Default)]
pub struct OutputQueue {
    tick: u64,
    envelopes: Vec<OutputEnvelope>,
}

impl OutputQueue {
    /// Creates an empty queue for `tick`.
    #[must_use]
    pub const fn new(tick: u64) -> Self {
        Self {
            tick,
            envelopes: Vec::new(),
        }
    }

    /// Appends an output.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push(&mut self, system: SystemId, entity: EntityId, output: impl Into<Output>) {
        // A frame emits a handful of outputs per entity; u32 is ample.
        let sequence = self.envelopes.len() as u32;
        self.envelopes.push(OutputEnvelope::new(
            output.into(),
            system,
            entity,
            self.tick,
            sequence,
        ));
    }

    /// Number of queued outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    /// True if nothing was queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    /// Queued envelopes in emission order.
    #[must_use]
    pub fn envelopes(&self) -> &[OutputEnvelope] {
        &self.envelopes
    }

    /// Envelopes of the given kinds, in emission order.
    #[must_use]
    pub fn of_kinds(&self, kinds: &[OutputKind]) -> Vec<&OutputEnvelope> {
        self.envelopes
            .iter()
            .filter(|e| kinds.contains(&e.kind()))
            .collect()
    }

    /// Consumes the queue.
    #[must_use]
    pub fn into_envelopes(self) -> Vec<OutputEnvelope> {
        self.envelopes
    }
}

// =============================================================================
// Tests
// =============================================================================
