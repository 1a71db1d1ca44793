//! The container for one run's world state.
//!
//! An [`Arena`] owns everything a frame mutates: the player, the enemy and
//! projectile rosters, the id counter and the tick counter. It shares the
//! read-only [`TileGrid`] through an `Arc`.
//!
//! # Ordering
//!
//! Enemies and projectiles live in `Vec`s in spawn order. Ids are assigned
//! monotonically, so iteration order is also id order. Removal goes through
//! [`Arena::prune`], which uses `retain` and never skips or revisits an entry.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gloomcrawl_core::arena::Arena;
//! use gloomcrawl_core::config::SimConfig;
//! use gloomcrawl_core::entity::{EnemyKind, EntityId};
//! use gloomcrawl_core::grid::TileGrid;
//! use glam::Vec2;
//!
//! let config = SimConfig::default();
//! let grid = Arc::new(TileGrid::walled_room(8, 8, config.tile_size()).unwrap());
//! let mut arena = Arena::new(grid, Vec2::new(32.0, 32.0), &config).unwrap();
//!
//! let enemy = arena
//!     .spawn_enemy(Vec2::new(96.0, 96.0), EnemyKind::Skeleton, &config, 1.0)
//!     .unwrap();
//!
//! assert_eq!(arena.player().id(), EntityId::new(0));
//! assert_eq!(enemy, EntityId::new(1));
//! assert_eq!(arena.entity_count(), 2);
//! ```

use glam::Vec2;
use std::sync::Arc;
use tracing::debug;

use crate::collision::{Aabb, CollisionResolver};
use crate::config::SimConfig;
use crate::entity::{
    Combatant, Enemy, EnemyKind, EntityId, EntityTag, Player, Projectile, RemovalReason,
};
use crate::error::ConfigError;
use crate::grid::TileGrid;

/// What [`Arena::prune`] removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pruned {
    /// Dead enemies, in roster order.
    pub enemies: Vec<(EntityId, EnemyKind)>,
    /// Marked projectiles and why they were marked.
    pub projectiles: Vec<(EntityId, RemovalReason)>,
}

/// World state of one run.
#[derive(Debug, Clone)]
pub struct Arena {
    grid: Arc<TileGrid>,
    collision: CollisionResolver,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    /// Next id to hand out. The player always holds id 0.
    next_id: u64,
    tick: u64,
}

impl Arena {
    /// Creates an arena holding only the player at `player_spawn`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SpawnBlocked`] if the player's box overlaps terrain.
    /// - Any error from [`Player::spawn`].
    pub fn new(
        grid: Arc<TileGrid>,
        player_spawn: Vec2,
        config: &SimConfig,
    ) -> Result<Self, ConfigError> {
        let collision = CollisionResolver::new(config.strict_sampling);
        let player = Player::spawn(EntityId::new(0), player_spawn, config)?;
        Self::check_spawn(&collision, &grid, player.combatant().aabb())?;
        Ok(Self {
            grid,
            collision,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_id: 1,
            tick: 0,
        })
    }

    fn check_spawn(
        collision: &CollisionResolver,
        grid: &TileGrid,
        body: Aabb,
    ) -> Result<(), ConfigError> {
        if collision.can_occupy(&body, grid) {
            Ok(())
        } else {
            Err(ConfigError::SpawnBlocked {
                x: body.min.x,
                y: body.min.y,
            })
        }
    }

    /// Hands out the next entity id.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns an enemy of `kind` at `position`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SpawnBlocked`] if the enemy's box overlaps terrain.
    /// - Any error from [`Enemy::spawn`].
    ///
    /// No id is consumed when spawning fails.
    pub fn spawn_enemy(
        &mut self,
        position: Vec2,
        kind: EnemyKind,
        config: &SimConfig,
        patrol_direction: f32,
    ) -> Result<EntityId, ConfigError> {
        let id = EntityId::new(self.next_id);
        let enemy = Enemy::spawn(id, position, kind, config, patrol_direction)?;
        Self::check_spawn(&self.collision, &self.grid, enemy.combatant().aabb())?;
        self.next_id += 1;
        debug!(%id, %kind, x = position.x, y = position.y, "enemy spawned");
        self.enemies.push(enemy);
        Ok(id)
    }

    /// Adds a projectile built by the projectile system.
    pub fn push_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Shared terrain.
    #[must_use]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Collision policy for this run.
    #[must_use]
    pub const fn collision(&self) -> &CollisionResolver {
        &self.collision
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Splits the arena into the pieces a movement pass needs at once.
    pub fn player_and_terrain(&mut self) -> (&mut Player, &TileGrid, &CollisionResolver) {
        (&mut self.player, &self.grid, &self.collision)
    }

    /// Splits the arena for the enemy behavior pass.
    pub fn enemies_and_terrain(
        &mut self,
    ) -> (&mut [Enemy], &Player, &TileGrid, &CollisionResolver) {
        (&mut self.enemies, &self.player, &self.grid, &self.collision)
    }

    /// Splits the arena for the projectile impact pass.
    pub fn projectiles_and_enemies_mut(&mut self) -> (&mut [Projectile], &mut [Enemy]) {
        (&mut self.projectiles, &mut self.enemies)
    }

    /// Live enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Mutable enemies in spawn order.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Looks up an enemy by id.
    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Looks up an enemy by id, mutably.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    /// In-flight projectiles in spawn order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mutable projectiles in spawn order.
    pub fn projectiles_mut(&mut self) -> &mut [Projectile] {
        &mut self.projectiles
    }

    /// Looks up a projectile by id.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id() == id)
    }

    /// Combatant state of the player or an enemy.
    #[must_use]
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        if id == self.player.id() {
            return Some(self.player.combatant());
        }
        self.enemy(id).map(Enemy::combatant)
    }

    /// Mutable combatant state of the player or an enemy.
    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        if id == self.player.id() {
            return Some(self.player.combatant_mut());
        }
        self.enemy_mut(id).map(Enemy::combatant_mut)
    }

    /// Classifies an id, or `None` if nothing live holds it.
    #[must_use]
    pub fn tag_of(&self, id: EntityId) -> Option<EntityTag> {
        if id == self.player.id() {
            Some(EntityTag::Player)
        } else if let Some(enemy) = self.enemy(id) {
            Some(EntityTag::Enemy(enemy.kind()))
        } else {
            self.projectile(id).map(|_| EntityTag::Projectile)
        }
    }

    /// Number of live entities, player included.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        1 + self.enemies.len() + self.projectiles.len()
    }

    /// Current tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Drops every marked projectile and every enemy at or below zero health.
    pub fn prune(&mut self) -> Pruned {
        let mut pruned = Pruned::default();
        self.enemies.retain(|enemy| {
            let alive = enemy.combatant().is_alive();
            if !alive {
                pruned.enemies.push((enemy.id(), enemy.kind()));
            }
            alive
        });
        self.projectiles.retain(|projectile| match projectile.marked() {
            Some(reason) => {
                pruned.projectiles.push((projectile.id(), reason));
                false
            }
            None => true,
        });
        pruned
    }
}
