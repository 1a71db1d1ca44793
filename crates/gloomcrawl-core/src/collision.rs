//! Box-versus-grid collision.
//!
//! Actors are axis-aligned boxes covering the half-open span
//! `[x, x + w) × [y, y + h)`. Whether a box may occupy a position is decided
//! by sampling grid tiles at a handful of points on the box outline:
//!
//! - [`SamplePattern::Corners`]: the four corners. The far corners are taken
//!   at `x + w - 1` / `y + h - 1` so a box resting exactly on a tile boundary
//!   does not register the neighbouring tile.
//! - [`SamplePattern::CornersAndEdges`]: the corners plus points along each
//!   edge no more than one tile apart (the midpoints, for boxes up to two
//!   tiles). A box larger than one tile can otherwise straddle a one-tile
//!   obstacle between two samples and cut through it.
//!
//! Movement is resolved one axis at a time (X, then Y from the already
//! updated position) so actors slide along walls instead of stopping dead.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::collision::{Aabb, CollisionResolver};
//! use gloomcrawl_core::grid::TileGrid;
//! use glam::Vec2;
//!
//! let grid = TileGrid::walled_room(6, 6, 32.0).unwrap();
//! let resolver = CollisionResolver::default();
//! let body = Aabb::new(Vec2::new(32.0, 32.0), Vec2::splat(32.0));
//!
//! // Pushing diagonally into the top-left corner: both axes blocked.
//! let outcome = resolver.resolve_move(body, Vec2::new(-1.0, -1.0), &grid);
//! assert!(outcome.blocked_x && outcome.blocked_y);
//!
//! // Diagonal along the top wall: X slides, Y is blocked.
//! let outcome = resolver.resolve_move(body, Vec2::new(1.0, -1.0), &grid);
//! assert_eq!(outcome.position, Vec2::new(33.0, 32.0));
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;

// =============================================================================
// Aabb
// =============================================================================

/// Axis-aligned box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Aabb {
    /// Creates a box at `min` with the given size.
    #[must_use]
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Returns the same box moved to `min`.
    #[must_use]
    pub const fn at(self, min: Vec2) -> Self {
        Self { min, size: self.size }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Largest point still inside the half-open box.
    fn inner_max(&self) -> Vec2 {
        self.min + self.size - Vec2::ONE
    }
}

// =============================================================================
// Sampling
// =============================================================================

/// Which outline points are tested against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplePattern {
    /// Four corners.
    Corners,
    /// Four corners plus edge points at most one tile apart.
    CornersAndEdges,
}

impl SamplePattern {
    /// The weakest pattern that is still sound for a box on this grid.
    ///
    /// Corner sampling only covers every overlapped tile when the box is no
    /// wider and no taller than a tile.
    #[must_use]
    pub fn required_for(aabb: &Aabb, tile_size: f32) -> Self {
        if aabb.size.x > tile_size || aabb.size.y > tile_size {
            Self::CornersAndEdges
        } else {
            Self::Corners
        }
    }

    /// Returns the world points to sample for `aabb` on a grid of
    /// `tile_size` tiles.
    ///
    /// Edge samples split each edge into equal segments no longer than a
    /// tile, with at least the midpoint, so no tile along the outline falls
    /// between two samples whatever the box size.
    #[must_use]
    pub fn points(self, aabb: &Aabb, tile_size: f32) -> Vec<Vec2> {
        let lo = aabb.min;
        let hi = aabb.inner_max();
        let mut points = vec![
            lo,
            Vec2::new(hi.x, lo.y),
            Vec2::new(lo.x, hi.y),
            hi,
        ];
        if self == Self::CornersAndEdges {
            let span = hi - lo;
            for x in edge_offsets(span.x, tile_size) {
                points.push(Vec2::new(lo.x + x, lo.y));
                points.push(Vec2::new(lo.x + x, hi.y));
            }
            for y in edge_offsets(span.y, tile_size) {
                points.push(Vec2::new(lo.x, lo.y + y));
                points.push(Vec2::new(hi.x, lo.y + y));
            }
        }
        points
    }
}

/// Interior offsets splitting `span` into segments of at most `tile_size`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn edge_offsets(span: f32, tile_size: f32) -> impl Iterator<Item = f32> {
    let segments = if tile_size > 0.0 {
        ((span / tile_size).ceil() as u32).max(2)
    } else {
        2
    };
    (1..segments).map(move |i| span * i as f32 / segments as f32)
}

/// Returns true if `aabb` may occupy its position on `grid`.
///
/// Uses [`SamplePattern::required_for`] to pick the sampling density.
#[must_use]
pub fn can_occupy(aabb: &Aabb, grid: &TileGrid) -> bool {
    can_occupy_with(aabb, grid, SamplePattern::required_for(aabb, grid.tile_size()))
}

/// Returns true if every sampled point of `aabb` lies on floor.
#[must_use]
pub fn can_occupy_with(aabb: &Aabb, grid: &TileGrid, pattern: SamplePattern) -> bool {
    pattern
        .points(aabb, grid.tile_size())
        .into_iter()
        .all(|point| !grid.is_blocked_at(point))
}

// =============================================================================
// CollisionResolver
// =============================================================================

/// Result of an axis-separated move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Final top-left position.
    pub position: Vec2,
    /// X displacement was non-zero and applied.
    pub moved_x: bool,
    /// Y displacement was non-zero and applied.
    pub moved_y: bool,
    /// X displacement was non-zero and rejected.
    pub blocked_x: bool,
    /// Y displacement was non-zero and rejected.
    pub blocked_y: bool,
}

impl MoveOutcome {
    /// True if either axis moved.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved_x || self.moved_y
    }
}

/// Decides whether actor moves are blocked by terrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResolver {
    strict: bool,
}

impl CollisionResolver {
    /// Creates a resolver. With `strict` set, every box is sampled with
    /// [`SamplePattern::CornersAndEdges`].
    #[must_use]
    pub const fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Pattern used for `aabb` on `grid`.
    #[must_use]
    pub fn pattern_for(&self, aabb: &Aabb, grid: &TileGrid) -> SamplePattern {
        if self.strict {
            SamplePattern::CornersAndEdges
        } else {
            SamplePattern::required_for(aabb, grid.tile_size())
        }
    }

    /// Returns true if `aabb` may occupy its position.
    #[must_use]
    pub fn can_occupy(&self, aabb: &Aabb, grid: &TileGrid) -> bool {
        can_occupy_with(aabb, grid, self.pattern_for(aabb, grid))
    }

    /// Moves `aabb` by `dx` along X only. Returns the new box, or `None`
    /// if the destination or any tile crossed on the way is blocked.
    #[must_use]
    pub fn try_axis_x(&self, aabb: Aabb, dx: f32, grid: &TileGrid) -> Option<Aabb> {
        self.sweep(aabb, Vec2::new(dx, 0.0), grid)
    }

    /// Moves `aabb` by `dy` along Y only. Returns the new box, or `None`
    /// if the destination or any tile crossed on the way is blocked.
    #[must_use]
    pub fn try_axis_y(&self, aabb: Aabb, dy: f32, grid: &TileGrid) -> Option<Aabb> {
        self.sweep(aabb, Vec2::new(0.0, dy), grid)
    }

    /// Checks a single-axis move in sub-steps shorter than a tile, so a
    /// scaled step longer than a tile cannot jump over a one-tile wall.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn sweep(&self, aabb: Aabb, delta: Vec2, grid: &TileGrid) -> Option<Aabb> {
        let destination = aabb.at(aabb.min + delta);
        if !self.can_occupy(&destination, grid) {
            return None;
        }
        // The destination is inside the grid, so the sub-step count is
        // bounded by the grid's extent in tiles.
        let tile = grid.tile_size();
        let max_step = if tile > 1.0 { tile - 1.0 } else { tile.max(f32::EPSILON) };
        let steps = (delta.abs().max_element() / max_step).ceil() as u32;
        for i in 1..steps {
            let partial = aabb.at(aabb.min + delta * (i as f32 / steps as f32));
            if !self.can_occupy(&partial, grid) {
                return None;
            }
        }
        Some(destination)
    }

    /// Applies `delta` X-first, then Y from the updated position.
    #[must_use]
    pub fn resolve_move(&self, aabb: Aabb, delta: Vec2, grid: &TileGrid) -> MoveOutcome {
        let mut current = aabb;
        let mut outcome = MoveOutcome {
            position: aabb.min,
            moved_x: false,
            moved_y: false,
            blocked_x: false,
            blocked_y: false,
        };

        if delta.x != 0.0 {
            match self.try_axis_x(current, delta.x, grid) {
                Some(next) => {
                    current = next;
                    outcome.moved_x = true;
                }
                None => outcome.blocked_x = true,
            }
        }
        if delta.y != 0.0 {
            match self.try_axis_y(current, delta.y, grid) {
                Some(next) => {
                    current = next;
                    outcome.moved_y = true;
                }
                None => outcome.blocked_y = true,
            }
        }

        outcome.position = current.min;
        outcome
    }
}

// =============================================================================
// Tests
// =============================================================================
