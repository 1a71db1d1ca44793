//! Static terrain.
//!
//! A [`TileGrid`] is a rectangular array of tile codes plus the world size of
//! one tile. Code `0` is floor; every other code blocks movement. Anything
//! outside the grid is treated as blocked, so callers never have to
//! bounds-check before asking.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::grid::TileGrid;
//!
//! let grid = TileGrid::from_rows(
//!     vec![
//!         vec![1, 1, 1],
//!         vec![1, 0, 1],
//!         vec![1, 1, 1],
//!     ],
//!     32.0,
//! )
//! .unwrap();
//!
//! assert!(!grid.is_blocked(1, 1));
//! assert!(grid.is_blocked(0, 1));
//! assert!(grid.is_blocked(-1, 5));
//! ```

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::random::RandomSource;

/// Tile code for walkable floor.
pub const FLOOR: u16 = 0;

/// Rectangular terrain grid, read-only for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    /// Row-major tile codes.
    tiles: Vec<u16>,
    tile_size: f32,
}

impl TileGrid {
    /// Builds a grid from row-major tile codes.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyGrid`] if there are no rows or the first row is
    ///   empty.
    /// - [`ConfigError::NonRectangularGrid`] if any row differs in length.
    /// - [`ConfigError::InvalidTileSize`] if `tile_size` is not a positive
    ///   finite number.
    pub fn from_rows(rows: Vec<Vec<u16>>, tile_size: f32) -> Result<Self, ConfigError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(tile_size));
        }
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find_map(|(i, r)| (r.len() != width).then_some((i, r.len())))
        {
            return Err(ConfigError::NonRectangularGrid {
                row,
                expected: width,
                found,
            });
        }

        let height = rows.len();
        let tiles = rows.into_iter().flatten().collect();
        Ok(Self {
            width,
            height,
            tiles,
            tile_size,
        })
    }

    /// Builds a `width × height` room of floor enclosed by a one-tile wall.
    ///
    /// # Errors
    ///
    /// Same as [`TileGrid::from_rows`].
    pub fn walled_room(width: usize, height: usize, tile_size: f32) -> Result<Self, ConfigError> {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                        u16::from(edge)
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows, tile_size)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// World size of one tile.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World-space extent of the grid.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Returns the tile code at `(tile_x, tile_y)`, or `None` out of bounds.
    #[must_use]
    pub fn tile(&self, tile_x: i64, tile_y: i64) -> Option<u16> {
        let x = usize::try_from(tile_x).ok()?;
        let y = usize::try_from(tile_y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x).copied()
    }

    /// Returns true if the tile is out of bounds or not floor.
    #[must_use]
    pub fn is_blocked(&self, tile_x: i64, tile_y: i64) -> bool {
        self.tile(tile_x, tile_y) != Some(FLOOR)
    }

    /// Maps a world point to the tile containing it.
    ///
    /// Returns `None` for non-finite points.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tile_at(&self, point: Vec2) -> Option<IVec2> {
        if !point.is_finite() {
            return None;
        }
        let tile = (point / self.tile_size).floor();
        // Saturating float-to-int casts keep far-away points out of bounds.
        Some(IVec2::new(tile.x as i32, tile.y as i32))
    }

    /// Returns true if the world point lies in a blocked (or outside) tile.
    #[must_use]
    pub fn is_blocked_at(&self, point: Vec2) -> bool {
        match self.tile_at(point) {
            Some(tile) => self.is_blocked(i64::from(tile.x), i64::from(tile.y)),
            None => true,
        }
    }

    /// World position of a tile's top-left corner.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tile_origin(&self, tile_x: usize, tile_y: usize) -> Vec2 {
        Vec2::new(tile_x as f32, tile_y as f32) * self.tile_size
    }

    /// Iterates the coordinates of every floor tile in row-major order.
    pub fn free_tiles(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, code)| **code == FLOOR)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    /// Picks a uniformly random floor tile and returns its world origin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoFreeTile`] if the grid has no floor.
    pub fn random_free_tile(&self, rng: &mut dyn RandomSource) -> Result<Vec2, ConfigError> {
        let free: Vec<_> = self.free_tiles().collect();
        if free.is_empty() {
            return Err(ConfigError::NoFreeTile);
        }
        let (x, y) = free[rng.pick_index(free.len())];
        Ok(self.tile_origin(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn sample_grid() -> TileGrid {
        TileGrid::from_rows(
            vec![vec![1, 1, 1, 1], vec![1, 0, 2, 1], vec![1, 0, 0, 1], vec![1, 1, 1, 1]],
            32.0,
        )
        .unwrap()
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn dimensions() {
            let grid = sample_grid();
            assert_eq!(grid.width(), 4);
            assert_eq!(grid.height(), 4);
            assert_eq!(grid.world_size(), Vec2::new(128.0, 128.0));
        }

        #[test]
        fn rejects_empty() {
            assert!(matches!(
                TileGrid::from_rows(vec![], 16.0),
                Err(ConfigError::EmptyGrid)
            ));
            assert!(matches!(
                TileGrid::from_rows(vec![vec![]], 16.0),
                Err(ConfigError::EmptyGrid)
            ));
        }

        #[test]
        fn rejects_ragged_rows() {
            let err = TileGrid::from_rows(vec![vec![0, 0, 0], vec![0, 0]], 16.0).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::NonRectangularGrid {
                    row: 1,
                    expected: 3,
                    found: 2
                }
            ));
        }

        #[test]
        fn rejects_bad_tile_size() {
            assert!(TileGrid::from_rows(vec![vec![0]], 0.0).is_err());
            assert!(TileGrid::from_rows(vec![vec![0]], f32::NAN).is_err());
        }

        #[test]
        fn walled_room_layout() {
            let grid = TileGrid::walled_room(5, 4, 16.0).unwrap();
            assert!(grid.is_blocked(0, 0));
            assert!(grid.is_blocked(4, 3));
            assert!(!grid.is_blocked(1, 1));
            assert!(!grid.is_blocked(3, 2));
            assert_eq!(grid.free_tiles().count(), 3 * 2);
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn nonzero_codes_block() {
            let grid = sample_grid();
            assert!(!grid.is_blocked(1, 1));
            assert!(grid.is_blocked(2, 1));
            assert_eq!(grid.tile(2, 1), Some(2));
        }

        #[test]
        fn out_of_bounds_blocks() {
            let grid = sample_grid();
            assert!(grid.is_blocked(-1, 1));
            assert!(grid.is_blocked(1, -1));
            assert!(grid.is_blocked(4, 1));
            assert!(grid.is_blocked(1, 4));
            assert!(grid.is_blocked(i64::MAX, i64::MIN));
            assert_eq!(grid.tile(9, 9), None);
        }

        #[test]
        fn world_points_map_to_tiles() {
            let grid = sample_grid();
            assert_eq!(grid.tile_at(Vec2::new(33.0, 40.0)), Some(IVec2::new(1, 1)));
            assert_eq!(grid.tile_at(Vec2::new(63.9, 95.9)), Some(IVec2::new(1, 2)));
            assert_eq!(grid.tile_at(Vec2::new(-0.5, 10.0)), Some(IVec2::new(-1, 0)));
            assert!(!grid.is_blocked_at(Vec2::new(40.0, 40.0)));
            assert!(grid.is_blocked_at(Vec2::new(70.0, 40.0)));
        }

        #[test]
        fn non_finite_points_are_blocked() {
            let grid = sample_grid();
            assert!(grid.is_blocked_at(Vec2::new(f32::NAN, 40.0)));
            assert!(grid.is_blocked_at(Vec2::new(40.0, f32::INFINITY)));
        }
    }

    mod free_tile_tests {
        use super::*;

        #[test]
        fn free_tiles_row_major() {
            let grid = sample_grid();
            let free: Vec<_> = grid.free_tiles().collect();
            assert_eq!(free, vec![(1, 1), (1, 2), (2, 2)]);
        }

        #[test]
        fn random_free_tile_uses_source() {
            let grid = sample_grid();
            let mut rng = ScriptedRandom::new([2, 0]);
            assert_eq!(grid.random_free_tile(&mut rng).unwrap(), Vec2::new(64.0, 64.0));
            assert_eq!(grid.random_free_tile(&mut rng).unwrap(), Vec2::new(32.0, 32.0));
        }

        #[test]
        fn random_free_tile_fails_on_solid_grid() {
            let grid = TileGrid::from_rows(vec![vec![1, 1], vec![1, 1]], 16.0).unwrap();
            let mut rng = ScriptedRandom::new([0]);
            assert!(matches!(
                grid.random_free_tile(&mut rng),
                Err(ConfigError::NoFreeTile)
            ));
        }
    }
}
