//! Error types for the simulation core.
//!
//! Two families exist:
//! - [`ConfigError`]: invalid configuration or setup data. Raised at
//!   construction time, before any frame is simulated.
//! - [`SimError`]: misuse of the run lifecycle (stepping before `start`,
//!   nonsense frame deltas).
//!
//! Out-of-bounds grid queries and lookups of entities that were already
//! pruned are deliberately *not* errors; see [`crate::grid`] and
//! [`crate::resolver`].

use thiserror::Error;

/// Invalid configuration or setup data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The grid has no rows or no columns.
    #[error("tile grid is empty")]
    EmptyGrid,

    /// A grid row differs in length from the first row.
    #[error("tile grid is not rectangular: row {row} has {found} tiles, expected {expected}")]
    NonRectangularGrid {
        /// Index of the offending row
        row: usize,
        /// Length of row 0
        expected: usize,
        /// Length of the offending row
        found: usize,
    },

    /// Tile size must be finite and strictly positive.
    #[error("invalid tile size {0}")]
    InvalidTileSize(f32),

    /// A value that must be non-negative was negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Name of the configuration field
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// A value that must be strictly positive was zero or negative.
    #[error("{field} must be positive (got {value})")]
    NonPositive {
        /// Name of the configuration field
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// A value that must be finite was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// Name of the configuration field
        field: &'static str,
    },

    /// A projectile was requested with a zero-length direction.
    #[error("projectile direction must be non-zero")]
    ZeroDirection,

    /// A spawn position overlaps blocked terrain.
    #[error("spawn at ({x}, {y}) overlaps blocked terrain")]
    SpawnBlocked {
        /// Requested x coordinate
        x: f32,
        /// Requested y coordinate
        y: f32,
    },

    /// A random spawn was requested but the grid has no walkable tile.
    #[error("no walkable tile available for a random spawn")]
    NoFreeTile,

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the run lifecycle.
#[derive(Debug, Error)]
pub enum SimError {
    /// `step` or a spawn request was issued before `start`.
    #[error("simulation has not been started")]
    NotStarted,

    /// The frame delta was negative or not finite.
    #[error("invalid elapsed time {0} ms")]
    InvalidElapsed(f32),

    /// Setup data was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Returns `Ok(value)` if `value` is finite and non-negative.
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative {
            field,
            value: f64::from(value),
        });
    }
    Ok(value)
}

/// Returns `Ok(value)` if `value` is finite and strictly positive.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive {
            field,
            value: f64::from(value),
        });
    }
    Ok(value)
}

/// Integer counterpart of [`non_negative`] for health and damage values.
pub(crate) fn non_negative_int(field: &'static str, value: i32) -> Result<i32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::Negative {
            field,
            value: f64::from(value),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_accepts_zero_and_positive() {
        assert_eq!(non_negative("speed", 0.0).unwrap(), 0.0);
        assert_eq!(non_negative("speed", 2.5).unwrap(), 2.5);
    }

    #[test]
    fn non_negative_rejects_negative() {
        let err = non_negative("damage", -1.0).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "damage", .. }));
    }

    #[test]
    fn non_negative_rejects_nan() {
        let err = non_negative("radius", f32::NAN).unwrap_err();
        assert!(matches!(err, ConfigError::NonFinite { field: "radius" }));
    }

    #[test]
    fn positive_rejects_zero() {
        let err = positive("scale", 0.0).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "scale", .. }));
        assert!(positive("scale", f32::INFINITY).is_err());
    }

    #[test]
    fn non_negative_int_bounds() {
        assert_eq!(non_negative_int("damage", 0).unwrap(), 0);
        assert!(non_negative_int("damage", -3).is_err());
    }

    #[test]
    fn display_messages() {
        let err = ConfigError::NonRectangularGrid {
            row: 2,
            expected: 5,
            found: 4,
        };
        assert_eq!(
            err.to_string(),
            "tile grid is not rectangular: row 2 has 4 tiles, expected 5"
        );
        assert_eq!(SimError::NotStarted.to_string(), "simulation has not been started");
    }

    #[test]
    fn config_error_converts_into_sim_error() {
        let err: SimError = ConfigError::ZeroDirection.into();
        assert!(matches!(err, SimError::Config(ConfigError::ZeroDirection)));
    }
}
