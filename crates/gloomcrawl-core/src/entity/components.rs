//! Small state components shared by combatants.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Horizontal facing. Only decides which side projectiles spawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing negative X.
    Left,
    /// Facing positive X.
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal displacement, or `None` for zero.
    #[must_use]
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx < 0.0 {
            Some(Self::Left)
        } else if dx > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Integer hit points.
///
/// `current` never exceeds `max`. It may drop below zero when a blow
/// overkills; the entity is pruned (or the run defeated) before the next
/// frame, and [`Health::clamped`] is what renderers show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    /// Full health with the given maximum.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] if `max <= 0`.
    pub fn full(max: i32) -> Result<Self, ConfigError> {
        if max <= 0 {
            return Err(ConfigError::NonPositive {
                field: "max_health",
                value: f64::from(max),
            });
        }
        Ok(Self { current: max, max })
    }

    /// Current hit points, possibly negative.
    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Current hit points floored at zero.
    #[must_use]
    pub fn clamped(&self) -> i32 {
        self.current.max(0)
    }

    /// True once hit points are at or below zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    /// Subtracts `amount` (negative amounts count as zero). Returns the
    /// damage actually subtracted.
    pub fn damage(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        self.current = self.current.saturating_sub(amount);
        amount
    }

    /// Adds `amount`, capped at `max`. Returns the health actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount.max(0)).min(self.max);
        self.current - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod facing_tests {
        use super::*;

        #[test]
        fn from_dx() {
            assert_eq!(Facing::from_dx(-0.3), Some(Facing::Left));
            assert_eq!(Facing::from_dx(2.0), Some(Facing::Right));
            assert_eq!(Facing::from_dx(0.0), None);
        }

        #[test]
        fn sign_and_default() {
            assert_eq!(Facing::Left.sign(), -1.0);
            assert_eq!(Facing::default(), Facing::Right);
        }
    }

    mod health_tests {
        use super::*;

        #[test]
        fn starts_full() {
            let health = Health::full(30).unwrap();
            assert_eq!(health.current(), 30);
            assert_eq!(health.max(), 30);
            assert!(!health.is_depleted());
        }

        #[test]
        fn rejects_non_positive_max() {
            assert!(Health::full(0).is_err());
            assert!(Health::full(-4).is_err());
        }

        #[test]
        fn damage_can_overkill_but_clamps_for_display() {
            let mut health = Health::full(10).unwrap();
            assert_eq!(health.damage(15), 15);
            assert_eq!(health.current(), -5);
            assert_eq!(health.clamped(), 0);
            assert!(health.is_depleted());
        }

        #[test]
        fn negative_damage_is_ignored() {
            let mut health = Health::full(10).unwrap();
            assert_eq!(health.damage(-3), 0);
            assert_eq!(health.current(), 10);
        }

        #[test]
        fn heal_caps_at_max() {
            let mut health = Health::full(100).unwrap();
            health.damage(30);
            assert_eq!(health.heal(20), 20);
            assert_eq!(health.heal(20), 10);
            assert_eq!(health.current(), 100);
        }
    }
}
