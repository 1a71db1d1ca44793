//! Per-frame player input.
//!
//! The host polls its input devices and hands the simulation an [`Intent`]
//! snapshot each frame. Movement flags act while held; the action flags
//! (`CAST_PRIMARY`, `MELEE`, `CAST_HEAL`) act once per press, detected as a
//! rising edge against the previous frame's snapshot.
//!
//! # Example
//!
//! ```
//! use gloomcrawl_core::intent::Intent;
//!
//! let previous = Intent::MOVE_LEFT;
//! let current = Intent::MOVE_LEFT | Intent::MOVE_RIGHT | Intent::MELEE;
//!
//! // Right wins over left.
//! assert_eq!(current.horizontal(), 1.0);
//! assert_eq!(current.rising_edges(previous), Intent::MOVE_RIGHT | Intent::MELEE);
//! assert!(current.triggered(previous, Intent::MELEE));
//! assert!(!current.triggered(current, Intent::MELEE));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Input snapshot for one frame.
    ///
    /// Serialized as a `|`-separated flag list, e.g. `"MOVE_RIGHT | MELEE"`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Intent: u8 {
        /// Move towards negative X
        const MOVE_LEFT    = 1 << 0;
        /// Move towards positive X
        const MOVE_RIGHT   = 1 << 1;
        /// Move towards negative Y
        const MOVE_UP      = 1 << 2;
        /// Move towards positive Y
        const MOVE_DOWN    = 1 << 3;
        /// Cast the primary projectile spell
        const CAST_PRIMARY = 1 << 4;
        /// Melee strike
        const MELEE        = 1 << 5;
        /// Cast the heal spell
        const CAST_HEAL    = 1 << 6;
    }
}

impl Intent {
    /// Flags that fire once per press rather than while held.
    pub const ACTIONS: Self = Self::CAST_PRIMARY.union(Self::MELEE).union(Self::CAST_HEAL);

    /// Horizontal axis: `1.0`, `-1.0` or `0.0`. Right wins over left.
    #[must_use]
    pub const fn horizontal(self) -> f32 {
        if self.contains(Self::MOVE_RIGHT) {
            1.0
        } else if self.contains(Self::MOVE_LEFT) {
            -1.0
        } else {
            0.0
        }
    }

    /// Vertical axis: `1.0`, `-1.0` or `0.0`. Down wins over up.
    #[must_use]
    pub const fn vertical(self) -> f32 {
        if self.contains(Self::MOVE_DOWN) {
            1.0
        } else if self.contains(Self::MOVE_UP) {
            -1.0
        } else {
            0.0
        }
    }

    /// Flags set now but not in `previous`.
    #[must_use]
    pub const fn rising_edges(self, previous: Self) -> Self {
        self.difference(previous)
    }

    /// True if `flag` was pressed this frame.
    #[must_use]
    pub const fn triggered(self, previous: Self, flag: Self) -> bool {
        self.rising_edges(previous).contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_follow_priority() {
        assert_eq!(Intent::empty().horizontal(), 0.0);
        assert_eq!(Intent::MOVE_LEFT.horizontal(), -1.0);
        assert_eq!((Intent::MOVE_LEFT | Intent::MOVE_RIGHT).horizontal(), 1.0);
        assert_eq!(Intent::MOVE_UP.vertical(), -1.0);
        assert_eq!((Intent::MOVE_UP | Intent::MOVE_DOWN).vertical(), 1.0);
    }

    #[test]
    fn held_action_does_not_retrigger() {
        let held = Intent::CAST_PRIMARY;
        assert!(held.triggered(Intent::empty(), Intent::CAST_PRIMARY));
        assert!(!held.triggered(held, Intent::CAST_PRIMARY));
        assert!(held.triggered(Intent::MOVE_UP, Intent::CAST_PRIMARY));
    }

    #[test]
    fn actions_mask() {
        assert!(Intent::ACTIONS.contains(Intent::CAST_HEAL));
        assert!(!Intent::ACTIONS.intersects(Intent::MOVE_LEFT | Intent::MOVE_DOWN));
    }

    #[test]
    fn json_representation() {
        let intent = Intent::MOVE_RIGHT | Intent::MELEE;
        let json = serde_json::to_string(&intent).unwrap();
        assert_eq!(json, r#""MOVE_RIGHT | MELEE""#);
        let back: Intent = serde_json::from_str(r#""MELEE | MOVE_RIGHT""#).unwrap();
        assert_eq!(back, intent);
        let empty: Intent = serde_json::from_str(r#""""#).unwrap();
        assert!(empty.is_empty());
    }
}
