//! Cardinal sides shared by flora growth and part connections.

use serde::{Deserialize, Serialize};

/// Cardinal side of a tile or part. `y` grows south (downwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Towards the surface.
    North = 0,
    /// Towards `+x`.
    East = 1,
    /// Away from the surface.
    South = 2,
    /// Towards `-x`.
    West = 3,
}

impl Side {
    /// All sides in growth order.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Index in `0..4`.
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_growth_order() {
        for (i, side) in Side::ALL.into_iter().enumerate() {
            assert_eq!(side.index(), i);
        }
    }
}
