//! The two directions of travel across the driveway.

use std::fmt;

/// Which way a lizard is crossing.
///
/// A lizard's outbound leg is always `Forward` (sago palm → monkey grass,
/// where the food is) and its return leg is always `Backward`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Sago palm → monkey grass.
    Forward,
    /// Monkey grass → sago palm.
    Backward,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Backward];

    /// The direction of oncoming traffic.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Human-readable route, as printed in traces and violation reports.
    pub fn route(self) -> &'static str {
        match self {
            Direction::Forward => "sago -> monkey grass",
            Direction::Backward => "monkey grass -> sago",
        }
    }

    /// The place a lizard arrives at after crossing in this direction.
    pub fn destination(self) -> &'static str {
        match self {
            Direction::Forward => "monkey grass",
            Direction::Backward => "sago",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}
