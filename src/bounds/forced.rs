use crate::core::Coordinate;

/// Caller-forced Y limits.
///
/// A forced limit only ever widens the computed range; it never cuts into
/// the data's own extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedYRange<Y: Coordinate> {
    pub min: Option<Y>,
    pub max: Option<Y>,
}

impl<Y: Coordinate> Default for ForcedYRange<Y> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<Y: Coordinate> ForcedYRange<Y> {
    #[must_use]
    pub fn new(min: Option<Y>, max: Option<Y>) -> Self {
        Self { min, max }
    }

    /// Forces the lower edge to zero (bar/area charts).
    #[must_use]
    pub fn zero_anchored() -> Self {
        Self::new(Some(Y::zero()), None)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Combines two forced ranges, keeping the wider limit on each side.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: widest(self.min, other.min, Ord::min),
            max: widest(self.max, other.max, Ord::max),
        }
    }

    #[must_use]
    pub fn apply(&self, min: Y, max: Y) -> (Y, Y) {
        let min = match self.min {
            Some(forced) if forced < min => forced,
            _ => min,
        };
        let max = match self.max {
            Some(forced) if forced > max => forced,
            _ => max,
        };
        (min, max)
    }
}

fn widest<Y: Coordinate>(left: Option<Y>, right: Option<Y>, pick: fn(Y, Y) -> Y) -> Option<Y> {
    match (left, right) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (a, b) => a.or(b),
    }
}
