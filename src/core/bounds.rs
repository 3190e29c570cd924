use crate::core::{Coordinate, Rect};

/// Visible index window plus Y value range.
///
/// X and Y equality are exposed separately because axis-label layers react to
/// index changes only while value layers react to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<Y: Coordinate> {
    pub min_x_index: usize,
    pub max_x_index: usize,
    pub min_y: Y,
    pub max_y: Y,
}

impl<Y: Coordinate> Bounds<Y> {
    #[must_use]
    pub fn new(min_x_index: usize, max_x_index: usize, min_y: Y, max_y: Y) -> Self {
        Self {
            min_x_index,
            max_x_index,
            min_y,
            max_y,
        }
    }

    #[must_use]
    pub fn x_equals(&self, other: &Self) -> bool {
        self.min_x_index == other.min_x_index && self.max_x_index == other.max_x_index
    }

    #[must_use]
    pub fn y_equals(&self, other: &Self) -> bool {
        self.min_y.compare_to(&other.min_y).is_eq() && self.max_y.compare_to(&other.max_y).is_eq()
    }

    #[must_use]
    pub fn with_x(mut self, min_x_index: usize, max_x_index: usize) -> Self {
        self.min_x_index = min_x_index;
        self.max_x_index = max_x_index;
        self
    }

    #[must_use]
    pub fn with_y(mut self, min_y: Y, max_y: Y) -> Self {
        self.min_y = min_y;
        self.max_y = max_y;
        self
    }

    /// Number of indices between the window edges (`max - min`).
    #[must_use]
    pub fn x_span(&self) -> usize {
        self.max_x_index - self.min_x_index
    }

    #[must_use]
    pub fn y_span(&self) -> Y {
        self.min_y.distance_to(self.max_y)
    }

    /// Pixel-mapping view of these bounds over `rect`.
    #[must_use]
    pub fn projection(&self, rect: Rect) -> Projection<Y> {
        Projection { bounds: *self, rect }
    }
}

/// Maps indices and values to pixels for one bounds snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection<Y: Coordinate> {
    bounds: Bounds<Y>,
    rect: Rect,
}

impl<Y: Coordinate> Projection<Y> {
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[must_use]
    pub fn bounds(&self) -> &Bounds<Y> {
        &self.bounds
    }

    /// X pixel of a (possibly fractional) index; a one-point window maps to the center.
    #[must_use]
    pub fn index_to_x(&self, index: f64) -> f64 {
        let span = self.bounds.x_span();
        if span == 0 {
            return self.rect.center_x();
        }
        let ratio = (index - self.bounds.min_x_index as f64) / span as f64;
        self.rect.left() + ratio * self.rect.width
    }

    /// Inverse of [`Self::index_to_x`], unclamped.
    #[must_use]
    pub fn x_to_index(&self, px: f64) -> f64 {
        let span = self.bounds.x_span();
        if span == 0 || self.rect.width <= 0.0 {
            return self.bounds.min_x_index as f64;
        }
        self.bounds.min_x_index as f64 + (px - self.rect.left()) / self.rect.width * span as f64
    }

    /// Left edge and width of the bar slot owning `index`.
    #[must_use]
    pub fn bar_slot(&self, index: usize) -> (f64, f64) {
        let slots = (self.bounds.x_span() + 1) as f64;
        let width = self.rect.width / slots;
        let left = self.rect.left() + (index as f64 - self.bounds.min_x_index as f64) * width;
        (left, width)
    }

    /// Y pixel of `value`; a zero-height range maps to the vertical center.
    #[must_use]
    pub fn value_to_y(&self, value: Y) -> f64 {
        let ratio = self.value_ratio(value);
        self.rect.bottom() - ratio * self.rect.height
    }

    /// Position of `value` inside the Y range (`0.0` at min, `1.0` at max).
    #[must_use]
    pub fn value_ratio(&self, value: Y) -> f64 {
        let span = self.bounds.y_span();
        if span == Y::zero() {
            return 0.5;
        }
        self.bounds.min_y.distance_to(value).fraction_of(span)
    }
}
