/// Which parts of a [`Bounds`](crate::core::Bounds) moved since it was last pushed.
///
/// Consumers react to the X window and the Y range independently: axis labels
/// depend only on X, grid rows only on Y, points layers on both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundsChange {
    bits: u8,
}

impl BoundsChange {
    const X: u8 = 1 << 0;
    const Y: u8 = 1 << 1;

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::X | Self::Y,
        }
    }

    #[must_use]
    pub const fn with_x(self) -> Self {
        Self {
            bits: self.bits | Self::X,
        }
    }

    #[must_use]
    pub const fn with_y(self) -> Self {
        Self {
            bits: self.bits | Self::Y,
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn x_changed(self) -> bool {
        (self.bits & Self::X) != 0
    }

    #[must_use]
    pub const fn y_changed(self) -> bool {
        (self.bits & Self::Y) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}
