use std::cmp::Ordering;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// A single totally-ordered axis value.
///
/// All chart math (bounds, stacking, interpolation, pixel mapping) is written
/// against this trait only, so one engine instance works over counts, money,
/// timestamps or any other scalar with the same arithmetic shape.
///
/// Implementations must keep `a.add(a.distance_to(b)) == b` for every pair of
/// values (exactly for integral/decimal representations, up to float rounding
/// for [`Real`]).
pub trait Coordinate: Copy + Ord + Debug + Send + Sync + 'static {
    /// Additive identity.
    fn zero() -> Self;

    fn add(self, other: Self) -> Self;

    /// Signed difference `other - self`.
    fn distance_to(self, other: Self) -> Self;

    /// Scalar multiple `self * ratio`.
    fn get_part(self, ratio: f64) -> Self;

    /// `self / whole` as a plain ratio; `0.0` when `whole` is zero.
    fn fraction_of(self, whole: Self) -> f64;

    fn to_f64(self) -> f64;

    /// Compact tick text (`1.2K`, `Jan 5`).
    fn axis_string(&self) -> String;

    /// Exact value text used by the detail overlay rows.
    fn full_string(&self) -> String;

    /// Title text of the detail overlay.
    fn header_string(&self) -> String {
        self.full_string()
    }

    /// Long-form text used when a single X value is expanded by the host.
    fn expanded_string(&self) -> String {
        self.full_string()
    }

    fn compare_to(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    /// Writes `self + other` into `out` without producing a temporary owned by the caller.
    fn add_into(self, other: Self, out: &mut Self) {
        *out = self.add(other);
    }

    /// Writes `other - self` into `out`.
    fn distance_into(self, other: Self, out: &mut Self) {
        *out = self.distance_to(other);
    }

    /// Linear interpolation `self + (target - self) * progress`.
    fn lerp(self, target: Self, progress: f64) -> Self {
        self.add(self.distance_to(target).get_part(progress))
    }
}

/// Integer count (views, messages, users).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Count(pub i64);

/// Floating-point measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Real(pub OrderedFloat<f64>);

/// Exact decimal amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(pub Decimal);

/// UTC calendar timestamp stored as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Real {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }
}

impl Timestamp {
    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self(time.timestamp_millis())
    }

    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    fn format_with(self, pattern: &str) -> String {
        match self.to_datetime() {
            Some(time) => time.format(pattern).to_string(),
            None => self.0.to_string(),
        }
    }
}

impl Coordinate for Count {
    fn zero() -> Self {
        Self(0)
    }

    fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    fn distance_to(self, other: Self) -> Self {
        Self(other.0.wrapping_sub(self.0))
    }

    fn get_part(self, ratio: f64) -> Self {
        Self((self.0 as f64 * ratio).round() as i64)
    }

    fn fraction_of(self, whole: Self) -> f64 {
        if whole.0 == 0 {
            0.0
        } else {
            self.0 as f64 / whole.0 as f64
        }
    }

    fn to_f64(self) -> f64 {
        self.0 as f64
    }

    fn axis_string(&self) -> String {
        abbreviate(self.0 as f64)
    }

    fn full_string(&self) -> String {
        group_thousands(self.0)
    }
}

impl Coordinate for Real {
    fn zero() -> Self {
        Self::new(0.0)
    }

    fn add(self, other: Self) -> Self {
        Self::new(self.0.0 + other.0.0)
    }

    fn distance_to(self, other: Self) -> Self {
        Self::new(other.0.0 - self.0.0)
    }

    fn get_part(self, ratio: f64) -> Self {
        Self::new(self.0.0 * ratio)
    }

    fn fraction_of(self, whole: Self) -> f64 {
        if whole.0.0 == 0.0 {
            0.0
        } else {
            self.0.0 / whole.0.0
        }
    }

    fn to_f64(self) -> f64 {
        self.0.0
    }

    fn axis_string(&self) -> String {
        abbreviate(self.0.0)
    }

    fn full_string(&self) -> String {
        trim_decimals(format!("{:.4}", self.0.0))
    }
}

impl Coordinate for Money {
    fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    fn distance_to(self, other: Self) -> Self {
        Self(other.0.saturating_sub(self.0))
    }

    fn get_part(self, ratio: f64) -> Self {
        let factor = Decimal::from_f64(ratio).unwrap_or(Decimal::ZERO);
        Self(self.0.saturating_mul(factor))
    }

    fn fraction_of(self, whole: Self) -> f64 {
        if whole.0.is_zero() {
            return 0.0;
        }
        self.0
            .checked_div(whole.0)
            .and_then(|ratio| ratio.to_f64())
            .unwrap_or(0.0)
    }

    fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    fn axis_string(&self) -> String {
        abbreviate(self.to_f64())
    }

    fn full_string(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl Coordinate for Timestamp {
    fn zero() -> Self {
        Self(0)
    }

    fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    fn distance_to(self, other: Self) -> Self {
        Self(other.0.wrapping_sub(self.0))
    }

    fn get_part(self, ratio: f64) -> Self {
        Self((self.0 as f64 * ratio).round() as i64)
    }

    fn fraction_of(self, whole: Self) -> f64 {
        if whole.0 == 0 {
            0.0
        } else {
            self.0 as f64 / whole.0 as f64
        }
    }

    fn to_f64(self) -> f64 {
        self.0 as f64
    }

    fn axis_string(&self) -> String {
        self.format_with("%b %-d")
    }

    fn full_string(&self) -> String {
        self.format_with("%b %-d, %Y")
    }

    fn header_string(&self) -> String {
        self.format_with("%a, %b %-d %Y")
    }

    fn expanded_string(&self) -> String {
        self.format_with("%-d %B %Y")
    }
}

/// `1234567 -> "1.2M"`, `4500 -> "4.5K"`, `12 -> "12"`.
fn abbreviate(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000_000.0 {
        format!("{}B", trim_decimals(format!("{:.1}", value / 1_000_000_000.0)))
    } else if magnitude >= 1_000_000.0 {
        format!("{}M", trim_decimals(format!("{:.1}", value / 1_000_000.0)))
    } else if magnitude >= 1_000.0 {
        format!("{}K", trim_decimals(format!("{:.1}", value / 1_000.0)))
    } else {
        trim_decimals(format!("{value:.2}"))
    }
}

fn trim_decimals(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    grouped
}
