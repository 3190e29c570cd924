use smallvec::SmallVec;

use crate::core::Coordinate;

pub type Shares = SmallVec<[f64; 8]>;

/// Splits one index's stack into per-series shares in `0.0..=1.0`.
///
/// `entries` holds each series' value and weight in declared order. Weight
/// `0.0` means hidden, `1.0` fully visible; anything between is a series
/// that is fading and contributes proportionally.
///
/// Series are processed later-to-earlier and the rounding slack lands on the
/// last one processed, i.e. the earliest-declared contributing series, so the
/// shares always sum to exactly `1.0` when anything contributes.
///
/// "The first visible series in later-to-earlier order" would instead pick the
/// last-declared series. The slack stays on the last series processed so the
/// fractional shares and [`whole_percents`] agree on one slot.
#[must_use]
pub fn split_shares<Y: Coordinate>(entries: &[(Y, f64)]) -> Shares {
    let mut shares: Shares = SmallVec::from_elem(0.0, entries.len());
    let total = entries
        .iter()
        .filter(|(_, weight)| *weight > 0.0)
        .fold(Y::zero(), |sum, (value, weight)| sum.add(value.get_part(*weight)));
    if total == Y::zero() {
        return shares;
    }

    let Some(remainder_slot) = entries.iter().position(|(_, weight)| *weight > 0.0) else {
        return shares;
    };

    let mut assigned = 0.0;
    for (slot, (value, weight)) in entries.iter().enumerate().rev() {
        if *weight <= 0.0 || slot == remainder_slot {
            continue;
        }
        let share = value.get_part(*weight).fraction_of(total);
        shares[slot] = share;
        assigned += share;
    }
    shares[remainder_slot] = (1.0 - assigned).max(0.0);
    shares
}

/// Rounds shares to whole percents that sum to exactly 100.
///
/// Uses the same remainder slot as [`split_shares`]: every other share is
/// rounded independently and the earliest non-zero slot absorbs the slack.
#[must_use]
pub fn whole_percents(shares: &[f64]) -> SmallVec<[u32; 8]> {
    let mut percents: SmallVec<[u32; 8]> = SmallVec::from_elem(0, shares.len());
    let Some(remainder_slot) = shares.iter().position(|share| *share > 0.0) else {
        return percents;
    };

    let mut assigned = 0u32;
    for (slot, share) in shares.iter().enumerate().rev() {
        if slot == remainder_slot || *share <= 0.0 {
            continue;
        }
        let percent = (share * 100.0).round() as u32;
        percents[slot] = percent;
        assigned += percent;
    }
    percents[remainder_slot] = 100u32.saturating_sub(assigned);
    percents
}

#[cfg(test)]
mod tests {
    use super::{split_shares, whole_percents};
    use crate::core::Count;
    use approx::assert_relative_eq;

    #[test]
    fn shares_follow_values() {
        let shares = split_shares(&[(Count(1), 1.0), (Count(1), 1.0), (Count(2), 1.0)]);
        assert_relative_eq!(shares[0], 0.25);
        assert_relative_eq!(shares[1], 0.25);
        assert_relative_eq!(shares[2], 0.5);
    }

    #[test]
    fn hidden_series_contribute_nothing() {
        let shares = split_shares(&[(Count(3), 0.0), (Count(5), 1.0)]);
        assert_eq!(shares[0], 0.0);
        assert_eq!(shares[1], 1.0);
    }

    #[test]
    fn all_zero_stack_yields_zero_shares() {
        let shares = split_shares(&[(Count(0), 1.0), (Count(0), 1.0)]);
        assert!(shares.iter().all(|share| *share == 0.0));
    }

    #[test]
    fn rounding_slack_goes_to_earliest_visible_slot() {
        let shares = split_shares(&[(Count(1), 1.0), (Count(1), 1.0), (Count(1), 1.0)]);
        let percents = whole_percents(&shares);
        assert_eq!(percents.as_slice(), &[34, 33, 33]);

        let shares = split_shares(&[(Count(9), 0.0), (Count(1), 1.0), (Count(2), 1.0)]);
        let percents = whole_percents(&shares);
        assert_eq!(percents.as_slice(), &[0, 33, 67]);
    }
}
