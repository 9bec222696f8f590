//! Point scaling, decay and payout arithmetic.

use chrono::TimeDelta;
use rand::Rng;

/// Draw a multiplier from the inclusive percentage range between two bounds.
///
/// The bounds may come in either order. Equal bounds give exactly that
/// percentage.
pub fn random_multiplier(rng: &mut impl Rng, a: u32, b: u32) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let percent = rng.random_range(lo..=hi);
    f64::from(percent) / 100.0
}

/// Scale a point value, rounding up.
pub fn scale_points(base: u64, multiplier: f64) -> u64 {
    (base as f64 * multiplier).ceil().max(0.0) as u64
}

/// Scale a duration, saturating at [`TimeDelta::MAX`].
pub fn scale_delta(delta: TimeDelta, multiplier: f64) -> TimeDelta {
    let ms = delta.num_milliseconds() as f64 * multiplier.max(0.0);
    TimeDelta::try_milliseconds(ms.round() as i64).unwrap_or(TimeDelta::MAX)
}

/// Lower a value by `percent` after a question is answered.
///
/// Never raises the value and never goes below zero. A non-positive percent
/// leaves it unchanged.
pub fn decay(base: u64, percent: f64) -> u64 {
    if percent <= 0.0 {
        return base;
    }
    let b = base as f64;
    let next = (b - b * percent / 100.0).floor().max(0.0) as u64;
    next.min(base)
}

/// Raise a value by `percent` after a question goes unanswered.
pub fn increase(base: u64, percent: f64) -> u64 {
    if percent <= 0.0 {
        return base;
    }
    let b = base as f64;
    let next = (b + b * percent / 100.0).floor();
    if next >= u64::MAX as f64 {
        u64::MAX
    } else {
        (next as u64).max(base)
    }
}

/// What each of `winners` receives from a `total` reward.
pub fn share(total: u64, winners: usize, dividing: bool) -> u64 {
    if !dividing || winners <= 1 {
        return total;
    }
    total.div_ceil(winners as u64)
}
