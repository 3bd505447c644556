//! Phase folding.
//!
//! `phase = (t mod P) / P` with a floored remainder, so negative and
//! fractional times land in `[0, 1)` like any other timestamp.

use crate::error::BlsError;

/// Fold a single timestamp. `period` must already be validated.
#[inline]
pub fn fold_time(t: f64, period: f64) -> f64 {
    let phase = t.rem_euclid(period) / period;
    // `rem_euclid` can round up to `period` for tiny negative inputs.
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Fold `times` at `period`, one phase per sample.
pub fn fold(times: &[f64], period: f64) -> Result<Vec<f64>, BlsError> {
    if !(period.is_finite() && period > 0.0) {
        return Err(BlsError::InvalidPeriod(period));
    }
    Ok(times.iter().map(|&t| fold_time(t, period)).collect())
}
