//! Period and duration grid generation.
//!
//! The search is a deterministic grid scan: every candidate period is
//! evaluated, so the grid alone decides the resolution of the periodogram.

use crate::domain::{GridSpacing, SearchConfig};
use crate::error::BlsError;

/// Largest accepted period count; bigger grids are rejected as `InvalidRange`.
pub const MAX_PERIOD_COUNT: usize = 1 << 24;

/// Generate `count` linearly spaced periods between `min` and `max` (inclusive).
pub fn linear_grid(min: f64, max: f64, count: usize) -> Result<Vec<f64>, BlsError> {
    validate_range(min, max, count)?;

    let step = (max - min) / (count as f64 - 1.0);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(min + step * i as f64);
    }
    // Pin the endpoint so `count = 2` is exactly `[min, max]`.
    out[count - 1] = max;
    Ok(out)
}

/// Generate `count` periods evenly spaced in frequency, in ascending period order.
///
/// Transit phase drift across a baseline scales with `1/P`, so a uniform
/// frequency grid keeps the phase resolution constant over the range.
pub fn frequency_grid(min: f64, max: f64, count: usize) -> Result<Vec<f64>, BlsError> {
    validate_range(min, max, count)?;

    let f_hi = 1.0 / min;
    let f_lo = 1.0 / max;
    let step = (f_hi - f_lo) / (count as f64 - 1.0);

    // Walk frequency downwards so periods come out ascending.
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(1.0 / (f_hi - step * i as f64));
    }
    out[0] = min;
    out[count - 1] = max;
    Ok(out)
}

/// Build the period grid described by a search config.
pub fn period_grid(config: &SearchConfig) -> Result<Vec<f64>, BlsError> {
    match config.spacing {
        GridSpacing::Linear => linear_grid(config.min_period, config.max_period, config.period_count),
        GridSpacing::Frequency => {
            frequency_grid(config.min_period, config.max_period, config.period_count)
        }
    }
}

/// Validate a list of transit durations: sorted ascending, duplicates removed.
pub fn duration_grid(values: &[f64]) -> Result<Vec<f64>, BlsError> {
    if values.is_empty() {
        return Err(BlsError::EmptyGrid { grid: "duration" });
    }
    if let Some(&bad) = values.iter().find(|d| !(d.is_finite() && **d > 0.0)) {
        return Err(BlsError::InvalidDuration(bad));
    }

    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out.dedup();
    Ok(out)
}

fn validate_range(min: f64, max: f64, count: usize) -> Result<(), BlsError> {
    let ok = min.is_finite()
        && max.is_finite()
        && min > 0.0
        && max > min
        && (2..=MAX_PERIOD_COUNT).contains(&count);
    if ok {
        Ok(())
    } else {
        Err(BlsError::InvalidRange { min, max, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_are_exactly_the_endpoints() {
        assert_eq!(linear_grid(0.5, 10.0, 2).unwrap(), vec![0.5, 10.0]);
        assert_eq!(frequency_grid(0.5, 10.0, 2).unwrap(), vec![0.5, 10.0]);
    }

    #[test]
    fn default_grid_is_strictly_increasing_and_bounded() {
        let grid = linear_grid(0.5, 10.0, 5000).unwrap();
        assert_eq!(grid.len(), 5000);
        assert_eq!(grid[0], 0.5);
        assert_eq!(grid[4999], 10.0);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
        assert!(grid.iter().all(|&p| (0.5..=10.0).contains(&p)));
    }

    #[test]
    fn frequency_grid_is_ascending_and_denser_at_short_periods() {
        let grid = frequency_grid(1.0, 10.0, 50).unwrap();
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
        let first_step = grid[1] - grid[0];
        let last_step = grid[49] - grid[48];
        assert!(first_step < last_step);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(matches!(linear_grid(1.0, 1.0, 10), Err(BlsError::InvalidRange { .. })));
        assert!(matches!(linear_grid(0.0, 1.0, 10), Err(BlsError::InvalidRange { .. })));
        assert!(matches!(linear_grid(-1.0, 1.0, 10), Err(BlsError::InvalidRange { .. })));
        assert!(matches!(linear_grid(2.0, 1.0, 10), Err(BlsError::InvalidRange { .. })));
        assert!(matches!(linear_grid(0.5, 10.0, 1), Err(BlsError::InvalidRange { .. })));
        assert!(matches!(linear_grid(0.5, f64::INFINITY, 10), Err(BlsError::InvalidRange { .. })));
    }

    #[test]
    fn oversized_grids_are_rejected_before_allocating() {
        assert!(matches!(
            linear_grid(0.5, 10.0, MAX_PERIOD_COUNT + 1),
            Err(BlsError::InvalidRange { .. })
        ));
        assert!(matches!(
            frequency_grid(0.5, 10.0, usize::MAX),
            Err(BlsError::InvalidRange { .. })
        ));
    }

    #[test]
    fn duration_grid_sorts_and_dedups() {
        assert_eq!(duration_grid(&[0.2, 0.1, 0.2]).unwrap(), vec![0.1, 0.2]);
        assert_eq!(duration_grid(&[]), Err(BlsError::EmptyGrid { grid: "duration" }));
        assert_eq!(duration_grid(&[0.1, -0.1]), Err(BlsError::InvalidDuration(-0.1)));
    }
}
