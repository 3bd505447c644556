//! Period search orchestration.
//!
//! Given:
//! - a light curve `(t_i, f_i)`
//! - an ascending period grid
//! - one or more transit durations
//!
//! we fold the light curve at each period, run the box fit for each duration,
//! and keep one `(power, depth, duration, offset)` entry per period. The best
//! period is the highest-power entry, first occurrence on ties.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{BestFit, BinningOptions, BoxFit, LightCurve, PowerSpectrum, SpectrumEntry};
use crate::error::BlsError;
use crate::search::box_fit;
use crate::search::period_grid::duration_grid;
use crate::search::phase::fold;

/// Output of a full grid search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub spectrum: PowerSpectrum,
    pub best: BestFit,
}

#[derive(Debug, Clone, Copy)]
struct PeriodOutcome {
    entry: SpectrumEntry,
    /// Bin-snapped width of the winning box.
    width: f64,
    degenerate: usize,
}

/// Search `periods` with a single transit duration.
pub fn search(
    light_curve: &LightCurve,
    periods: &[f64],
    duration: f64,
    binning: &BinningOptions,
) -> Result<SearchResult, BlsError> {
    search_durations(light_curve, periods, &[duration], binning)
}

/// Search `periods` with a grid of durations; each period keeps its best duration.
pub fn search_durations(
    light_curve: &LightCurve,
    periods: &[f64],
    durations: &[f64],
    binning: &BinningOptions,
) -> Result<SearchResult, BlsError> {
    // All fatal checks happen up front so no partial spectrum is ever built.
    if light_curve.len() < 2 {
        return Err(BlsError::InsufficientData(light_curve.len()));
    }
    if periods.is_empty() {
        return Err(BlsError::EmptyGrid { grid: "period" });
    }
    if let Some(&bad) = periods.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(BlsError::InvalidPeriod(bad));
    }
    let durations = duration_grid(durations)?;
    box_fit::validate_binning(binning)?;

    let started = Instant::now();
    info!(
        samples = light_curve.len(),
        periods = periods.len(),
        durations = durations.len(),
        "starting BLS search"
    );

    // Evaluate each period independently (parallel). `collect` keeps grid order.
    let outcomes: Vec<PeriodOutcome> = periods
        .par_iter()
        .map(|&period| evaluate_period(light_curve, period, &durations, binning))
        .collect::<Result<Vec<_>, BlsError>>()?;

    let degenerate: usize = outcomes.iter().map(|o| o.degenerate).sum();
    let entries: Vec<SpectrumEntry> = outcomes.iter().map(|o| o.entry).collect();
    let widths: Vec<f64> = outcomes.iter().map(|o| o.width).collect();
    let spectrum = PowerSpectrum::from_entries(&entries, degenerate);

    let best = select_best(&spectrum, &widths, light_curve.time_range().0)
        .ok_or(BlsError::EmptyGrid { grid: "period" })?;

    if degenerate > 0 {
        debug!(degenerate, "recorded zero power for degenerate (period, duration) pairs");
    }
    info!(
        best_period = best.period,
        best_power = best.power,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "BLS search complete"
    );

    Ok(SearchResult { spectrum, best })
}

fn evaluate_period(
    light_curve: &LightCurve,
    period: f64,
    durations: &[f64],
    binning: &BinningOptions,
) -> Result<PeriodOutcome, BlsError> {
    let phases = fold(light_curve.time(), period)?;

    let mut best: Option<(f64, BoxFit)> = None;
    let mut degenerate = 0usize;
    for &duration in durations {
        let fit = match box_fit::evaluate(&phases, light_curve.flux(), period, duration, binning) {
            Ok(fit) => fit,
            Err(BlsError::DegenerateBox { .. }) => {
                degenerate += 1;
                BoxFit::empty()
            }
            Err(e) => return Err(e),
        };
        // Strict comparison: the shortest duration wins ties.
        if best.map(|(_, b)| fit.power > b.power).unwrap_or(true) {
            best = Some((duration, fit));
        }
    }

    let (duration, fit) = best.unwrap_or((durations[0], BoxFit::empty()));
    Ok(PeriodOutcome {
        entry: SpectrumEntry {
            period,
            power: fit.power,
            depth: fit.depth,
            duration,
            offset_phase: fit.offset_phase,
        },
        width: fit.width,
        degenerate,
    })
}

/// Deterministic selection: maximum power, ties broken by grid index.
fn select_best(spectrum: &PowerSpectrum, widths: &[f64], t_min: f64) -> Option<BestFit> {
    let power = spectrum.power();
    if power.is_empty() {
        return None;
    }

    let mut idx = 0usize;
    for (i, &p) in power.iter().enumerate().skip(1) {
        if p > power[idx] {
            idx = i;
        }
    }

    let entry = spectrum.entry(idx)?;
    let width = widths.get(idx).copied().unwrap_or(0.0);
    Some(BestFit {
        index: idx,
        period: entry.period,
        power: entry.power,
        depth: entry.depth,
        duration: entry.duration,
        offset_phase: entry.offset_phase,
        width,
        transit_time: first_transit_time(&entry, width, t_min),
    })
}

/// Mid-transit time of the first transit at or after `t_min`.
///
/// `width` is the scored (bin-snapped) box width, so the centre matches the
/// box that produced the power.
fn first_transit_time(entry: &SpectrumEntry, width: f64, t_min: f64) -> f64 {
    let p = entry.period;
    let width = width.clamp(0.0, 1.0);
    let center = (entry.offset_phase + width / 2.0).rem_euclid(1.0) * p;
    center + ((t_min - center) / p).ceil() * p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::period_grid::linear_grid;

    fn transit_curve(n: usize, span: f64, period: f64, duration: f64, depth: f64) -> LightCurve {
        let time: Vec<f64> = (0..n).map(|i| span * i as f64 / (n as f64 - 1.0)).collect();
        let flux = time
            .iter()
            .map(|&t| if t.rem_euclid(period) < duration { 1.0 - depth } else { 1.0 })
            .collect();
        LightCurve::new(time, flux).unwrap()
    }

    #[test]
    fn spectrum_matches_grid_and_powers_are_non_negative() {
        let lc = transit_curve(1500, 15.0, 2.5, 0.12, 0.02);
        let grid = linear_grid(0.8, 6.0, 400).unwrap();
        let result = search(&lc, &grid, 0.12, &BinningOptions::default()).unwrap();

        assert_eq!(result.spectrum.len(), grid.len());
        assert_eq!(result.spectrum.periods(), grid.as_slice());
        assert!(result.spectrum.power().iter().all(|&p| p >= 0.0));
        assert_eq!(result.best.power, result.spectrum.power()[result.best.index]);
    }

    #[test]
    fn recovers_injected_period_and_depth() {
        let lc = transit_curve(2000, 20.0, 3.0, 0.1, 0.05);
        let grid = linear_grid(0.5, 10.0, 5000).unwrap();
        let step = grid[1] - grid[0];
        let result = search(&lc, &grid, 0.1, &BinningOptions::default()).unwrap();

        assert!((result.best.period - 3.0).abs() <= step, "period={}", result.best.period);
        assert!((result.best.depth - 0.05).abs() / 0.05 < 0.05, "depth={}", result.best.depth);
        // Transits start at t = 0, 3, 6, ... so the first mid-transit is near 0.05.
        assert!((result.best.transit_time - 0.05).abs() < 0.02, "t0={}", result.best.transit_time);
    }

    #[test]
    fn flat_curve_has_no_power_anywhere() {
        let time: Vec<f64> = (0..800).map(|i| i as f64 * 0.013).collect();
        let lc = LightCurve::new(time, vec![1.0; 800]).unwrap();
        let grid = linear_grid(0.5, 5.0, 200).unwrap();
        let result = search(&lc, &grid, 0.1, &BinningOptions::default()).unwrap();
        assert!(result.spectrum.power().iter().all(|&p| p.abs() < 1e-20));
        // Everything ties at zero, so the first period wins.
        assert_eq!(result.best.index, 0);
    }

    #[test]
    fn repeated_searches_are_bit_identical() {
        let lc = transit_curve(900, 9.0, 1.7, 0.08, 0.01);
        let grid = linear_grid(0.5, 4.0, 300).unwrap();
        let a = search(&lc, &grid, 0.08, &BinningOptions::default()).unwrap();
        let b = search(&lc, &grid, 0.08, &BinningOptions::default()).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.spectrum.power().iter().zip(b.spectrum.power()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn degenerate_periods_record_zero_power() {
        let lc = transit_curve(500, 10.0, 2.0, 0.3, 0.05);
        // Duration 0.3 is longer than the first two periods.
        let grid = vec![0.2, 0.3, 2.0];
        let result = search(&lc, &grid, 0.3, &BinningOptions::default()).unwrap();
        assert_eq!(result.spectrum.degenerate(), 2);
        assert_eq!(result.spectrum.power()[0], 0.0);
        assert_eq!(result.spectrum.power()[1], 0.0);
        assert_eq!(result.best.index, 2);
    }

    #[test]
    fn duration_grid_picks_the_matching_duration() {
        let lc = transit_curve(3000, 30.0, 4.0, 0.25, 0.03);
        let grid = linear_grid(3.9, 4.1, 21).unwrap();
        let result =
            search_durations(&lc, &grid, &[0.05, 0.25, 0.1], &BinningOptions::default()).unwrap();
        assert_eq!(result.best.duration, 0.25);
        assert!((result.best.period - 4.0).abs() < 0.011);
    }

    #[test]
    fn transit_time_uses_the_scored_box_width() {
        let lc = transit_curve(1000, 10.0, 2.0, 0.13, 0.05);
        let result = search(&lc, &[2.0], 0.13, &BinningOptions::default()).unwrap();
        let best = result.best;

        // w = 0.065 gives 307 bins and a 20-bin box, slightly wider than w.
        assert!((best.width - 20.0 / 307.0).abs() < 1e-12, "width={}", best.width);
        let center = (best.offset_phase + best.width / 2.0).rem_euclid(1.0) * best.period;
        assert!((best.transit_time - center).abs() < 1e-9, "t0={}", best.transit_time);
    }

    #[test]
    fn invalid_binning_is_fatal() {
        let lc = transit_curve(100, 10.0, 2.0, 0.1, 0.05);
        let opts = BinningOptions {
            oversample: 20.0,
            min_bins: usize::MAX / 2,
        };
        assert!(matches!(
            search(&lc, &[1.0, 2.0], 0.1, &opts),
            Err(BlsError::InvalidBinning { .. })
        ));
    }

    #[test]
    fn fatal_errors_surface_before_any_evaluation() {
        let lc = transit_curve(100, 10.0, 2.0, 0.1, 0.05);
        let opts = BinningOptions::default();
        assert_eq!(
            search(&lc, &[], 0.1, &opts),
            Err(BlsError::EmptyGrid { grid: "period" })
        );
        assert_eq!(
            search(&lc, &[1.0, -1.0], 0.1, &opts),
            Err(BlsError::InvalidPeriod(-1.0))
        );
        assert_eq!(
            search(&lc, &[1.0], 0.0, &opts),
            Err(BlsError::InvalidDuration(0.0))
        );
    }
}
