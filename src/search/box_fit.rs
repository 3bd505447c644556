//! Least-squares box fit for a single `(period, duration)` pair.
//!
//! Given folded phases and fluxes, find the contiguous phase interval of width
//! `w = duration / period` whose split of the samples into "in box" and "out of
//! box" best explains the flux variance with a two-level step model.
//!
//! For a split with `n_in` / `n_out` samples and means `mean_in` / `mean_out`,
//! the reduction in total squared deviation relative to a flat model is
//!
//! ```text
//! power = n_in * n_out * (mean_out - mean_in)^2 / (n_in + n_out)
//! ```
//!
//! To keep the offset scan linear in the number of bins, phases are binned and
//! the box is evaluated with prefix sums over the doubled bin array (so a box
//! starting near phase 1 wraps around to phase 0 without special cases).

use crate::domain::{BinningOptions, BoxFit};
use crate::error::BlsError;

/// Upper bound on the phase bin count.
///
/// Boxes so narrow that `4 / w` exceeds this are reported as degenerate.
pub const MAX_BINS: usize = 1 << 20;

/// Slack applied before rounding the box span up to whole bins, so that
/// `w * B` landing a few ulps above an integer does not add an extra bin.
const SPAN_EPS: f64 = 1e-9;

/// Number of phase bins used for a box of normalized width `width`.
///
/// Guarantees `1 / B <= width / 4` and `B >= min_bins`, never exceeding
/// [`MAX_BINS`].
pub fn bin_count(width: f64, opts: &BinningOptions) -> usize {
    let oversampled = (opts.oversample.max(0.0) / width).floor();
    let resolution = (4.0 / width).ceil();
    let bins = oversampled.max(resolution).min(MAX_BINS as f64) as usize;
    bins.max(opts.min_bins).clamp(1, MAX_BINS)
}

/// Reject binning options that cannot produce a usable bin count.
pub fn validate_binning(opts: &BinningOptions) -> Result<(), BlsError> {
    let ok = opts.oversample.is_finite() && opts.oversample >= 0.0 && opts.min_bins <= MAX_BINS;
    if ok {
        Ok(())
    } else {
        Err(BlsError::InvalidBinning {
            oversample: opts.oversample,
            min_bins: opts.min_bins,
        })
    }
}

/// Evaluate the best box placement at one period.
///
/// `phases` must be in `[0, 1)` (see [`crate::search::phase::fold`]).
pub fn evaluate(
    phases: &[f64],
    flux: &[f64],
    period: f64,
    duration: f64,
    opts: &BinningOptions,
) -> Result<BoxFit, BlsError> {
    let width = duration / period;
    if !(width.is_finite() && width > 0.0 && width < 1.0) || 4.0 / width > MAX_BINS as f64 {
        return Err(BlsError::DegenerateBox {
            period,
            duration,
            width,
        });
    }

    let n_total = phases.len().min(flux.len());
    if n_total == 0 {
        return Ok(BoxFit::empty());
    }

    let bins = bin_count(width, opts);
    let span = ((width * bins as f64 - SPAN_EPS).ceil() as usize).clamp(1, bins);

    // Centre the flux first: depth and power only depend on differences of
    // means, and small magnitudes keep the prefix sums accurate.
    let mean = flux[..n_total].iter().sum::<f64>() / n_total as f64;

    let mut counts = vec![0usize; bins];
    let mut sums = vec![0.0f64; bins];
    for (&phase, &f) in phases.iter().zip(flux.iter()) {
        let b = ((phase * bins as f64) as usize).min(bins - 1);
        counts[b] += 1;
        sums[b] += f - mean;
    }

    // Prefix sums over two laps of the bins.
    let mut count_prefix = vec![0usize; 2 * bins + 1];
    let mut sum_prefix = vec![0.0f64; 2 * bins + 1];
    for k in 0..2 * bins {
        count_prefix[k + 1] = count_prefix[k] + counts[k % bins];
        sum_prefix[k + 1] = sum_prefix[k] + sums[k % bins];
    }
    let total_sum = sum_prefix[bins];
    let n = n_total as f64;

    let mut best = BoxFit {
        width: span as f64 / bins as f64,
        ..BoxFit::empty()
    };

    // Every start bin is scanned: with gaps in phase coverage, a box starting
    // on an empty bin covers a different sample set than one starting at the
    // next occupied bin. Empty bins add nothing to the prefix sums.
    for start in 0..bins {
        let n_in = count_prefix[start + span] - count_prefix[start];
        let n_out = n_total - n_in;
        if n_in == 0 || n_out == 0 {
            continue;
        }

        let sum_in = sum_prefix[start + span] - sum_prefix[start];
        let mean_in = sum_in / n_in as f64;
        let mean_out = (total_sum - sum_in) / n_out as f64;
        let depth = mean_out - mean_in;
        let power = n_in as f64 * n_out as f64 * depth * depth / n;

        if power > best.power {
            best = BoxFit {
                power,
                depth,
                offset_phase: start as f64 / bins as f64,
                width: span as f64 / bins as f64,
                n_in,
            };
        }
    }

    Ok(best)
}
