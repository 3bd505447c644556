//! Unbinned step model at a fixed box position.
//!
//! The box fit works on phase bins and snaps the box to whole bins. Once the
//! best period and offset are known, this refits the two levels on the raw
//! samples with the exact box width `duration / period`. The result feeds the
//! report and the folded-view overlay.

use nalgebra::{DMatrix, DVector};

use crate::domain::StepModel;
use crate::math::solve_least_squares;

/// Fit `flux = baseline - depth * in_box(phase)` by ordinary least squares.
///
/// Returns `None` when the box holds no samples or every sample.
pub fn fit_step_model(phases: &[f64], flux: &[f64], offset_phase: f64, width: f64) -> Option<StepModel> {
    if !(width.is_finite() && width > 0.0 && width < 1.0) {
        return None;
    }
    let n = phases.len().min(flux.len());
    if n < 2 {
        return None;
    }

    let in_box = |phase: f64| (phase - offset_phase).rem_euclid(1.0) < width;

    let mut x = DMatrix::<f64>::zeros(n, 2);
    let mut y = DVector::<f64>::zeros(n);
    let mut n_in = 0usize;
    for i in 0..n {
        let indicator = if in_box(phases[i]) { 1.0 } else { 0.0 };
        if indicator > 0.0 {
            n_in += 1;
        }
        x[(i, 0)] = 1.0;
        x[(i, 1)] = -indicator;
        y[i] = flux[i];
    }
    if n_in == 0 || n_in == n {
        return None;
    }

    let beta = solve_least_squares(&x, &y)?;
    let fitted = &x * &beta;
    let sse: f64 = y.iter().zip(fitted.iter()).map(|(a, b)| (a - b) * (a - b)).sum();

    Some(StepModel {
        baseline: beta[0],
        depth: beta[1],
        offset_phase,
        width,
        n_in,
        rmse: (sse / n as f64).sqrt(),
    })
}
