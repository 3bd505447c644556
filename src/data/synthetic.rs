//! Synthetic transit light curves.
//!
//! Evenly sampled flat flux with a periodic box-shaped dip and optional
//! Gaussian noise. Deterministic for a given seed.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{LightCurve, SimulationConfig};
use crate::error::AppError;

/// Out-of-transit flux level.
pub const BASELINE_FLUX: f64 = 1.0;

/// Generate `config.samples` points on `[0, span]`.
///
/// A sample is in transit when `(t - epoch) mod period < duration`.
pub fn generate_transit_curve(config: &SimulationConfig) -> Result<LightCurve, AppError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let step = config.span / (config.samples as f64 - 1.0);
    let mut time = Vec::with_capacity(config.samples);
    let mut flux = Vec::with_capacity(config.samples);

    for i in 0..config.samples {
        let t = i as f64 * step;
        let in_transit = (t - config.epoch).rem_euclid(config.period) < config.duration;
        let mut f = if in_transit {
            BASELINE_FLUX - config.depth
        } else {
            BASELINE_FLUX
        };
        if config.noise > 0.0 {
            f += noise.sample(&mut rng);
        }
        time.push(t);
        flux.push(f);
    }

    Ok(LightCurve::new(time, flux)?)
}

fn validate(config: &SimulationConfig) -> Result<(), AppError> {
    if config.samples < 2 {
        return Err(AppError::new(2, "Sample count must be >= 2."));
    }
    if !(config.span.is_finite() && config.span > 0.0) {
        return Err(AppError::new(2, "Time span must be finite and > 0."));
    }
    if !(config.period.is_finite() && config.period > 0.0) {
        return Err(AppError::new(2, "Transit period must be finite and > 0."));
    }
    if !(config.duration.is_finite() && config.duration > 0.0 && config.duration < config.period) {
        return Err(AppError::new(2, "Transit duration must be > 0 and shorter than the period."));
    }
    if !(config.depth.is_finite() && config.epoch.is_finite()) {
        return Err(AppError::new(2, "Transit depth and epoch must be finite."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise level must be finite and >= 0."));
    }
    Ok(())
}
