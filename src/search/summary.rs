//! Aggregated search output for reporting and plotting.

use crate::domain::{BestFit, LightCurve, PowerSpectrum, SearchConfig, StepModel};
use crate::error::BlsError;
use crate::search::engine::{SearchResult, search_durations};
use crate::search::model::fit_step_model;
use crate::search::period_grid::period_grid;
use crate::search::phase::{fold, fold_time};

/// Immutable view over one search: input, periodogram, best fit and step model.
#[derive(Debug, Clone)]
pub struct ResultSummary {
    light_curve: LightCurve,
    config: SearchConfig,
    spectrum: PowerSpectrum,
    best: BestFit,
    model: Option<StepModel>,
}

impl ResultSummary {
    /// Build the grid described by `config`, search it, and aggregate the result.
    pub fn search(light_curve: LightCurve, config: &SearchConfig) -> Result<Self, BlsError> {
        let periods = period_grid(config)?;
        let result = search_durations(&light_curve, &periods, &config.durations, &config.binning)?;
        Ok(Self::new(light_curve, config.clone(), result))
    }

    /// Aggregate an existing search result.
    pub fn new(light_curve: LightCurve, config: SearchConfig, result: SearchResult) -> Self {
        let SearchResult { spectrum, best } = result;
        let phases: Vec<f64> = light_curve
            .time()
            .iter()
            .map(|&t| fold_time(t, best.period))
            .collect();
        let model = fit_step_model(
            &phases,
            light_curve.flux(),
            best.offset_phase,
            best.duration / best.period,
        );

        Self {
            light_curve,
            config,
            spectrum,
            best,
            model,
        }
    }

    pub fn light_curve(&self) -> &LightCurve {
        &self.light_curve
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn spectrum(&self) -> &PowerSpectrum {
        &self.spectrum
    }

    pub fn best(&self) -> &BestFit {
        &self.best
    }

    pub fn model(&self) -> Option<&StepModel> {
        self.model.as_ref()
    }

    /// Fold the light curve at an arbitrary period.
    pub fn fold(&self, period: f64) -> Result<Vec<f64>, BlsError> {
        fold(self.light_curve.time(), period)
    }

    /// Phases at the best period.
    pub fn fold_best(&self) -> Vec<f64> {
        self.light_curve
            .time()
            .iter()
            .map(|&t| fold_time(t, self.best.period))
            .collect()
    }

    /// `(phase, flux)` pairs at the best period.
    pub fn folded_points(&self) -> Vec<(f64, f64)> {
        self.fold_best()
            .into_iter()
            .zip(self.light_curve.flux().iter().copied())
            .collect()
    }

    /// Step model sampled on `n` evenly spaced phases, for overlays.
    pub fn model_curve(&self, n: usize) -> Vec<(f64, f64)> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let phase = i as f64 / (n as f64 - 1.0);
                (phase, model.predict(phase.min(1.0 - f64::EPSILON)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injected(depth: f64) -> LightCurve {
        let time: Vec<f64> = (0..1200).map(|i| i as f64 * 0.01).collect();
        let flux = time
            .iter()
            .map(|&t| if (t - 0.4).rem_euclid(2.0) < 0.15 { 1.0 - depth } else { 1.0 })
            .collect();
        LightCurve::new(time, flux).unwrap()
    }

    #[test]
    fn summary_exposes_best_fold_and_model() {
        let config = SearchConfig {
            min_period: 1.0,
            max_period: 3.0,
            period_count: 401,
            durations: vec![0.15],
            ..SearchConfig::default()
        };
        let summary = ResultSummary::search(injected(0.02), &config).unwrap();

        assert_eq!(summary.spectrum().len(), 401);
        assert!((summary.best().period - 2.0).abs() <= 0.005 + 1e-12);

        let phases = summary.fold_best();
        assert_eq!(phases.len(), summary.light_curve().len());
        assert_eq!(phases, summary.fold(summary.best().period).unwrap());

        let model = summary.model().unwrap();
        assert!((model.depth - 0.02).abs() < 0.002, "depth={}", model.depth);
        assert!((model.baseline - 1.0).abs() < 0.001);
        assert_eq!(summary.model_curve(50).len(), 50);
    }

    #[test]
    fn summary_propagates_config_errors() {
        let config = SearchConfig {
            min_period: 2.0,
            max_period: 2.0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            ResultSummary::search(injected(0.02), &config),
            Err(BlsError::InvalidRange { .. })
        ));
    }
}
