//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - passed read-only into the search engine
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::BlsError;

/// Default search range (days).
pub const DEFAULT_MIN_PERIOD: f64 = 0.5;
pub const DEFAULT_MAX_PERIOD: f64 = 10.0;
/// Default grid resolution.
pub const DEFAULT_PERIOD_COUNT: usize = 5000;
/// Default transit duration (days).
pub const DEFAULT_DURATION: f64 = 0.1;
/// Phase bins per box width used by the box fit.
pub const DEFAULT_OVERSAMPLE: f64 = 20.0;
/// Lower bound on the number of phase bins.
pub const DEFAULT_MIN_BINS: usize = 50;

/// A photometric time series: one `(time, flux)` pair per observation.
///
/// Cadence is arbitrary (unsorted times, gaps and irregular sampling are all
/// valid). Construction guarantees equal lengths, at least two samples and
/// finite values; the search never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
}

impl LightCurve {
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self, BlsError> {
        if time.len() != flux.len() {
            return Err(BlsError::LengthMismatch {
                times: time.len(),
                fluxes: flux.len(),
            });
        }
        if time.len() < 2 {
            return Err(BlsError::InsufficientData(time.len()));
        }
        if let Some(idx) = time
            .iter()
            .zip(flux.iter())
            .position(|(t, f)| !(t.is_finite() && f.is_finite()))
        {
            return Err(BlsError::NonFiniteSample(idx));
        }
        Ok(Self { time, flux })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `(time, flux)` pairs in input order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.flux.iter().copied())
    }

    /// Earliest and latest timestamps.
    pub fn time_range(&self) -> (f64, f64) {
        self.time
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| (lo.min(t), hi.max(t)))
    }
}

/// How candidate periods are spaced between `min_period` and `max_period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridSpacing {
    /// Evenly spaced in period (the default).
    Linear,
    /// Evenly spaced in frequency `1/P`; denser at short periods.
    Frequency,
}

impl GridSpacing {
    pub fn display_name(self) -> &'static str {
        match self {
            GridSpacing::Linear => "linear",
            GridSpacing::Frequency => "uniform-frequency",
        }
    }
}

/// Phase binning used by the box fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinningOptions {
    /// Target number of bins spanned by one box width.
    ///
    /// The bin count never drops below `4 / width`, whatever this is set to.
    pub oversample: f64,
    /// Minimum number of phase bins.
    pub min_bins: usize,
}

impl Default for BinningOptions {
    fn default() -> Self {
        Self {
            oversample: DEFAULT_OVERSAMPLE,
            min_bins: DEFAULT_MIN_BINS,
        }
    }
}

/// Search parameters as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). The defaults scan
/// 5000 periods linearly spaced in `[0.5, 10]` days and a
/// single 0.1 day duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub min_period: f64,
    pub max_period: f64,
    pub period_count: usize,
    pub spacing: GridSpacing,
    /// One or more transit durations; each period keeps its best duration.
    pub durations: Vec<f64>,
    pub binning: BinningOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_period: DEFAULT_MIN_PERIOD,
            max_period: DEFAULT_MAX_PERIOD,
            period_count: DEFAULT_PERIOD_COUNT,
            spacing: GridSpacing::Linear,
            durations: vec![DEFAULT_DURATION],
            binning: BinningOptions::default(),
        }
    }
}

/// Best box placement for one `(period, duration)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFit {
    /// Reduction in squared deviation achieved by the box split (>= 0).
    pub power: f64,
    /// `mean_out - mean_in` (positive for a dip).
    pub depth: f64,
    /// Phase at which the box starts, in `[0, 1)`.
    pub offset_phase: f64,
    /// Box width in phase after snapping to whole bins.
    pub width: f64,
    /// Samples inside the box.
    pub n_in: usize,
}

impl BoxFit {
    /// Result used when no offset produces a valid split.
    pub fn empty() -> Self {
        Self {
            power: 0.0,
            depth: 0.0,
            offset_phase: 0.0,
            width: 0.0,
            n_in: 0,
        }
    }

    /// Phase of the box centre, in `[0, 1)`.
    pub fn center_phase(&self) -> f64 {
        (self.offset_phase + self.width / 2.0).rem_euclid(1.0)
    }
}

/// One row of the periodogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumEntry {
    pub period: f64,
    pub power: f64,
    pub depth: f64,
    /// Duration that produced `power` at this period.
    pub duration: f64,
    pub offset_phase: f64,
}

/// Power as a function of period, indexed like the period grid.
///
/// Built once per search; there are no mutating methods.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    periods: Vec<f64>,
    power: Vec<f64>,
    depth: Vec<f64>,
    duration: Vec<f64>,
    offset_phase: Vec<f64>,
    degenerate: usize,
}

impl PowerSpectrum {
    /// Build a spectrum from per-period entries (in grid order).
    ///
    /// `degenerate` counts the `(period, duration)` pairs that could not be
    /// evaluated and were recorded with zero power.
    pub fn from_entries(entries: &[SpectrumEntry], degenerate: usize) -> Self {
        Self {
            periods: entries.iter().map(|e| e.period).collect(),
            power: entries.iter().map(|e| e.power).collect(),
            depth: entries.iter().map(|e| e.depth).collect(),
            duration: entries.iter().map(|e| e.duration).collect(),
            offset_phase: entries.iter().map(|e| e.offset_phase).collect(),
            degenerate,
        }
    }

    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    pub fn durations(&self) -> &[f64] {
        &self.duration
    }

    pub fn offset_phase(&self) -> &[f64] {
        &self.offset_phase
    }

    pub fn degenerate(&self) -> usize {
        self.degenerate
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn entry(&self, idx: usize) -> Option<SpectrumEntry> {
        Some(SpectrumEntry {
            period: *self.periods.get(idx)?,
            power: self.power[idx],
            depth: self.depth[idx],
            duration: self.duration[idx],
            offset_phase: self.offset_phase[idx],
        })
    }

    /// `(period, power)` pairs, for plotting.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.periods
            .iter()
            .copied()
            .zip(self.power.iter().copied())
            .collect()
    }
}

/// Highest-power entry of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestFit {
    /// Position in the period grid.
    pub index: usize,
    pub period: f64,
    pub power: f64,
    pub depth: f64,
    pub duration: f64,
    /// Phase at which the best box starts.
    pub offset_phase: f64,
    /// Box width in phase after snapping to whole bins.
    #[serde(default)]
    pub width: f64,
    /// Mid-transit time of the first transit at or after the earliest sample.
    pub transit_time: f64,
}

/// Unbinned two-level fit at the best period: `flux = baseline - depth * in_box`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepModel {
    pub baseline: f64,
    pub depth: f64,
    pub offset_phase: f64,
    pub width: f64,
    pub n_in: usize,
    pub rmse: f64,
}

impl StepModel {
    /// True when `phase` falls inside the box (wrapping past phase 1).
    pub fn contains(&self, phase: f64) -> bool {
        (phase - self.offset_phase).rem_euclid(1.0) < self.width
    }

    /// Model flux at `phase`.
    pub fn predict(&self, phase: f64) -> f64 {
        if self.contains(phase) {
            self.baseline - self.depth
        } else {
            self.baseline
        }
    }
}

/// Summary stats about the samples actually used for the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_points: usize,
    pub time_min: f64,
    pub time_max: f64,
    pub flux_min: f64,
    pub flux_max: f64,
    pub flux_mean: f64,
}

impl DatasetStats {
    pub fn from_light_curve(curve: &LightCurve) -> Self {
        let (time_min, time_max) = curve.time_range();
        let (flux_min, flux_max) = curve
            .flux()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &f| (lo.min(f), hi.max(f)));
        let flux_mean = curve.flux().iter().sum::<f64>() / curve.len() as f64;
        Self {
            n_points: curve.len(),
            time_min,
            time_max,
            flux_min,
            flux_max,
            flux_mean,
        }
    }

    pub fn time_span(&self) -> f64 {
        self.time_max - self.time_min
    }
}

/// Parameters for a synthetic transit light curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of evenly spaced samples.
    pub samples: usize,
    /// Samples cover `[0, span]`.
    pub span: f64,
    pub period: f64,
    pub duration: f64,
    pub depth: f64,
    /// Start time of the first transit.
    pub epoch: f64,
    /// Standard deviation of Gaussian flux noise (0 disables noise).
    pub noise: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            span: 20.0,
            period: 3.0,
            duration: DEFAULT_DURATION,
            depth: 0.05,
            epoch: 0.0,
            noise: 0.0,
            seed: 42,
        }
    }
}

/// A saved periodogram file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: Option<PathBuf>,
    pub config: SearchConfig,
    pub best: BestFit,
    pub grid: SpectrumGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumGrid {
    pub period: Vec<f64>,
    pub power: Vec<f64>,
    pub depth: Vec<f64>,
    pub duration: Vec<f64>,
    #[serde(default)]
    pub offset_phase: Vec<f64>,
}
