//! Command-line parsing for the BLS transit search.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the search code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::{
    DEFAULT_DURATION, DEFAULT_MAX_PERIOD, DEFAULT_MIN_BINS, DEFAULT_MIN_PERIOD, DEFAULT_OVERSAMPLE,
    DEFAULT_PERIOD_COUNT, GridSpacing, SimulationConfig,
};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bls", version, about = "Box Least Squares transit search for light curves")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search a light curve CSV for periodic transits and print the report.
    Search(SearchArgs),
    /// Write a synthetic light curve with an injected transit.
    Simulate(SimulateArgs),
    /// Plot a previously exported spectrum JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same search pipeline as `bls search`, but renders the
    /// light curve, periodogram and folded curve with Ratatui.
    Tui(SearchArgs),
}

/// Options shared by `search` and `tui`.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// Light curve CSV with `time` and `flux` columns (prompted for if omitted).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Shortest trial period (days).
    #[arg(long, default_value_t = DEFAULT_MIN_PERIOD)]
    pub min_period: f64,

    /// Longest trial period (days).
    #[arg(long, default_value_t = DEFAULT_MAX_PERIOD)]
    pub max_period: f64,

    /// Number of trial periods.
    #[arg(long = "periods", default_value_t = DEFAULT_PERIOD_COUNT)]
    pub period_count: usize,

    /// Transit duration (days). Repeat to search several durations.
    #[arg(long = "duration", default_values_t = vec![DEFAULT_DURATION])]
    pub durations: Vec<f64>,

    /// Period grid spacing.
    #[arg(long, value_enum, default_value_t = GridSpacing::Linear)]
    pub spacing: GridSpacing,

    /// Phase bins per box width.
    #[arg(long, default_value_t = DEFAULT_OVERSAMPLE)]
    pub oversample: f64,

    /// Minimum number of phase bins.
    #[arg(long, default_value_t = DEFAULT_MIN_BINS)]
    pub min_bins: usize,

    /// Worker threads for the search (defaults to one per core).
    #[arg(long, env = "BLS_THREADS")]
    pub threads: Option<usize>,

    /// Show the top-N periodogram peaks.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the periodogram to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the search result (config + best fit + periodogram) to JSON.
    #[arg(long = "export-spectrum", value_name = "JSON")]
    pub export_spectrum: Option<PathBuf>,
}

/// Options for generating a synthetic light curve.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Number of evenly spaced samples.
    #[arg(short = 'n', long, default_value_t = SimulationConfig::default().samples)]
    pub samples: usize,

    /// Time span covered by the samples (days).
    #[arg(long, default_value_t = SimulationConfig::default().span)]
    pub span: f64,

    /// Transit period (days).
    #[arg(long, default_value_t = SimulationConfig::default().period)]
    pub period: f64,

    /// Transit duration (days).
    #[arg(long, default_value_t = SimulationConfig::default().duration)]
    pub duration: f64,

    /// Fractional transit depth.
    #[arg(long, default_value_t = SimulationConfig::default().depth)]
    pub depth: f64,

    /// Start time of the first transit (days).
    #[arg(long, default_value_t = SimulationConfig::default().epoch)]
    pub epoch: f64,

    /// Gaussian noise standard deviation.
    #[arg(long, default_value_t = SimulationConfig::default().noise)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = SimulationConfig::default().seed)]
    pub seed: u64,
}

/// Options for plotting a saved spectrum.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Spectrum JSON file produced by `bls search --export-spectrum`.
    #[arg(long, value_name = "JSON")]
    pub spectrum: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
