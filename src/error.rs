//! Error types.
//!
//! Two layers:
//!
//! - [`BlsError`]: typed failures raised by the loader and the search core.
//! - [`AppError`]: what the binary reports, carrying the process exit code.
//!
//! Exit codes: `2` bad input or configuration, `3` not enough usable data,
//! `4` internal / terminal failures.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the light-curve loader and the BLS search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlsError {
    #[error("Could not read file '{}': {reason}", path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("CSV must contain a `{column}` column.")]
    MissingColumn { column: &'static str },

    #[error(
        "Invalid period range: min={min}, max={max}, count={count} (need finite 0 < min < max and 2 <= count <= {limit}).",
        limit = crate::search::period_grid::MAX_PERIOD_COUNT
    )]
    InvalidRange { min: f64, max: f64, count: usize },

    #[error("Invalid period {0}: must be finite and > 0.")]
    InvalidPeriod(f64),

    #[error("Invalid transit duration {0}: must be finite and > 0.")]
    InvalidDuration(f64),

    #[error(
        "Invalid binning: oversample={oversample}, min_bins={min_bins} (need finite oversample >= 0 and min_bins <= {limit}).",
        limit = crate::search::box_fit::MAX_BINS
    )]
    InvalidBinning { oversample: f64, min_bins: usize },

    #[error("The {grid} grid is empty.")]
    EmptyGrid { grid: &'static str },

    #[error("Need at least 2 samples to search, got {0}.")]
    InsufficientData(usize),

    #[error("Light curve has {times} times but {fluxes} flux values.")]
    LengthMismatch { times: usize, fluxes: usize },

    #[error("Non-finite sample at index {0}.")]
    NonFiniteSample(usize),

    /// Duration is incompatible with the period (`duration / period` outside `(0, 1)`).
    ///
    /// Recoverable: the engine records zero power for the period and moves on.
    #[error("Degenerate box: duration {duration} vs period {period} gives width {width}.")]
    DegenerateBox { period: f64, duration: f64, width: f64 },
}

impl BlsError {
    pub fn exit_code(&self) -> u8 {
        match self {
            BlsError::UnreadableFile { .. }
            | BlsError::MissingColumn { .. }
            | BlsError::InvalidRange { .. }
            | BlsError::InvalidPeriod(_)
            | BlsError::InvalidDuration(_)
            | BlsError::InvalidBinning { .. }
            | BlsError::EmptyGrid { .. }
            | BlsError::LengthMismatch { .. }
            | BlsError::NonFiniteSample(_) => 2,
            BlsError::InsufficientData(_) => 3,
            BlsError::DegenerateBox { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<BlsError> for AppError {
    fn from(err: BlsError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
