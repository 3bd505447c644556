//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input light curve (`LightCurve`) and its stats (`DatasetStats`)
//! - search configuration (`SearchConfig`, `BinningOptions`, `GridSpacing`)
//! - search outputs (`BoxFit`, `PowerSpectrum`, `BestFit`, `StepModel`)
//! - the portable periodogram file (`SpectrumFile`)

pub mod types;

pub use types::*;
