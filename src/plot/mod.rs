//! Terminal plots for light curves, periodograms and folded curves.

pub mod ascii;

pub use ascii::*;
