//! Mathematical utilities: least squares.

pub mod ols;

pub use ols::*;
