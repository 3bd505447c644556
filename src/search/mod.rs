//! Box Least Squares period search.
//!
//! Responsibilities:
//!
//! - generate period / duration grids
//! - fold the light curve at each period
//! - evaluate the best box per period (parallel)
//! - select the best period and refit its step model

pub mod box_fit;
pub mod engine;
pub mod model;
pub mod period_grid;
pub mod phase;
pub mod summary;

pub use engine::*;
pub use period_grid::*;
pub use phase::*;
pub use summary::*;
