//! Data sources that do not come from a user file.

pub mod synthetic;

pub use synthetic::*;
