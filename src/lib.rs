//! `bls-transit` library crate.
//!
//! Box Least Squares search for periodic transits in photometric light curves.
//! The binary (`bls`) is a thin wrapper around this library so that:
//!
//! - the search core is testable without spawning processes
//! - front-ends (CLI, TUI) share one pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod search;
pub mod tui;
