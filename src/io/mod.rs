//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - periodogram / light-curve CSV exports (`export`)
//! - spectrum JSON read/write (`spectrum`)

pub mod export;
pub mod ingest;
pub mod spectrum;

pub use export::*;
pub use ingest::*;
pub use spectrum::*;
