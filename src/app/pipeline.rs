//! Shared search pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> period grid -> BLS search -> summary
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::domain::SearchConfig;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_light_curve};
use crate::search::ResultSummary;

/// All computed outputs of a single `bls search` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: PathBuf,
    pub ingest: IngestedData,
    pub summary: ResultSummary,
}

/// Load `path` and search it with `config`.
pub fn run_search(path: &Path, config: &SearchConfig) -> Result<RunOutput, AppError> {
    let ingest = load_light_curve(path)?;
    search_ingested(path.to_path_buf(), ingest, config)
}

/// Search already-loaded data.
///
/// The TUI uses this to re-run with a new duration without re-reading the file.
pub fn search_ingested(source: PathBuf, ingest: IngestedData, config: &SearchConfig) -> Result<RunOutput, AppError> {
    let started = Instant::now();
    let summary = ResultSummary::search(ingest.light_curve.clone(), config)?;
    info!(
        periods = summary.spectrum().len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search finished"
    );

    Ok(RunOutput {
        source,
        ingest,
        summary,
    })
}
