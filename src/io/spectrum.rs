//! Read/write spectrum JSON files.
//!
//! Spectrum JSON is the "portable" representation of a finished search:
//! - the search configuration that produced it
//! - the best fit (period, power, depth, duration, transit time)
//! - the full periodogram, column by column
//!
//! `bls plot --spectrum` reloads these files without re-running the search.
//! The schema is defined by `domain::SpectrumFile`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;

use crate::domain::{PowerSpectrum, SpectrumEntry, SpectrumFile, SpectrumGrid};
use crate::error::AppError;
use crate::search::ResultSummary;

/// Name stamped into every spectrum file.
pub const TOOL_NAME: &str = "bls";

/// Build the serializable form of a search result.
pub fn spectrum_file(summary: &ResultSummary, source: Option<&Path>) -> SpectrumFile {
    let spectrum = summary.spectrum();
    SpectrumFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        source: source.map(Path::to_path_buf),
        config: summary.config().clone(),
        best: *summary.best(),
        grid: SpectrumGrid {
            period: spectrum.periods().to_vec(),
            power: spectrum.power().to_vec(),
            depth: spectrum.depth().to_vec(),
            duration: spectrum.durations().to_vec(),
            offset_phase: spectrum.offset_phase().to_vec(),
        },
    }
}

/// Write a spectrum JSON file.
pub fn write_spectrum_json(path: &Path, summary: &ResultSummary, source: Option<&Path>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create spectrum JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &spectrum_file(summary, source))
        .map_err(|e| AppError::new(2, format!("Failed to write spectrum JSON: {e}")))?;

    Ok(())
}

/// Read a spectrum JSON file, checking that its columns line up.
pub fn read_spectrum_json(path: &Path) -> Result<SpectrumFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open spectrum JSON '{}': {e}", path.display())))?;
    let spectrum: SpectrumFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid spectrum JSON: {e}")))?;
    validate_grid(&spectrum.grid)?;
    Ok(spectrum)
}

/// Rebuild a [`PowerSpectrum`] from a saved grid.
///
/// Files written before `offset_phase` was stored load with zero offsets.
pub fn spectrum_from_grid(grid: &SpectrumGrid) -> PowerSpectrum {
    let entries: Vec<SpectrumEntry> = (0..grid.period.len())
        .map(|i| SpectrumEntry {
            period: grid.period[i],
            power: grid.power[i],
            depth: grid.depth[i],
            duration: grid.duration[i],
            offset_phase: grid.offset_phase.get(i).copied().unwrap_or(0.0),
        })
        .collect();
    PowerSpectrum::from_entries(&entries, 0)
}

fn validate_grid(grid: &SpectrumGrid) -> Result<(), AppError> {
    let n = grid.period.len();
    if n == 0 {
        return Err(AppError::new(2, "Invalid spectrum JSON: empty period grid."));
    }
    let columns = [
        ("power", grid.power.len()),
        ("depth", grid.depth.len()),
        ("duration", grid.duration.len()),
    ];
    for (name, len) in columns {
        if len != n {
            return Err(AppError::new(
                2,
                format!("Invalid spectrum JSON: `{name}` has {len} values, expected {n}."),
            ));
        }
    }
    if !grid.offset_phase.is_empty() && grid.offset_phase.len() != n {
        return Err(AppError::new(
            2,
            format!(
                "Invalid spectrum JSON: `offset_phase` has {} values, expected {n}.",
                grid.offset_phase.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LightCurve, SearchConfig};

    fn summary() -> ResultSummary {
        let time: Vec<f64> = (0..600).map(|i| i as f64 * 0.02).collect();
        let flux = time
            .iter()
            .map(|&t| if t.rem_euclid(2.5) < 0.2 { 0.98 } else { 1.0 })
            .collect();
        let config = SearchConfig {
            min_period: 1.0,
            max_period: 4.0,
            period_count: 120,
            durations: vec![0.2],
            ..SearchConfig::default()
        };
        ResultSummary::search(LightCurve::new(time, flux).unwrap(), &config).unwrap()
    }

    #[test]
    fn spectrum_json_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrum.json");
        let summary = summary();
        write_spectrum_json(&path, &summary, Some(Path::new("input.csv"))).unwrap();

        let file = read_spectrum_json(&path).unwrap();
        assert_eq!(file.tool, "bls");
        assert_eq!(file.source.as_deref(), Some(Path::new("input.csv")));
        assert_eq!(file.config.period_count, 120);
        assert_eq!(file.best.index, summary.best().index);

        let reloaded = spectrum_from_grid(&file.grid);
        assert_eq!(reloaded.len(), summary.spectrum().len());
        for (a, b) in reloaded.power().iter().zip(summary.spectrum().power()) {
            assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0));
        }
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let grid = SpectrumGrid {
            period: vec![1.0, 2.0],
            power: vec![0.1],
            depth: vec![0.0, 0.0],
            duration: vec![0.1, 0.1],
            offset_phase: Vec::new(),
        };
        let err = validate_grid(&grid).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`power`"));
    }
}
