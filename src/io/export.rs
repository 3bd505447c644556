//! CSV exports.
//!
//! Both files are meant to be easy to consume in spreadsheets or downstream
//! scripts. The light-curve export uses the same `time,flux` schema the loader
//! reads, so simulated data can be fed straight back into a search.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{LightCurve, PowerSpectrum};
use crate::error::AppError;

/// Write the full periodogram, one row per trial period.
pub fn write_periodogram_csv(path: &Path, spectrum: &PowerSpectrum) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create periodogram CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);

    writeln!(out, "period,power,depth,duration,offset_phase")
        .map_err(|e| AppError::new(2, format!("Failed to write periodogram CSV header: {e}")))?;

    for idx in 0..spectrum.len() {
        let Some(e) = spectrum.entry(idx) else { break };
        writeln!(
            out,
            "{:.10},{:.10e},{:.10e},{:.6},{:.6}",
            e.period, e.power, e.depth, e.duration, e.offset_phase
        )
        .map_err(|e| AppError::new(2, format!("Failed to write periodogram CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write periodogram CSV: {e}")))?;
    Ok(())
}

/// Write a light curve as `time,flux` CSV.
pub fn write_light_curve_csv(path: &Path, curve: &LightCurve) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create light-curve CSV '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);

    writeln!(out, "time,flux")
        .map_err(|e| AppError::new(2, format!("Failed to write light-curve CSV header: {e}")))?;
    for (t, f) in curve.points() {
        writeln!(out, "{t:.8},{f:.8}")
            .map_err(|e| AppError::new(2, format!("Failed to write light-curve CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write light-curve CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpectrumEntry;

    #[test]
    fn periodogram_csv_has_one_row_per_period() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pgram.csv");
        let entries: Vec<SpectrumEntry> = (0..3)
            .map(|i| SpectrumEntry {
                period: 1.0 + i as f64,
                power: 0.5 * i as f64,
                depth: 0.01,
                duration: 0.1,
                offset_phase: 0.25,
            })
            .collect();
        write_periodogram_csv(&path, &PowerSpectrum::from_entries(&entries, 0)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "period,power,depth,duration,offset_phase");
        assert!(lines[2].starts_with("2.0000000000,"));
    }

    #[test]
    fn light_curve_csv_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lc.csv");
        let curve = LightCurve::new(vec![0.0, 0.5, 1.0], vec![1.0, 0.95, 1.0]).unwrap();
        write_light_curve_csv(&path, &curve).unwrap();

        let data = crate::io::load_light_curve(&path).unwrap();
        assert_eq!(data.light_curve, curve);
    }
}
