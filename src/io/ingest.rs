//! CSV ingest and validation.
//!
//! This module turns a tabular light curve into a validated [`LightCurve`].
//!
//! Design goals:
//! - **Strict schema** for required columns (`time`, `flux`)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no search logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{DatasetStats, LightCurve};
use crate::error::BlsError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: validated light curve + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub light_curve: LightCurve,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a light curve from a CSV file with `time` and `flux` columns.
pub fn load_light_curve(path: &Path) -> Result<IngestedData, BlsError> {
    let file = File::open(path).map_err(|e| BlsError::UnreadableFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    read_light_curve(file, path)
}

/// Read a light curve from any CSV source. `path` is only used for messages.
pub fn read_light_curve<R: std::io::Read>(source: R, path: &Path) -> Result<IngestedData, BlsError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| BlsError::UnreadableFile {
            path: path.to_path_buf(),
            reason: format!("failed to read CSV headers: {e}"),
        })?
        .clone();

    let header_map = build_header_map(&headers);
    let time_idx = *header_map
        .get("time")
        .ok_or(BlsError::MissingColumn { column: "time" })?;
    let flux_idx = *header_map
        .get("flux")
        .ok_or(BlsError::MissingColumn { column: "flux" })?;

    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, time_idx, flux_idx) {
            Ok((t, f)) => {
                time.push(t);
                flux.push(f);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = time.len();
    if !row_errors.is_empty() {
        warn!(
            skipped = row_errors.len(),
            rows_read,
            "skipped rows that could not be parsed"
        );
    }
    debug!(rows_read, rows_used, path = %path.display(), "light curve loaded");

    if rows_used < 2 {
        return Err(BlsError::InsufficientData(rows_used));
    }

    let light_curve = LightCurve::new(time, flux)?;
    let stats = DatasetStats::from_light_curve(&light_curve);

    Ok(IngestedData {
        light_curve,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    // First occurrence wins for duplicated names.
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, time_idx: usize, flux_idx: usize) -> Result<(f64, f64), String> {
    let t = parse_field(record, time_idx, "time")?;
    let f = parse_field(record, flux_idx, "flux")?;
    Ok((t, f))
}

fn parse_field(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{name}` value."))?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{raw}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite `{name}` value '{raw}'."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<IngestedData, BlsError> {
        read_light_curve(csv.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn reads_time_and_flux_in_any_column_order() {
        let data = read("flux,quality,time\n1.0,0,0.5\n0.98,0,1.0\n1.01,1,1.5\n").unwrap();
        assert_eq!(data.light_curve.time(), &[0.5, 1.0, 1.5]);
        assert_eq!(data.light_curve.flux(), &[1.0, 0.98, 1.01]);
        assert_eq!(data.rows_used, 3);
        assert!(data.row_errors.is_empty());
        assert!((data.stats.time_span() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn header_names_are_normalized() {
        let data = read("\u{feff}Time , FLUX\n0,1\n1,1\n").unwrap();
        assert_eq!(data.light_curve.len(), 2);
    }

    #[test]
    fn missing_columns_are_reported() {
        assert_eq!(
            read("t,flux\n0,1\n").unwrap_err(),
            BlsError::MissingColumn { column: "time" }
        );
        assert_eq!(
            read("time,brightness\n0,1\n").unwrap_err(),
            BlsError::MissingColumn { column: "flux" }
        );
    }

    #[test]
    fn bad_rows_are_skipped_and_recorded() {
        let data = read("time,flux\n0,1\n1,abc\n2,\n3,nan\n4,0.99\n").unwrap();
        assert_eq!(data.rows_read, 5);
        assert_eq!(data.rows_used, 2);
        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        assert_eq!(
            read("time,flux\n0,1\n").unwrap_err(),
            BlsError::InsufficientData(1)
        );
    }

    #[test]
    fn unreadable_file_is_reported() {
        let err = load_light_curve(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, BlsError::UnreadableFile { .. }));
    }
}
