//! Full pipeline: synthetic CSV on disk -> load -> search -> report/exports.

use std::fs;

use bls_transit::app::pipeline::run_search;
use bls_transit::data::generate_transit_curve;
use bls_transit::domain::{SearchConfig, SimulationConfig};
use bls_transit::io::{read_spectrum_json, spectrum_from_grid, write_light_curve_csv, write_spectrum_json};
use bls_transit::plot::render_periodogram;
use bls_transit::report::{find_peaks, format_best, format_run_summary};

#[test]
fn recovers_simulated_transit_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("simulated_transit.csv");
    let curve = generate_transit_curve(&SimulationConfig::default()).unwrap();
    write_light_curve_csv(&csv, &curve).unwrap();

    let config = SearchConfig::default();
    let run = run_search(&csv, &config).unwrap();
    let best = run.summary.best();
    let step = (config.max_period - config.min_period) / (config.period_count as f64 - 1.0);

    assert_eq!(run.ingest.rows_used, 2000);
    assert_eq!(run.summary.spectrum().len(), 5000);
    assert!((best.period - 3.0).abs() <= step, "period={}", best.period);
    assert!((best.depth - 0.05).abs() / 0.05 < 0.05, "depth={}", best.depth);

    let model = run.summary.model().unwrap();
    assert!((model.depth - 0.05).abs() < 0.005, "model depth={}", model.depth);

    let headline = format_best(best);
    let period: f64 = headline
        .lines()
        .next()
        .and_then(|l| l.strip_prefix("Best Period: "))
        .and_then(|l| l.strip_suffix(" days"))
        .unwrap()
        .parse()
        .unwrap();
    assert!((period - best.period).abs() < 1e-6);

    let report = format_run_summary(&run.ingest, &run.summary, 3);
    assert!(report.contains("Top peaks:"));
    assert_eq!(find_peaks(run.summary.spectrum(), 3)[0].index, best.index);
}

#[test]
fn spectrum_export_replots() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("lc.csv");
    let json = dir.path().join("spectrum.json");
    let curve = generate_transit_curve(&SimulationConfig {
        samples: 800,
        span: 16.0,
        period: 2.2,
        duration: 0.15,
        depth: 0.02,
        noise: 0.001,
        ..SimulationConfig::default()
    })
    .unwrap();
    write_light_curve_csv(&csv, &curve).unwrap();

    let config = SearchConfig {
        min_period: 1.0,
        max_period: 4.0,
        period_count: 600,
        durations: vec![0.15],
        ..SearchConfig::default()
    };
    let run = run_search(&csv, &config).unwrap();
    write_spectrum_json(&json, &run.summary, Some(csv.as_path())).unwrap();

    let file = read_spectrum_json(&json).unwrap();
    assert_eq!(file.best.index, run.summary.best().index);
    let spectrum = spectrum_from_grid(&file.grid);
    let plot = render_periodogram(&spectrum, Some(file.best.period), 60, 12);
    assert_eq!(plot.lines().count(), 13);
    assert!(plot.contains('|'));
}

#[test]
fn loader_failures_map_to_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let config = SearchConfig::default();

    let no_flux = dir.path().join("no_flux.csv");
    fs::write(&no_flux, "time,brightness\n0,1\n1,1\n").unwrap();
    let err = run_search(&no_flux, &config).unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("`flux`"));

    let one_row = dir.path().join("one_row.csv");
    fs::write(&one_row, "time,flux\n0,1\n1,oops\n").unwrap();
    assert_eq!(run_search(&one_row, &config).unwrap_err().exit_code(), 3);

    let missing = dir.path().join("missing.csv");
    assert_eq!(run_search(&missing, &config).unwrap_err().exit_code(), 2);
}

#[test]
fn bad_grid_fails_before_searching() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("lc.csv");
    write_light_curve_csv(&csv, &generate_transit_curve(&SimulationConfig::default()).unwrap()).unwrap();

    let config = SearchConfig {
        min_period: 2.0,
        max_period: 2.0,
        ..SearchConfig::default()
    };
    assert_eq!(run_search(&csv, &config).unwrap_err().exit_code(), 2);
}
