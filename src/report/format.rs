//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the search code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{BestFit, SearchConfig};
use crate::io::ingest::IngestedData;
use crate::report::{Peak, find_peaks};
use crate::search::ResultSummary;

/// The two headline lines: best period and its power.
pub fn format_best(best: &BestFit) -> String {
    format!(
        "Best Period: {:.6} days\nBLS Power: {:.3}\n",
        best.period, best.power
    )
}

/// Format the full run summary (dataset stats + grid + best fit + peaks).
pub fn format_run_summary(ingest: &IngestedData, summary: &ResultSummary, top_n: usize) -> String {
    let mut out = String::new();
    let stats = &ingest.stats;

    out.push_str("=== bls - Box Least Squares transit search ===\n");
    out.push_str(&format!(
        "Points: n={} (rows read {}, skipped {})\n",
        stats.n_points,
        ingest.rows_read,
        ingest.row_errors.len()
    ));
    out.push_str(&format!(
        "Time: [{:.4}, {:.4}] span={:.4} days\n",
        stats.time_min,
        stats.time_max,
        stats.time_span()
    ));
    out.push_str(&format!(
        "Flux: [{:.6}, {:.6}] mean={:.6}\n",
        stats.flux_min, stats.flux_max, stats.flux_mean
    ));
    out.push_str(&format_grid(summary.config()));

    let degenerate = summary.spectrum().degenerate();
    if degenerate > 0 {
        out.push_str(&format!(
            "Degenerate: {degenerate} (period, duration) pairs recorded with zero power\n"
        ));
    }

    out.push('\n');
    out.push_str(&format_best(summary.best()));

    let best = summary.best();
    out.push_str(&format!(
        "Depth: {:.6} | Duration: {:.4} days | Transit time: {:.6}\n",
        best.depth, best.duration, best.transit_time
    ));
    if let Some(model) = summary.model() {
        out.push_str(&format!(
            "Step model: baseline={:.6} depth={:.6} n_in={} rmse={:.3e}\n",
            model.baseline, model.depth, model.n_in, model.rmse
        ));
    }

    if top_n > 0 {
        out.push_str("\nTop peaks:\n");
        out.push_str(&format_peaks(&find_peaks(summary.spectrum(), top_n)));
    }

    out
}

/// Describe the period/duration grid.
pub fn format_grid(config: &SearchConfig) -> String {
    format!(
        "Grid: {} periods in [{:.4}, {:.4}] days ({}) | durations: {} days\n",
        config.period_count,
        config.min_period,
        config.max_period,
        config.spacing.display_name(),
        fmt_vec(&config.durations),
    )
}

/// Format a peaks table.
pub fn format_peaks(peaks: &[Peak]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>4} {:>12} {:>10} {:>12} {:>10}", "rank", "period", "power", "depth", "duration").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<4} {:-<12} {:-<10} {:-<12} {:-<10}", "", "", "", "", "").trim_end());
    out.push('\n');

    for (rank, p) in peaks.iter().enumerate() {
        out.push_str(
            format!(
                "{:>4} {:>12.6} {:>10.3} {:>12.6} {:>10.4}",
                rank + 1,
                p.period,
                p.power,
                p.depth,
                p.duration
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.4}")).collect();
    format!("[{}]", parts.join(", "))
}
