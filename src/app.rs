//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the light curve and runs the BLS search
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};

use crate::cli::{Command, PlotArgs, SearchArgs, SimulateArgs};
use crate::domain::{BinningOptions, SearchConfig, SimulationConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bls` binary.
pub fn run() -> Result<(), AppError> {
    // Optional per-project `.env` (RUST_LOG, BLS_THREADS).
    dotenvy::dotenv().ok();

    // We want `bls FILE.csv` and `bls -f FILE.csv` to behave like `bls search ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // The TUI owns the terminal; log lines would corrupt the screen.
    if !matches!(cli.command, Command::Tui(_)) {
        crate::logging::init(cli.verbose);
    }

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    configure_threads(args.threads);
    let path = resolve_input(args.file.clone())?;
    let config = search_config_from_args(&args);
    let run = pipeline::run_search(&path, &config)?;
    let summary = &run.summary;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, summary, args.top)
    );

    if !args.no_plot {
        let plots = [
            crate::plot::render_light_curve(summary.light_curve(), args.width, args.height),
            crate::plot::render_periodogram(
                summary.spectrum(),
                Some(summary.best().period),
                args.width,
                args.height,
            ),
            crate::plot::render_folded(
                &summary.folded_points(),
                Some(summary.model_curve(args.width.max(2) * 4).as_slice()),
                args.width,
                args.height,
            ),
        ];
        for plot in plots {
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(out) = &args.export {
        crate::io::export::write_periodogram_csv(out, summary.spectrum())?;
        debug!(path = %out.display(), "wrote periodogram CSV");
    }
    if let Some(out) = &args.export_spectrum {
        crate::io::spectrum::write_spectrum_json(out, summary, Some(run.source.as_path()))?;
        debug!(path = %out.display(), "wrote spectrum JSON");
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let config = simulation_config_from_args(&args);
    let curve = crate::data::generate_transit_curve(&config)?;
    crate::io::export::write_light_curve_csv(&args.output, &curve)?;
    println!(
        "Wrote {} samples to {} (period={} d, duration={} d, depth={})",
        curve.len(),
        args.output.display(),
        config.period,
        config.duration,
        config.depth
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::spectrum::read_spectrum_json(&args.spectrum)?;
    let spectrum = crate::io::spectrum::spectrum_from_grid(&file.grid);

    print!("{}", crate::report::format_best(&file.best));
    let plot = crate::plot::render_periodogram(&spectrum, Some(file.best.period), args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_tui(args: SearchArgs) -> Result<(), AppError> {
    configure_threads(args.threads);
    let path = resolve_input(args.file.clone())?;
    let config = search_config_from_args(&args);
    // Load and search before taking over the terminal so failures print normally.
    let run = pipeline::run_search(&path, &config)?;
    crate::tui::run(run)
}

fn resolve_input(file: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match file {
        Some(path) => Ok(path),
        None => crate::cli::picker::prompt_for_csv_path(),
    }
}

/// Bound the global rayon pool. Only the first call in a process takes effect.
fn configure_threads(threads: Option<usize>) {
    let Some(n) = threads.filter(|&n| n > 0) else {
        return;
    };
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
        warn!("could not size the search thread pool: {e}");
    }
}

pub fn search_config_from_args(args: &SearchArgs) -> SearchConfig {
    SearchConfig {
        min_period: args.min_period,
        max_period: args.max_period,
        period_count: args.period_count,
        spacing: args.spacing,
        durations: args.durations.clone(),
        binning: BinningOptions {
            oversample: args.oversample,
            min_bins: args.min_bins,
        },
    }
}

pub fn simulation_config_from_args(args: &SimulateArgs) -> SimulationConfig {
    SimulationConfig {
        samples: args.samples,
        span: args.span,
        period: args.period,
        duration: args.duration,
        depth: args.depth,
        epoch: args.epoch,
        noise: args.noise,
        seed: args.seed,
    }
}

/// Rewrite argv so shorthand forms reach the `search` subcommand.
///
/// Rules:
/// - `bls`                         -> `bls search` (prompts for a CSV)
/// - `bls FILE.csv ...`            -> `bls search -f FILE.csv ...`
/// - `bls -f FILE.csv ...`         -> `bls search -f FILE.csv ...`
/// - `bls --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("search".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "search" | "simulate" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // Global verbosity flags may come first: `bls -v FILE.csv`.
    let is_verbosity = arg1 == "--verbose"
        || (arg1.starts_with("-v") && arg1.trim_start_matches('-').chars().all(|c| c == 'v'));
    if is_verbosity {
        let rest = rewrite_args(std::iter::once(argv[0].clone()).chain(argv[2..].iter().cloned()).collect());
        let mut out = vec![rest[0].clone(), arg1];
        out.extend(rest.into_iter().skip(1));
        return out;
    }

    // If the first token is a flag, treat it as "search flags".
    if arg1.starts_with('-') {
        argv.insert(1, "search".to_string());
        return argv;
    }

    // A bare path is the light curve to search.
    argv.insert(1, "-f".to_string());
    argv.insert(1, "search".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_search_picker() {
        assert_eq!(rewrite_args(argv(&["bls"])), argv(&["bls", "search"]));
    }

    #[test]
    fn bare_path_becomes_search_file() {
        assert_eq!(
            rewrite_args(argv(&["bls", "lc.csv", "--periods", "100"])),
            argv(&["bls", "search", "-f", "lc.csv", "--periods", "100"])
        );
    }

    #[test]
    fn leading_flags_go_to_search() {
        assert_eq!(
            rewrite_args(argv(&["bls", "-f", "lc.csv"])),
            argv(&["bls", "search", "-f", "lc.csv"])
        );
        assert_eq!(
            rewrite_args(argv(&["bls", "-vv", "lc.csv"])),
            argv(&["bls", "-vv", "search", "-f", "lc.csv"])
        );
        // Bare dashes are not verbosity flags.
        assert_eq!(rewrite_args(argv(&["bls", "-"])), argv(&["bls", "search", "-"]));
        assert_eq!(
            rewrite_args(argv(&["bls", "--", "lc.csv"])),
            argv(&["bls", "search", "--", "lc.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["bls", "plot", "--spectrum", "s.json"]),
            argv(&["bls", "--help"]),
            argv(&["bls", "tui", "-f", "lc.csv"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn search_config_maps_flags() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "bls", "search", "-f", "lc.csv", "--min-period", "1", "--max-period", "4", "--periods",
            "300", "--oversample", "10", "--min-bins", "64",
        ]));
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        let config = search_config_from_args(&args);
        assert_eq!(config.min_period, 1.0);
        assert_eq!(config.max_period, 4.0);
        assert_eq!(config.period_count, 300);
        assert_eq!(config.binning, BinningOptions { oversample: 10.0, min_bins: 64 });
    }
}
