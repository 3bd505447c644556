//! Interactive CSV picker.
//!
//! Running `bls` with no arguments lists the light curves found under the
//! current directory and asks which one to search. clap never sees this path;
//! the picker only hands back a validated CSV path.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// How deep below the working directory to look for CSV files.
const SEARCH_DEPTH: usize = 4;

const USAGE_HINT: &str = "Provide a light curve with `bls search -f <file.csv>`.";

/// Prompt on stdin/stdout for a CSV under the current directory.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(2, format!("No .csv files found. {USAGE_HINT}")));
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    choose_csv(&files, stdin.lock(), stdout.lock())
}

/// Pick one of `files` by number, or accept a typed path. `q` cancels.
pub fn choose_csv<R: BufRead, W: Write>(files: &[PathBuf], mut input: R, mut out: W) -> Result<PathBuf, AppError> {
    let io_err = |e: io::Error| AppError::new(2, format!("Terminal I/O failed: {e}"));

    writeln!(out, "Light curves found ({}):", files.len()).map_err(io_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, display_path(path)).map_err(io_err)?;
    }

    loop {
        write!(out, "Choose 1-{} or enter a path (q quits): ", files.len()).map_err(io_err)?;
        out.flush().map_err(io_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(io_err)? == 0 {
            return Err(AppError::new(2, format!("No selection made. {USAGE_HINT}")));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        let picked = match answer.parse::<usize>() {
            Ok(n) if (1..=files.len()).contains(&n) => validate_csv_path(&files[n - 1]),
            Ok(n) => Err(AppError::new(2, format!("No file numbered {n}."))),
            Err(_) => validate_csv_path(Path::new(answer)),
        };
        match picked {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(io_err)?,
        }
    }
}

/// Check that `path` names an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        let what = if path.is_dir() { "is a directory" } else { "does not exist" };
        return Err(AppError::new(2, format!("{} {what}.", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("{} is not a .csv file. {USAGE_HINT}", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// Find `*.csv` files below `root`, sorted by displayed path.
///
/// VCS and build directories are skipped.
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    walk(root, 0, &mut found);
    found.sort_by_key(|p| display_path(p));
    found
}

fn walk(dir: &Path, depth: usize, found: &mut Vec<PathBuf>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(kind) = entry.file_type() else {
            continue;
        };
        if kind.is_dir() {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if !matches!(name, ".git" | "target" | "node_modules") {
                walk(&path, depth + 1, found);
            }
        } else if kind.is_file() && has_csv_extension(&path) {
            found.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}
