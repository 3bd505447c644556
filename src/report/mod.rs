//! Reporting utilities: periodogram peaks and formatted terminal output.

use crate::domain::PowerSpectrum;

pub mod format;

pub use format::*;

/// A local maximum of the periodogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub period: f64,
    pub power: f64,
    pub depth: f64,
    pub duration: f64,
}

/// Top-`n` local maxima of power, by descending power then grid index.
///
/// A plateau counts once, at its first index. Zero-power entries are never
/// peaks.
pub fn find_peaks(spectrum: &PowerSpectrum, n: usize) -> Vec<Peak> {
    let power = spectrum.power();
    let mut peaks: Vec<Peak> = (0..power.len())
        .filter(|&i| {
            let p = power[i];
            let rises = i == 0 || p > power[i - 1];
            let holds = i + 1 == power.len() || p >= power[i + 1];
            p > 0.0 && rises && holds
        })
        .filter_map(|i| spectrum.entry(i).map(|e| (i, e)))
        .map(|(index, e)| Peak {
            index,
            period: e.period,
            power: e.power,
            depth: e.depth,
            duration: e.duration,
        })
        .collect();

    peaks.sort_by(|a, b| b.power.total_cmp(&a.power).then(a.index.cmp(&b.index)));
    peaks.truncate(n);
    peaks
}
