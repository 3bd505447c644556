//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - traces and model overlays: `-` line
//! - folded samples: `.`
//! - best period marker: `|` column

use crate::domain::{LightCurve, PowerSpectrum};

/// Render the raw light curve as a line in time order.
pub fn render_light_curve(curve: &LightCurve, width: usize, height: usize) -> String {
    let mut points: Vec<(f64, f64)> = curve.points().collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (t_min, t_max) = x_range(&points).unwrap_or((0.0, 1.0));
    let mut canvas = Canvas::new(width, height, y_range(&[points.as_slice()])).with_x(t_min, t_max);
    canvas.draw_curve(&points, '-');

    let header = format!(
        "Light curve: time=[{t_min:.3}, {t_max:.3}] | flux=[{:.5}, {:.5}]",
        canvas.y_min, canvas.y_max
    );
    canvas.render(&header)
}

/// Render power against period, marking `best_period` with a `|` column.
pub fn render_periodogram(
    spectrum: &PowerSpectrum,
    best_period: Option<f64>,
    width: usize,
    height: usize,
) -> String {
    let points = spectrum.points();
    let (p_min, p_max) = x_range(&points).unwrap_or((0.0, 1.0));
    let mut canvas = Canvas::new(width, height, y_range(&[points.as_slice()])).with_x(p_min, p_max);

    // Curve first so the marker only fills empty cells.
    canvas.draw_curve(&points, '-');
    let mut header = format!(
        "Periodogram: period=[{p_min:.3}, {p_max:.3}] days | power=[{:.3}, {:.3}]",
        canvas.y_min, canvas.y_max
    );
    if let Some(best) = best_period {
        canvas.draw_column(best, '|');
        header.push_str(&format!(" | best={best:.6}"));
    }

    canvas.render(&header)
}

/// Render folded `(phase, flux)` samples with an optional model overlay.
pub fn render_folded(points: &[(f64, f64)], model: Option<&[(f64, f64)]>, width: usize, height: usize) -> String {
    let model = model.unwrap_or(&[]);
    let mut canvas = Canvas::new(width, height, y_range(&[points, model])).with_x(0.0, 1.0);

    // Draw model first (so points can overlay).
    canvas.draw_curve(model, '-');
    for &(phase, flux) in points {
        canvas.plot(phase, flux, '.');
    }

    let header = format!(
        "Folded: phase=[0, 1] | flux=[{:.5}, {:.5}]",
        canvas.y_min, canvas.y_max
    );
    canvas.render(&header)
}

struct Canvas {
    grid: Vec<Vec<char>>,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Canvas {
    fn new(width: usize, height: usize, y_range: Option<(f64, f64)>) -> Self {
        let width = width.max(10);
        let height = height.max(5);
        let (y_min, y_max) = y_range.unwrap_or((0.0, 1.0));
        let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
        Self {
            grid: vec![vec![' '; width]; height],
            x_min: 0.0,
            x_max: 1.0,
            y_min,
            y_max,
        }
    }

    fn with_x(mut self, x_min: f64, x_max: f64) -> Self {
        self.x_min = x_min;
        self.x_max = x_max;
        self
    }

    fn width(&self) -> usize {
        self.grid[0].len()
    }

    fn height(&self) -> usize {
        self.grid.len()
    }

    fn cell(&self, x: f64, y: f64) -> (usize, usize) {
        (
            map_x(x, self.x_min, self.x_max, self.width()),
            map_y(y, self.y_min, self.y_max, self.height()),
        )
    }

    fn plot(&mut self, x: f64, y: f64, ch: char) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let (col, row) = self.cell(x, y);
        self.grid[row][col] = ch;
    }

    fn draw_curve(&mut self, curve: &[(f64, f64)], ch: char) {
        let mut prev = None;
        for &(x, y) in curve {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let (col, row) = self.cell(x, y);
            if let Some((c0, r0)) = prev {
                draw_line(&mut self.grid, c0, r0, col, row, ch);
            } else {
                self.grid[row][col] = ch;
            }
            prev = Some((col, row));
        }
    }

    fn draw_column(&mut self, x: f64, ch: char) {
        if !x.is_finite() {
            return;
        }
        let col = map_x(x, self.x_min, self.x_max, self.width());
        for row in self.grid.iter_mut() {
            if row[col] == ' ' {
                row[col] = ch;
            }
        }
    }

    fn render(self, header: &str) -> String {
        let mut out = String::new();
        out.push_str(header);
        out.push('\n');
        for row in self.grid {
            out.push_str(&row.into_iter().collect::<String>());
            out.push('\n');
        }
        out
    }
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (min_x, max_x) = points
        .iter()
        .filter(|p| p.0.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(series: &[&[(f64, f64)]]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in series {
        for &(_, y) in s.iter().filter(|p| p.1.is_finite()) {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: centre it.
        Some((min_y - 0.5, max_y + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpectrumEntry;

    fn spectrum(points: &[(f64, f64)]) -> PowerSpectrum {
        let entries: Vec<SpectrumEntry> = points
            .iter()
            .map(|&(period, power)| SpectrumEntry {
                period,
                power,
                depth: 0.0,
                duration: 0.1,
                offset_phase: 0.0,
            })
            .collect();
        PowerSpectrum::from_entries(&entries, 0)
    }

    #[test]
    fn periodogram_golden_snapshot_small() {
        let spectrum = spectrum(&[(1.0, 0.0), (2.0, 1.0), (3.0, 0.0)]);
        let txt = render_periodogram(&spectrum, Some(2.0), 10, 5);
        let expected = concat!(
            "Periodogram: period=[1.000, 3.000] days | power=[-0.050, 1.050] | best=2.000000\n",
            "     -    \n",
            "    -|-   \n",
            "  -- | -  \n",
            " -   |  - \n",
            "-    |   -\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn folded_points_overlay_model() {
        let points = vec![(0.1, 1.0), (0.5, 0.9), (0.9, 1.0)];
        let model = vec![(0.0, 1.0), (1.0, 1.0)];
        let txt = render_folded(&points, Some(model.as_slice()), 20, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 7);
        // Baseline row holds the model line with two samples on top of it.
        assert_eq!(lines[1].matches('.').count(), 2);
        assert!(lines[1].contains('-'));
        assert_eq!(lines[6].matches('.').count(), 1);
    }

    #[test]
    fn light_curve_plot_has_fixed_size() {
        let curve = LightCurve::new(vec![2.0, 0.0, 1.0], vec![1.0, 1.0, 1.0]).unwrap();
        let txt = render_light_curve(&curve, 30, 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("Light curve: time=[0.000, 2.000]"));
        assert!(lines[1..].iter().all(|l| l.chars().count() == 30));
        // Flat flux sits on a single row.
        assert_eq!(lines.iter().filter(|l| l.contains('-')).count(), 1);
    }
}
