//! Ratatui-based terminal UI.
//!
//! Three views of one search: the raw light curve, the periodogram with the
//! best period marked, and the light curve folded at the best period with the
//! step model overlaid. Arrow keys rescale the transit duration and re-run the
//! search on the already-loaded data.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};

use crate::app::pipeline::{RunOutput, search_ingested};
use crate::domain::SearchConfig;
use crate::error::AppError;

mod chart;

use chart::TransitChart;

/// Duration step applied by the arrow keys.
const DURATION_STEP: f64 = 0.1;

/// Samples used to draw the step model overlay.
const MODEL_SAMPLES: usize = 400;

/// Start the TUI on a finished run.
pub fn run(initial: RunOutput) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(initial);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    LightCurve,
    Periodogram,
    Folded,
}

impl View {
    const ALL: [View; 3] = [View::LightCurve, View::Periodogram, View::Folded];

    fn title(self) -> &'static str {
        match self {
            View::LightCurve => "1 Light curve",
            View::Periodogram => "2 Periodogram",
            View::Folded => "3 Folded",
        }
    }

    fn next(self) -> Self {
        match self {
            View::LightCurve => View::Periodogram,
            View::Periodogram => View::Folded,
            View::Folded => View::LightCurve,
        }
    }

    fn index(self) -> usize {
        match self {
            View::LightCurve => 0,
            View::Periodogram => 1,
            View::Folded => 2,
        }
    }
}

struct App {
    run: RunOutput,
    config: SearchConfig,
    view: View,
    status: String,
}

impl App {
    fn new(run: RunOutput) -> Self {
        let config = run.summary.config().clone();
        Self {
            run,
            config,
            view: View::Periodogram,
            status: "Ready.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.view = View::LightCurve,
            KeyCode::Char('2') => self.view = View::Periodogram,
            KeyCode::Char('3') => self.view = View::Folded,
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::Left => self.rescale_duration(1.0 - DURATION_STEP),
            KeyCode::Right => self.rescale_duration(1.0 + DURATION_STEP),
            _ => {}
        }
        false
    }

    /// Scale every trial duration and re-run; a failed run keeps the previous one.
    fn rescale_duration(&mut self, factor: f64) {
        let mut config = self.config.clone();
        config.durations = scale_durations(&config.durations, factor);

        match search_ingested(self.run.source.clone(), self.run.ingest.clone(), &config) {
            Ok(run) => {
                self.status = format!(
                    "durations: {} | best {:.6} d",
                    fmt_durations(&config.durations),
                    run.summary.best().period
                );
                self.run = run;
                self.config = config;
            }
            Err(err) => {
                self.status = format!("Search failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_chart(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let best = self.run.summary.best();
        let lines = vec![
            Line::from(vec![
                Span::styled("bls", Style::default().fg(Color::Cyan)),
                Span::raw(format!(
                    " {} | n={} | durations: {} d",
                    self.run.source.display(),
                    self.run.ingest.stats.n_points,
                    fmt_durations(&self.config.durations)
                )),
            ]),
            Line::from(Span::styled(
                format!(
                    "Best Period: {:.6} days | BLS Power: {:.3} | depth={:.5} | duration={:.4}",
                    best.period, best.power, best.depth, best.duration
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tabs = Tabs::new(View::ALL.iter().map(|v| v.title()).collect::<Vec<_>>())
            .select(self.view.index())
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let series = view_series(&self.run, self.view);
        let widget = TransitChart {
            line: &series.line,
            points: &series.points,
            marker_x: series.marker_x,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: series.x_label,
            y_label: series.y_label,
            fmt_x: fmt_axis,
            fmt_y: fmt_axis,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1/2/3/Tab view  ←/→ duration -/+10%  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Everything the chart widget needs for one view.
struct ViewSeries {
    line: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
    marker_x: Option<f64>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_label: &'static str,
    y_label: &'static str,
}

fn view_series(run: &RunOutput, view: View) -> ViewSeries {
    let summary = &run.summary;
    match view {
        View::LightCurve => {
            let mut line: Vec<(f64, f64)> = summary.light_curve().points().collect();
            line.sort_by(|a, b| a.0.total_cmp(&b.0));
            let (x_bounds, y_bounds) = bounds(&line, &[]);
            ViewSeries {
                line,
                points: Vec::new(),
                marker_x: None,
                x_bounds,
                y_bounds,
                x_label: "time (days)",
                y_label: "flux",
            }
        }
        View::Periodogram => {
            let line = summary.spectrum().points();
            let (x_bounds, y_bounds) = bounds(&line, &[]);
            ViewSeries {
                line,
                points: Vec::new(),
                marker_x: Some(summary.best().period),
                x_bounds,
                y_bounds,
                x_label: "period (days)",
                y_label: "power",
            }
        }
        View::Folded => {
            let points = summary.folded_points();
            let line = summary.model_curve(MODEL_SAMPLES);
            let (_, y_bounds) = bounds(&line, &points);
            ViewSeries {
                line,
                points,
                marker_x: None,
                x_bounds: [0.0, 1.0],
                y_bounds,
                x_label: "phase",
                y_label: "flux",
            }
        }
    }
}

/// X bounds of `a` and `b` combined, and padded y bounds.
fn bounds(a: &[(f64, f64)], b: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in a.iter().chain(b.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        x_min = 0.0;
        x_max = 1.0;
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    } else if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    ([x_min, x_max], [y_min - pad, y_max + pad])
}

fn scale_durations(durations: &[f64], factor: f64) -> Vec<f64> {
    durations.iter().map(|d| d * factor).collect()
}

fn fmt_durations(durations: &[f64]) -> String {
    durations
        .iter()
        .map(|d| format!("{d:.4}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_axis(v: f64) -> String {
    if v != 0.0 && v.abs() < 1e-2 {
        format!("{v:.1e}")
    } else {
        format!("{v:.2}")
    }
}
