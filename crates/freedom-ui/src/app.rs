//! Main application state and TUI event loop for the freedom index
//! dashboard.
//!
//! [`App`] owns the theme, the view mode and the [`DashboardSession`]. Key
//! presses drive the session; file reloads run through the background
//! [`FileLoader`] and are applied when their outcome arrives.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use freedom_runtime::loader::{FileLoader, LoadOutcome};
use freedom_runtime::session::DashboardSession;

use crate::chart_view;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Sortable, paginated record table.
    Table,
    /// Status, region and trend charts.
    Charts,
}

impl ViewMode {
    /// `"charts"` selects the chart view; anything else the table.
    pub fn from_name(name: &str) -> Self {
        match name {
            "charts" => ViewMode::Charts,
            _ => ViewMode::Table,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Table => ViewMode::Charts,
            ViewMode::Charts => ViewMode::Table,
        }
    }
}

// ── AppAction ─────────────────────────────────────────────────────────────────

/// What the event loop must do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    /// Re-read the source file in the background.
    Reload,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub session: DashboardSession,
    /// File reloaded by `r`; `None` when started without one.
    pub source_path: Option<PathBuf>,
    /// Year substituted for missing years on reload.
    pub fallback_year: i32,
    /// Generation of the newest reload still in flight.
    pub pending_generation: Option<u64>,
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode, session: DashboardSession) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            session,
            source_path: None,
            fallback_year: chrono_year(),
            pending_generation: None,
            should_quit: false,
        }
    }

    /// Set the file that `r` reloads.
    pub fn with_source(mut self, path: Option<PathBuf>, fallback_year: i32) -> Self {
        self.source_path = path;
        self.fallback_year = fallback_year;
        self
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard until `q` / `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the terminal
    /// loop stays on the current thread while load outcomes arrive on `rx`
    /// via `try_recv`. When a source path is set and nothing is loaded yet,
    /// the first load starts immediately.
    pub async fn run(
        mut self,
        mut loader: FileLoader,
        mut rx: mpsc::Receiver<LoadOutcome>,
    ) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        if self.session.source().is_none() {
            self.start_reload(&mut loader);
        }

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    match self.handle_key(key) {
                        AppAction::Quit => break Ok(()),
                        AppAction::Reload => self.start_reload(&mut loader),
                        AppAction::None => {}
                    }
                }
            }

            // Drain any finished loads (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(outcome) => self.apply_outcome(outcome),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the session and view state.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.kind == KeyEventKind::Release {
            return AppAction::None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return AppAction::Quit;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return AppAction::Quit,
            KeyCode::Char('r') => return AppAction::Reload,
            KeyCode::Tab => self.view_mode = self.view_mode.toggled(),
            KeyCode::Right => self.session.next_page(),
            KeyCode::Left => self.session.prev_page(),
            KeyCode::Char('s') => self.session.cycle_status(),
            KeyCode::Char('g') => self.session.cycle_region(),
            KeyCode::Char('c') => self.session.clear_filter(),
            KeyCode::Char(d @ '1'..='9') => self.sort_by_column(d),
            _ => {}
        }
        AppAction::None
    }

    /// `true` until the newest requested reload has reported back.
    pub fn is_loading(&self) -> bool {
        self.pending_generation.is_some()
    }

    /// Apply a finished background load. A failure keeps the current data.
    ///
    /// Every outcome is applied in arrival order; only the newest requested
    /// generation ends the loading state.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        if self
            .pending_generation
            .is_some_and(|pending| outcome.generation >= pending)
        {
            self.pending_generation = None;
        }
        let replaced = self.session.apply_ingestion(outcome.result);
        if replaced {
            tracing::info!(
                generation = outcome.generation,
                path = %outcome.path.display(),
                records = self.session.records().len(),
                "loaded source"
            );
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn sort_by_column(&mut self, digit: char) {
        let Some(n) = digit.to_digit(10) else {
            return;
        };
        let columns = table_view::visible_columns(&self.session.extra_columns());
        if let Some(key) = columns.get(n as usize - 1) {
            self.session.toggle_sort(key.clone());
        }
    }

    fn start_reload(&mut self, loader: &mut FileLoader) {
        match self.source_path.clone() {
            Some(path) => {
                self.pending_generation = Some(loader.spawn(path, self.fallback_year));
            }
            None => tracing::debug!("reload requested without a source file"),
        }
    }

    fn source_label(&self) -> String {
        self.session
            .source()
            .and_then(|m| m.source.as_ref())
            .or(self.source_path.as_ref())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no file".to_string())
    }

    fn footer_line(&self) -> Line<'_> {
        if self.is_loading() {
            return Line::from(Span::styled("Loading…", self.theme.dim));
        }
        if let Some(err) = self.session.last_error() {
            return Line::from(vec![
                Span::styled("Error: ", self.theme.error),
                Span::styled(err.to_string(), self.theme.error),
                Span::styled("  (previous data kept)", self.theme.dim),
            ]);
        }
        Line::from(Span::styled(
            "Tab view · ←/→ page · 1-9 sort · s status · g region · c clear · r reload · q quit",
            self.theme.dim,
        ))
    }

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let source = self.source_label();
        let filter = self.session.filter().describe();
        let header = Header::new(&source, self.session.filtered().len(), &filter, &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        if self.session.records().is_empty() {
            let message = if self.is_loading() {
                "Loading source file…"
            } else {
                "No data loaded"
            };
            table_view::render_no_data(frame, body_area, message, &self.theme);
        } else {
            match (self.view_mode, self.session.stats()) {
                (_, None) => table_view::render_no_data(
                    frame,
                    body_area,
                    "No records match the filter",
                    &self.theme,
                ),
                (ViewMode::Table, Some(_)) => table_view::render_table_view(
                    frame,
                    body_area,
                    &self.session.current_page(),
                    self.session.sort(),
                    &self.session.extra_columns(),
                    &self.theme,
                ),
                (ViewMode::Charts, Some(stats)) => {
                    chart_view::render_chart_view(frame, body_area, stats, &self.theme)
                }
            }
        }

        frame.render_widget(Paragraph::new(self.footer_line()), footer_area);
    }
}

fn chrono_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
