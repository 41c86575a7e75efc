use freedom_core::models::{Status, StatusBucket};
use freedom_data::aggregator::Trend;
use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are dark, 7–15 light. Absent or unparseable values yield
/// [`BackgroundType::Dark`].
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .map(background_from_colorfgbg)
        .unwrap_or(BackgroundType::Dark)
}

fn background_from_colorfgbg(value: &str) -> BackgroundType {
    match value.split(';').next_back().and_then(|bg| bg.parse::<u8>().ok()) {
        Some(bg) if bg > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// Every style used by the dashboard widgets.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,
    pub error: Style,

    // ── Status categories ────────────────────────────────────────────────────
    pub status_free: Style,
    pub status_partly_free: Style,
    pub status_not_free: Style,
    /// Any label outside the three canonical categories.
    pub status_other: Style,

    // ── Trend ────────────────────────────────────────────────────────────────
    pub trend_improving: Style,
    pub trend_declining: Style,
    pub trend_stable: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    /// Political rights bars in the region comparison.
    pub bar_primary: Style,
    /// Civil liberties bars in the region comparison.
    pub bar_secondary: Style,
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_header_active: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            status_free: Style::default().fg(Color::Green),
            status_partly_free: Style::default().fg(Color::Yellow),
            status_not_free: Style::default().fg(Color::Red),
            status_other: Style::default().fg(Color::Gray),

            trend_improving: Style::default().fg(Color::Green),
            trend_declining: Style::default().fg(Color::Red),
            trend_stable: Style::default().fg(Color::Cyan),

            bar_primary: Style::default().fg(Color::Cyan),
            bar_secondary: Style::default().fg(Color::Magenta),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_header_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),

            status_free: Style::default().fg(Color::Green),
            status_partly_free: Style::default().fg(Color::Yellow),
            status_not_free: Style::default().fg(Color::Red),
            status_other: Style::default().fg(Color::DarkGray),

            trend_improving: Style::default().fg(Color::Green),
            trend_declining: Style::default().fg(Color::Red),
            trend_stable: Style::default().fg(Color::Blue),

            bar_primary: Style::default().fg(Color::Blue),
            bar_secondary: Style::default().fg(Color::Magenta),
            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_header_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
        }
    }

    /// Plain theme without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),
            error: Style::default().fg(Color::Red),

            status_free: Style::default().fg(Color::Green),
            status_partly_free: Style::default().fg(Color::Yellow),
            status_not_free: Style::default().fg(Color::Red),
            status_other: Style::default().fg(Color::White),

            trend_improving: Style::default().fg(Color::Green),
            trend_declining: Style::default().fg(Color::Red),
            trend_stable: Style::default().fg(Color::White),

            bar_primary: Style::default().fg(Color::Cyan),
            bar_secondary: Style::default().fg(Color::Magenta),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::White),

            table_header: Style::default().fg(Color::Cyan),
            table_header_active: Style::default().fg(Color::Yellow),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names fall back to `auto_detect`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    pub fn status_style(&self, status: &Status) -> Style {
        self.bucket_style(status.bucket())
    }

    pub fn bucket_style(&self, bucket: StatusBucket) -> Style {
        match bucket {
            StatusBucket::Free => self.status_free,
            StatusBucket::PartlyFree => self.status_partly_free,
            StatusBucket::NotFree => self.status_not_free,
            StatusBucket::Other => self.status_other,
        }
    }

    pub fn trend_style(&self, trend: Trend) -> Style {
        match trend {
            Trend::Improving => self.trend_improving,
            Trend::Declining => self.trend_declining,
            Trend::Stable => self.trend_stable,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
