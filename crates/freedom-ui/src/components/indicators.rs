use crate::themes::Theme;
use freedom_core::formatting::format_ratio;
use freedom_data::aggregator::{classify_trend, HeadlineStats, Trend, YearSeriesPoint};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

// ── TrendIndicator ───────────────────────────────────────────────────────────

/// Shows the direction of the average total score between the earliest and
/// latest year.
///
/// | Trend     | Arrow |
/// |-----------|-------|
/// | improving | ▲     |
/// | declining | ▼     |
/// | stable    | ●     |
pub struct TrendIndicator<'a> {
    pub trend: Trend,
    /// Latest minus earliest average total score, when two years exist.
    pub delta: Option<f64>,
    /// `(earliest, latest)` year, when two years exist.
    pub span: Option<(i32, i32)>,
    pub theme: &'a Theme,
}

impl<'a> TrendIndicator<'a> {
    /// Classify `series` (ascending by year) and capture the score delta.
    pub fn from_series(series: &[YearSeriesPoint], theme: &'a Theme) -> Self {
        let ends = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => Some((first, last)),
            _ => None,
        };
        Self {
            trend: classify_trend(series),
            delta: ends.map(|(f, l)| l.raw_total_average() - f.raw_total_average()),
            span: ends.map(|(f, l)| (f.year, l.year)),
            theme,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self.trend {
            Trend::Improving => "▲",
            Trend::Declining => "▼",
            Trend::Stable => "●",
        }
    }

    /// Format: `"Trend: ▲ improving (+2.0, 2019→2021)"`
    pub fn to_line(&self) -> Line<'a> {
        let style = self.theme.trend_style(self.trend);
        let mut spans = vec![
            Span::styled("Trend: ", self.theme.label),
            Span::styled(format!("{} {}", self.arrow(), self.trend), style),
        ];

        if let (Some(delta), Some((from, to))) = (self.delta, self.span) {
            let sign = if delta > 0.0 { "+" } else { "" };
            spans.push(Span::styled(
                format!(" ({}{}, {}→{})", sign, format_ratio(delta), from, to),
                self.theme.dim,
            ));
        } else {
            spans.push(Span::styled(" (single year)", self.theme.dim));
        }

        Line::from(spans)
    }
}

// ── HeadlineCards ────────────────────────────────────────────────────────────

/// Two summary lines: category counts with percentages, then averages and
/// distinct counts.
pub struct HeadlineCards<'a> {
    pub headline: &'a HeadlineStats,
    pub theme: &'a Theme,
}

impl<'a> HeadlineCards<'a> {
    pub fn new(headline: &'a HeadlineStats, theme: &'a Theme) -> Self {
        Self { headline, theme }
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let h = self.headline;
        let t = self.theme;

        let category = |name: &'static str, count: usize, pct: f64, style: Style| {
            vec![
                Span::styled(format!("  {name}: "), t.label),
                Span::styled(format!("{} ({}%)", count, format_ratio(pct)), style),
            ]
        };

        let mut first = vec![
            Span::styled("Records: ", t.label),
            Span::styled(h.total.to_string(), t.value),
        ];
        first.extend(category("Free", h.free_count, h.free_percentage, t.status_free));
        first.extend(category(
            "Partly free",
            h.partly_free_count,
            h.partly_free_percentage,
            t.status_partly_free,
        ));
        first.extend(category(
            "Not free",
            h.not_free_count,
            h.not_free_percentage,
            t.status_not_free,
        ));

        let second = vec![
            Span::styled("Avg PR: ", t.label),
            Span::styled(format_ratio(h.avg_political_rights), t.value),
            Span::styled("  Avg CL: ", t.label),
            Span::styled(format_ratio(h.avg_civil_liberties), t.value),
            Span::styled("  Avg total: ", t.label),
            Span::styled(format_ratio(h.avg_total_score), t.value),
            Span::styled("  Regions: ", t.label),
            Span::styled(h.distinct_regions.to_string(), t.value),
            Span::styled("  Years: ", t.label),
            Span::styled(h.distinct_years.to_string(), t.value),
        ];

        vec![Line::from(first), Line::from(second)]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
