use crate::themes::Theme;
use freedom_core::formatting::format_ratio;
use freedom_data::aggregator::StatusShare;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual configuration shared by the horizontal bars.
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// Columns available to the bar itself.
    pub width: u16,
    /// Display columns reserved for the leading label.
    pub label_width: usize,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            label_width: 20,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── ShareBar ─────────────────────────────────────────────────────────────────

/// One labelled horizontal bar whose filled length is `value / max` of the
/// configured width.
///
/// Renders as `label  ████░░░░ annotation`.
pub struct ShareBar<'a> {
    pub label: String,
    pub value: f64,
    /// Value that fills the bar completely. Non-positive means empty.
    pub max: f64,
    /// Text after the bar, e.g. a percentage or an average.
    pub annotation: String,
    pub style: Style,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> ShareBar<'a> {
    pub fn new(
        label: impl Into<String>,
        value: f64,
        max: f64,
        style: Style,
        theme: &'a Theme,
    ) -> Self {
        Self {
            label: label.into(),
            value,
            max,
            annotation: format_ratio(value),
            style,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of filled columns.
    pub fn filled(&self) -> u16 {
        if self.max <= 0.0 || !self.value.is_finite() {
            return 0;
        }
        let ratio = (self.value / self.max).clamp(0.0, 1.0);
        (ratio * self.config.width as f64).round() as u16
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = self.filled();
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(
                fit_label(&self.label, self.config.label_width),
                self.theme.label,
            ),
            Span::raw(" "),
            Span::styled(filled_str, self.style),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", self.annotation), self.theme.bar_label),
        ])
    }
}

// ── StatusStackBar ───────────────────────────────────────────────────────────

/// A single proportional bar made of one coloured segment per status, in
/// distribution order, followed by a legend.
pub struct StatusStackBar<'a> {
    pub shares: &'a [StatusShare],
    pub theme: &'a Theme,
    pub width: u16,
}

impl<'a> StatusStackBar<'a> {
    pub fn new(shares: &'a [StatusShare], theme: &'a Theme) -> Self {
        Self {
            shares,
            theme,
            width: 50,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let mut spans: Vec<Span<'a>> = Vec::new();

        for share in self.shares {
            let chars = ((share.percentage / 100.0) * self.width as f64).round() as usize;
            if chars > 0 {
                spans.push(Span::styled(
                    "█".repeat(chars),
                    self.theme.status_style(&share.status),
                ));
            }
        }

        spans.push(Span::raw(" "));

        for share in self.shares {
            spans.push(Span::styled(
                format!("{}: {}% ", share.status, format_ratio(share.percentage)),
                self.theme.status_style(&share.status),
            ));
        }

        Line::from(spans)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Pad or truncate `label` to exactly `width` display columns.
///
/// Truncated labels end with `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(label);
    if current <= width {
        return format!("{}{}", label, " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
