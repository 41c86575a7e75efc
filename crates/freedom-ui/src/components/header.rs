use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decoration placed either side of the application title.
pub const ORNAMENT: &str = "◆ ◇ ◆";

/// Width of the `=` rule under the title.
pub const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title with ornaments (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Source, record count and active filter in `[ source | N records | filter ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the loaded source, or a placeholder when nothing is loaded.
    pub source: &'a str,
    /// Records visible after filtering.
    pub record_count: usize,
    /// Human-readable description of the active filter.
    pub filter: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, record_count: usize, filter: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            record_count,
            filter,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let noun = if self.record_count == 1 { "record" } else { "records" };

        vec![
            Line::from(vec![
                Span::styled(ORNAMENT, self.theme.header_accent),
                Span::styled(" FREEDOM INDEX DASHBOARD ", self.theme.header),
                Span::styled(ORNAMENT, self.theme.header_accent),
            ]),
            Line::from(Span::styled("=".repeat(SEPARATOR_WIDTH), self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(format!("{} {}", self.record_count, noun), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.filter, self.theme.dim),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
