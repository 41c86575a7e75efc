//! Sortable, paginated record table for the dashboard TUI.
//!
//! Renders one bordered [`ratatui::widgets::Table`] row per record on the
//! current page, the passthrough columns after the canonical ones, and a
//! footer line with the page position.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use freedom_core::models::CanonicalRecord;
use freedom_data::table::{Page, SortKey, SortState};

use crate::themes::Theme;

/// Passthrough columns shown after the canonical ones.
pub const MAX_EXTRA_COLUMNS: usize = 3;

/// Header text for column `index` (0-based), with its number key and the
/// sort arrow when it is the active key.
pub fn header_label(key: &SortKey, index: usize, sort: &SortState) -> String {
    let mut label = if index < 9 {
        format!("{} {}", index + 1, key.label())
    } else {
        key.label().to_string()
    };
    if &sort.key == key {
        label.push(' ');
        label.push_str(sort.direction.arrow());
    }
    label
}

/// Display text of `record` in column `key`.
pub fn cell_text(record: &CanonicalRecord, key: &SortKey) -> String {
    match key {
        SortKey::Country => record.country.clone(),
        SortKey::Region => record.region.clone(),
        SortKey::Year => record.year.to_string(),
        SortKey::Status => record.status.to_string(),
        SortKey::PoliticalRights => record.political_rights.to_string(),
        SortKey::CivilLiberties => record.civil_liberties.to_string(),
        SortKey::TotalScore => record.total_score().to_string(),
        SortKey::Extra(name) => record
            .extra
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_default(),
    }
}

/// Columns shown for a collection: the canonical seven, then up to
/// [`MAX_EXTRA_COLUMNS`] passthrough columns.
pub fn visible_columns(extra_columns: &[String]) -> Vec<SortKey> {
    let mut columns: Vec<SortKey> = SortKey::canonical().into_iter().collect();
    columns.extend(
        extra_columns
            .iter()
            .take(MAX_EXTRA_COLUMNS)
            .map(|name| SortKey::Extra(name.clone())),
    );
    columns
}

/// Footer text, e.g. `"Page 2/3 · rows 11–20 of 25"`.
pub fn footer_text(page: &Page<'_>) -> String {
    if page.total_items == 0 {
        return format!("Page {}/{} · no rows", page.page, page.total_pages);
    }
    format!(
        "Page {}/{} · rows {}–{} of {}",
        page.page,
        page.total_pages,
        page.first_item(),
        page.last_item(),
        page.total_items
    )
}

/// Render the record table for `page` into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    page: &Page<'_>,
    sort: &SortState,
    extra_columns: &[String],
    theme: &Theme,
) {
    let columns = visible_columns(extra_columns);

    let header_cells = columns.iter().enumerate().map(|(i, key)| {
        let style = if &sort.key == key {
            theme.table_header_active
        } else {
            theme.table_header
        };
        Cell::from(header_label(key, i, sort)).style(style)
    });
    let header = Row::new(header_cells).height(1);

    let data_rows: Vec<Row> = page
        .items
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let cells = columns.iter().map(|key| {
                let cell = Cell::from(cell_text(record, key));
                if *key == SortKey::Status {
                    cell.style(theme.status_style(&record.status))
                } else {
                    cell
                }
            });
            Row::new(cells).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|key| match key {
            SortKey::Country => Constraint::Min(16),
            SortKey::Region => Constraint::Length(18),
            SortKey::Year => Constraint::Length(7),
            SortKey::Status => Constraint::Length(21),
            SortKey::PoliticalRights | SortKey::CivilLiberties => Constraint::Length(6),
            SortKey::TotalScore => Constraint::Length(9),
            SortKey::Extra(_) => Constraint::Length(14),
        })
        .collect();

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Records "),
        )
        .style(theme.text);
    frame.render_widget(table, table_area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(footer_text(page), theme.dim))),
        footer_area,
    );
}

/// Render a placeholder when no collection is loaded or the filter matches
/// nothing.
pub fn render_no_data(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.bold)),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'r' to reload, 'c' to clear filters.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Freedom Index "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
