//! Chart panes: headline figures, status distribution, region comparison
//! and yearly trend.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use freedom_core::formatting::format_ratio;
use freedom_data::aggregator::{DerivedStats, RegionSummary, StatusShare, YearSeriesPoint};

use crate::components::bar_chart::{BarConfig, ShareBar, StatusStackBar};
use crate::components::indicators::{HeadlineCards, TrendIndicator};
use crate::themes::Theme;

// ── Pane contents ─────────────────────────────────────────────────────────────

/// Stacked overview bar followed by one bar per status.
pub fn status_lines<'a>(shares: &'a [StatusShare], theme: &'a Theme) -> Vec<Line<'a>> {
    let mut lines = vec![StatusStackBar::new(shares, theme).to_line(), Line::from("")];
    lines.extend(shares.iter().map(|share| {
        ShareBar::new(
            share.status.to_string(),
            share.percentage,
            100.0,
            theme.status_style(&share.status),
            theme,
        )
        .with_annotation(format!("{}% ({})", format_ratio(share.percentage), share.count))
        .to_line()
    }));
    lines
}

/// Two bars per region (political rights, civil liberties) scaled to the
/// highest average shown.
pub fn region_lines<'a>(regions: &[RegionSummary], theme: &'a Theme) -> Vec<Line<'a>> {
    let max = regions
        .iter()
        .flat_map(|r| [r.avg_political_rights, r.avg_civil_liberties])
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let config = BarConfig {
        width: 30,
        ..BarConfig::default()
    };

    let mut lines = Vec::with_capacity(regions.len() * 2);
    for region in regions {
        lines.push(
            ShareBar::new(
                format!("{} ({})", region.region, region.count),
                region.avg_political_rights,
                max,
                theme.bar_primary,
                theme,
            )
            .with_annotation(format!("PR {}", format_ratio(region.avg_political_rights)))
            .with_config(config.clone())
            .to_line(),
        );
        lines.push(
            ShareBar::new(
                "",
                region.avg_civil_liberties,
                max,
                theme.bar_secondary,
                theme,
            )
            .with_annotation(format!("CL {}", format_ratio(region.avg_civil_liberties)))
            .with_config(config.clone())
            .to_line(),
        );
    }
    lines
}

/// One bar per year for the average total score, annotated with the
/// category counts.
pub fn yearly_lines<'a>(series: &[YearSeriesPoint], theme: &'a Theme) -> Vec<Line<'a>> {
    let max = series
        .iter()
        .map(|p| p.avg_total_score)
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let config = BarConfig {
        width: 30,
        label_width: 6,
        ..BarConfig::default()
    };

    series
        .iter()
        .map(|point| {
            ShareBar::new(
                point.year.to_string(),
                point.avg_total_score,
                max,
                theme.bar_primary,
                theme,
            )
            .with_annotation(format!(
                "{} · n={} · F/PF/NF/other {}/{}/{}/{}",
                format_ratio(point.avg_total_score),
                point.count,
                point.free,
                point.partly_free,
                point.not_free,
                point.other
            ))
            .with_config(config.clone())
            .to_line()
        })
        .collect()
}

// ── Render ────────────────────────────────────────────────────────────────────

/// Render all chart panes for `stats` into `area`.
pub fn render_chart_view(frame: &mut Frame, area: Rect, stats: &DerivedStats, theme: &Theme) {
    let [summary_area, body_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Min(4)]).areas(area);
    let [left_area, right_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(body_area);
    let [status_area, trend_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(left_area);

    let mut summary = HeadlineCards::new(&stats.headline, theme).to_lines();
    summary.push(TrendIndicator::from_series(&stats.yearly, theme).to_line());
    render_pane(frame, summary_area, " Summary ", summary, theme);

    render_pane(
        frame,
        status_area,
        " Status distribution ",
        status_lines(&stats.status_distribution, theme),
        theme,
    );
    render_pane(
        frame,
        trend_area,
        " Yearly trend (avg total score) ",
        yearly_lines(&stats.yearly, theme),
        theme,
    );
    render_pane(
        frame,
        right_area,
        " Regions (avg PR / CL) ",
        region_lines(&stats.regions, theme),
        theme,
    );
}

fn render_pane(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(Span::styled(title.to_string(), theme.header));
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
