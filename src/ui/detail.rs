//! Detail overlay rendering.
//!
//! Displays a modal overlay with the full breakdown of the selected metric:
//! every comparison window in both delta modes, the trend with its y-axis
//! range, and the most recent points.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::horizon::{current_date_ranges, point_label};
use crate::data::{format_value, DeltaBadge, DeltaMode, Metric, MetricValue, SparklineText};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;
/// Number of trailing sparkline points listed.
const RECENT_POINTS: usize = 7;

/// Render the metric detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(metric) = app.selected_metric() else {
        return;
    };

    let overlay_width = percent_of(area.width, 90).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = percent_of(area.height, 90).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(6), // Comparison windows
        Constraint::Length(5), // Trend
        Constraint::Min(4),    // Recent points
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    render_windows(frame, app, metric, chunks[0]);
    render_trend(frame, app, metric, chunks[1]);
    render_points(frame, app, metric, chunks[2]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Esc:close  ↑↓:previous/next metric  d:delta mode ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[3]);
}

/// `percent`% of a terminal dimension, computed without overflowing `u16`.
fn percent_of(value: u16, percent: u16) -> u16 {
    (u32::from(value) * u32::from(percent.min(100)) / 100) as u16
}

/// The three comparison windows with both delta modes.
fn render_windows(frame: &mut Frame, app: &App, metric: &Metric, area: Rect) {
    let horizon = app.filters.time_horizon;
    let h = horizon.headers();
    let r = current_date_ranges(horizon);
    let inverted = app.inverted.contains(&metric.id);

    let windows = [
        (h.last_period, r.last_period, &metric.last_period),
        (h.period_to_date, r.period_to_date, &metric.period_to_date),
        (h.rolling_period, r.rolling_period, &metric.rolling_period),
    ];

    let rows: Vec<Row> = windows
        .into_iter()
        .map(|(title, range, value)| {
            window_row(app, title, range, value, inverted)
        })
        .collect();

    let header = Row::new(vec!["Window", "Range", "Value", "Previous", "Δ %", "Δ abs"])
        .style(app.theme.header);

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let mut title = format!(" {} ", metric.name);
    if let Some(ref parent) = metric.parent_label {
        title = format!(" {} › {} ", parent, metric.name);
    }
    if inverted {
        title.push_str("(lower is better) ");
    }

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(table, area);
}

fn window_row<'a>(
    app: &App,
    title: &'static str,
    range: String,
    value: &MetricValue,
    inverted: bool,
) -> Row<'a> {
    let pct = DeltaBadge::new(value, DeltaMode::Pct, inverted);
    let abs = DeltaBadge::new(value, DeltaMode::Abs, inverted);

    // Bold the badge for the active mode.
    let badge_cell = |badge: &DeltaBadge, mode: DeltaMode| {
        let mut style = app.theme.delta_style(badge);
        if app.delta_mode == mode {
            style = style.add_modifier(Modifier::BOLD);
        }
        let text = format!("{} {}", badge.arrow(), badge.text);
        Cell::from(Span::styled(text, style))
    };

    Row::new(vec![
        Cell::from(title),
        Cell::from(Span::styled(range, app.theme.muted_style())),
        Cell::from(value.formatted()),
        Cell::from(format_value(value.previous_value, value.format)),
        badge_cell(&pct, DeltaMode::Pct),
        badge_cell(&abs, DeltaMode::Abs),
    ])
}

/// Current and comparison sparklines with y-axis labels.
fn render_trend(frame: &mut Frame, app: &App, metric: &Metric, area: Rect) {
    let block = Block::default()
        .title(" Trend ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if metric.sparkline.is_empty() {
        let empty = Paragraph::new(Span::styled("  No trend data", app.theme.muted_style()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let format = metric.format();
    let label_width = [metric.sparkline.max, metric.sparkline.min]
        .iter()
        .map(|v| format_value(*v, format).chars().count())
        .max()
        .unwrap_or(0);
    let width = usize::from(area.width).saturating_sub(label_width + 15);
    let text = SparklineText::render(&metric.sparkline, format, width.max(1));

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {:>w$} ", text.max_label, w = label_width),
                app.theme.muted_style(),
            ),
            Span::styled(text.current, Style::default().fg(app.theme.highlight)),
            Span::raw("  current"),
        ]),
        Line::from(vec![
            Span::styled(
                format!(" {:>w$} ", text.min_label, w = label_width),
                app.theme.muted_style(),
            ),
            Span::styled(text.comparison, app.theme.muted_style()),
            Span::raw("  previous"),
        ]),
        Line::from(Span::styled(
            format!(
                " {} points{}",
                metric.sparkline.points.len(),
                if app.filters.time_horizon.shows_point_markers() {
                    ""
                } else {
                    " (hourly)"
                }
            ),
            app.theme.muted_style(),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// The last few points with their tooltip labels.
fn render_points(frame: &mut Frame, app: &App, metric: &Metric, area: Rect) {
    let format = metric.format();
    let points = &metric.sparkline.points;
    let recent = &points[points.len().saturating_sub(RECENT_POINTS)..];

    let rows: Vec<Row> = recent
        .iter()
        .rev()
        .map(|point| {
            let label = point_label(point.date.with_timezone(&Local).naive_local());
            Row::new(vec![
                Cell::from(label),
                Cell::from(Span::styled(
                    format_value(point.comparison, format),
                    app.theme.muted_style(),
                )),
                Cell::from(format_value(point.value, format)),
            ])
        })
        .collect();

    let header = Row::new(vec!["When", "Previous", "Current"]).style(app.theme.header);
    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Recent points ({}) ", recent.len()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(table, area);
}
