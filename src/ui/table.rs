//! Metrics table rendering.
//!
//! One row per visible category, metric or child. Each row is two lines
//! tall: values over delta badges, and the current trend over the
//! comparison trend.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::horizon::{current_chart_dates, current_date_ranges};
use crate::data::{DashboardData, Metric, MetricValue, SparklineText, VisibleRow};

/// Lines per table row.
pub const ROW_HEIGHT: u16 = 2;
/// Lines in the column header (title, date range, chart dates).
pub const HEADER_HEIGHT: u16 = 3;
/// Offset of the first data row from the top of the table area.
pub const HEADER_OFFSET: u16 = 1 + HEADER_HEIGHT;
/// Columns used by the trend sparklines.
pub const TREND_WIDTH: u16 = 21;

const KEY_MARKER: &str = "▌";

/// Render the metrics table with its column headers.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref data) = app.data else {
        let message = match app.load_error {
            Some(ref err) => format!("Failed to load metrics: {}", err),
            None => "Loading metrics…".to_string(),
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)])
            .alignment(Alignment::Center)
            .block(block.title(" Metrics "));
        frame.render_widget(paragraph, area);
        return;
    };

    let rows_index = app.visible_rows();
    let rows: Vec<Row> = rows_index
        .iter()
        .filter_map(|row| build_row(app, data, *row))
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(TREND_WIDTH),
    ];

    let selected = app.selected_row.min(rows.len().saturating_sub(1));

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !rows.is_empty() {
        format!(" [{}/{}]", selected + 1, rows.len())
    } else {
        String::new()
    };

    let title = format!(
        " {} categories · {} metrics{}{} ",
        data.categories.len(),
        data.metric_count(),
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header_row(app))
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    // Start from the last frame's scroll so the view only moves when needed.
    let mut state = TableState::default().with_offset(app.table_offset.get());
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
    app.table_offset.set(state.offset());
}

/// Column titles, the concrete date ranges and the trend's first/last dates.
fn header_row(app: &App) -> Row<'static> {
    let horizon = app.filters.time_horizon;
    let headers = horizon.headers();
    let ranges = current_date_ranges(horizon);
    let dates = current_chart_dates(horizon);
    let muted = app.theme.muted_style();

    let column = |title: &'static str, range: String| {
        Cell::from(Text::from(vec![
            Line::from(title),
            Line::from(Span::styled(range, muted)),
        ]))
    };

    let trend_span = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("{first} … {last}"),
        _ => String::new(),
    };

    Row::new(vec![
        Cell::from("METRIC"),
        column(headers.last_period, ranges.last_period),
        column(headers.period_to_date, ranges.period_to_date),
        column(headers.rolling_period, ranges.rolling_period),
        Cell::from(Text::from(vec![
            Line::from("TREND"),
            Line::from(""),
            Line::from(Span::styled(trend_span, muted)),
        ])),
    ])
    .height(HEADER_HEIGHT)
    .style(app.theme.header)
}

fn build_row<'a>(app: &'a App, data: &'a DashboardData, row: VisibleRow) -> Option<Row<'a>> {
    let category = row.category(data)?;

    let (name, metric) = match row {
        VisibleRow::Category { .. } => {
            let expanded = app.expansion.is_category_expanded(&category.id);
            let arrow = if expanded { "▾" } else { "▸" };
            let mut lines = vec![Line::from(Span::styled(
                format!("{arrow} {}", category.name),
                app.theme.category,
            ))];

            // Collapsed categories preview their key metric.
            let key = category.key_metric().filter(|_| !expanded);
            if let Some(key) = key {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(KEY_MARKER, Style::default().fg(app.theme.highlight)),
                    Span::raw(format!(" {}", key.name)),
                ]));
            }
            (Text::from(lines), key)
        }
        VisibleRow::Metric { .. } => {
            let metric = row.metric(data)?;
            let marker = if row.is_key_metric() {
                Span::styled(KEY_MARKER, Style::default().fg(app.theme.highlight))
            } else {
                Span::raw(" ")
            };
            let expanded = app.expansion.is_metric_expanded(&metric.id);
            let toggle = match (metric.has_children(), expanded) {
                (false, _) => "",
                (true, true) => " ▾",
                (true, false) => " ▸",
            };
            let line = Line::from(vec![
                Span::raw("  "),
                marker,
                Span::raw(format!(" {}{}", metric.name, toggle)),
            ]);
            (Text::from(line), Some(metric))
        }
        VisibleRow::Child { .. } => {
            let metric = row.metric(data)?;
            let mut lines = vec![Line::from(format!("      {}", metric.name))];
            if let Some(ref parent) = metric.parent_label {
                lines.push(Line::from(Span::styled(
                    format!("      {}", parent),
                    app.theme.muted_style(),
                )));
            }
            (Text::from(lines), Some(metric))
        }
    };

    let cells = match metric {
        Some(metric) => vec![
            Cell::from(name),
            value_cell(app, metric, &metric.last_period),
            value_cell(app, metric, &metric.period_to_date),
            value_cell(app, metric, &metric.rolling_period),
            trend_cell(app, metric),
        ],
        None => vec![Cell::from(name)],
    };

    Some(Row::new(cells).height(ROW_HEIGHT))
}

/// Formatted value over its delta badge.
fn value_cell<'a>(app: &App, metric: &Metric, value: &MetricValue) -> Cell<'a> {
    let badge = app.badge(metric, value);
    Cell::from(Text::from(vec![
        Line::from(Span::styled(
            value.formatted(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {}", badge.arrow(), badge.text),
            app.theme.delta_style(&badge),
        )),
    ]))
}

/// Current trend over the comparison trend.
fn trend_cell<'a>(app: &App, metric: &Metric) -> Cell<'a> {
    if metric.sparkline.is_empty() {
        return Cell::from(Span::styled("-", app.theme.muted_style()));
    }

    let text = SparklineText::render(&metric.sparkline, metric.format(), TREND_WIDTH as usize);
    Cell::from(Text::from(vec![
        Line::from(Span::styled(
            text.current,
            Style::default().fg(app.theme.highlight),
        )),
        Line::from(Span::styled(text.comparison, app.theme.muted_style())),
    ]))
}
