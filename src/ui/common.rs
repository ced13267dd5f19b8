//! Common UI components shared across views.
//!
//! This module contains the filters bar, status bar, and help overlay.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::data::TimeHorizon;

/// Render the filters bar: title, product, region, delta mode and horizon.
pub fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(30)]).areas(area);

    let label = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let accent = Style::default().fg(app.theme.highlight);

    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.title), app.theme.header),
        Span::raw("│ "),
        Span::styled("Product ", label),
        Span::styled(app.filters.product.clone(), value),
        Span::raw(" │ "),
        Span::styled("Region ", label),
        Span::styled(app.filters.region.clone(), value),
        Span::raw(" │ "),
        Span::styled("Delta ", label),
        Span::styled(app.delta_mode.label(), accent),
    ]);
    frame.render_widget(Paragraph::new(line), left);

    let titles: Vec<Line> = TimeHorizon::ALL
        .iter()
        .map(|h| Line::from(h.label()))
        .collect();
    let selected = TimeHorizon::ALL
        .iter()
        .position(|h| *h == app.filters.time_horizon)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");
    frame.render_widget(tabs, right);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.filter_active {
        "Type to search | Enter:apply Esc:cancel"
    } else {
        "↵:expand d:delta t:horizon i:detail /:search ?:help q:quit"
    };

    let status = match (&app.data, &app.load_error) {
        (Some(_), Some(err)) => format!(" Error: {} (showing previous data) | {}", err, controls),
        (Some(_), None) => {
            let updated = app
                .last_updated
                .map(|t| format!("Updated {:.0}s ago", t.elapsed().as_secs_f64()))
                .unwrap_or_default();
            let loading = if app.is_loading() {
                " | Loading..."
            } else {
                ""
            };
            format!(
                " {} | {}{} | {}",
                app.source_description(),
                updated,
                loading,
                controls
            )
        }
        (None, Some(err)) => format!(" Error: {} | q:quit r:retry", err),
        (None, None) => " Loading... | q:quit".to_string(),
    };

    let style = if app.load_error.is_some() {
        Style::default().fg(app.theme.bad)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ↑/↓ j/k     Move selection"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter/Space Expand or collapse"),
        Line::from("  E / C       Expand / collapse all"),
        Line::from("  i           Metric detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Filters"),
        Line::from("  t / T       Next / previous horizon"),
        Line::from("  1-4         Hour, day, week, month"),
        Line::from("  d           Toggle PCT / ABS deltas"),
        Line::from("  /           Search metrics"),
        Line::from("  c           Clear search"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Refresh data"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
