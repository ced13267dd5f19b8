//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`table`]: Column headers and the expandable metrics table
//! - [`detail`]: Modal overlay with the full breakdown of one metric
//! - [`common`]: Shared components (filters bar, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Filters (common::render_filters)     │
//! ├──────────────────────────────────────┤
//! │ Column headers + date ranges         │
//! │ Metrics table (table::render)        │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod table;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// Screen row of the first metrics table row for a full-screen layout.
pub const TABLE_START_ROW: u16 = 1 + table::HEADER_OFFSET;

/// Draw the whole dashboard.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Filters bar
        Constraint::Min(8),    // Table
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_filters(frame, app, chunks[0]);
    table::render(frame, app, chunks[1]);
    common::render_status_bar(frame, app, chunks[2]);

    if app.show_detail_overlay {
        detail::render_overlay(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    let top = (area.height / 2).saturating_sub(2);
    let centered = Rect::new(0, top, area.width, 5.min(area.height - top));
    frame.render_widget(paragraph, centered);
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use tokio::runtime::Handle;

    use crate::app::App;
    use crate::config::DashboardConfig;
    use crate::source::{Loader, MockAdapter};

    pub async fn loaded_app() -> App {
        let adapter = MockAdapter::new().with_latency(Duration::ZERO);
        let loader = Loader::new(Arc::new(adapter), Handle::current());
        let mut app = App::new(loader, &DashboardConfig::default());
        app.request_load();
        app.wait_for_load().await;
        app
    }

    pub fn draw(app: &App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    pub fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
