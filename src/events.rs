use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;
use crate::data::TimeHorizon;

/// Default file written by the `e` key.
pub const EXPORT_FILE: &str = "metrics_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q' | 'i') => {
                app.close_overlay();
            }
            // Allow scrolling through metrics while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('d') => app.toggle_delta_mode(),
            _ => {}
        }
        return;
    }

    // If filter input is active, handle text input
    if app.filter_active {
        handle_filter_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Expand/collapse
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('E') => app.expand_all(),
        KeyCode::Char('C') => app.collapse_all(),

        // Filters
        KeyCode::Char('d') => app.toggle_delta_mode(),
        KeyCode::Char('t') | KeyCode::Tab => app.next_horizon(),
        KeyCode::Char('T') | KeyCode::BackTab => app.prev_horizon(),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.set_horizon(TimeHorizon::ALL[index]);
        }

        // Detail overlay
        KeyCode::Char('i') => app.open_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Refetch
        KeyCode::Char('r') => {
            app.request_load();
            app.set_status_message("Refreshing...".to_string());
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Filter (start typing to filter)
        KeyCode::Char('/') => app.start_filter(),

        // Clear filter
        KeyCode::Char('c') => {
            if !app.filter_text.is_empty() {
                app.clear_filter();
            }
        }

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while filter is active
fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm filter
        KeyCode::Enter => {
            app.filter_active = false;
        }

        // Cancel filter (keep text but exit input mode)
        KeyCode::Esc => {
            app.cancel_filter();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_filter();
        }

        KeyCode::Backspace => {
            app.filter_pop();
            if app.filter_text.is_empty() {
                app.filter_active = false;
            }
        }

        // Type characters
        KeyCode::Char(c) => {
            app.filter_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events
///
/// `table_start_row` is the screen row of the first metrics table row.
/// Each table row is `row_height` lines tall. Clicks are shifted by the
/// table's scroll offset from the last render.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, table_start_row: u16, row_height: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select, click again to toggle
        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_detail_overlay || mouse.row < table_start_row {
                return;
            }
            let on_screen = (mouse.row - table_start_row) / row_height.max(1);
            let index = app.table_offset.get() + usize::from(on_screen);
            if index == app.selected_row {
                app.toggle_selected();
            } else {
                app.select_row(index);
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::source::{Loader, MockAdapter};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(row: u16, button: MouseButton) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column: 5,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    async fn loaded_app() -> App {
        let adapter = MockAdapter::new().with_latency(Duration::ZERO);
        let loader = Loader::new(Arc::new(adapter), Handle::current());
        let mut app = App::new(loader, &DashboardConfig::default());
        app.request_load();
        app.wait_for_load().await;
        app
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_navigation_and_toggle() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_row, 2);

        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.expansion.is_category_expanded("conversion"));
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.expansion.is_category_expanded("conversion"));

        handle_key_event(&mut app, key(KeyCode::End));
        assert_eq!(app.selected_row, 7);
        handle_key_event(&mut app, key(KeyCode::Home));
        assert_eq!(app.selected_row, 0);
    }

    #[tokio::test]
    async fn test_expand_collapse_all_keys() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('E')));
        assert_eq!(app.expansion.expanded_category_count(), 8);
        assert_eq!(app.expansion.expanded_metric_count(), 4);

        handle_key_event(&mut app, key(KeyCode::Char('C')));
        assert_eq!(app.expansion.expanded_category_count(), 0);
    }

    #[tokio::test]
    async fn test_horizon_keys() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('1')));
        assert_eq!(app.filters.time_horizon, TimeHorizon::Hour);
        handle_key_event(&mut app, key(KeyCode::Char('4')));
        assert_eq!(app.filters.time_horizon, TimeHorizon::Month);
        handle_key_event(&mut app, key(KeyCode::Char('t')));
        assert_eq!(app.filters.time_horizon, TimeHorizon::Hour);
        handle_key_event(&mut app, key(KeyCode::Char('T')));
        assert_eq!(app.filters.time_horizon, TimeHorizon::Month);
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn test_delta_mode_key() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(app.delta_mode, crate::data::DeltaMode::Abs);
    }

    #[tokio::test]
    async fn test_search_input() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        assert!(app.filter_active);

        // Keys are typed into the search, not interpreted as commands.
        for c in "mrq".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        assert!(app.running);
        assert_eq!(app.filter_text, "mrq");

        handle_key_event(&mut app, key(KeyCode::Backspace));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(!app.filter_active);
        assert_eq!(app.filter_text, "mr");

        handle_key_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.filter_text.is_empty());
    }

    #[tokio::test]
    async fn test_help_closes_on_any_key() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_detail_overlay_keys() {
        let mut app = loaded_app().await;
        handle_key_event(&mut app, key(KeyCode::Char('i')));
        assert!(app.show_detail_overlay);

        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_row, 1);
        assert!(app.show_detail_overlay);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_detail_overlay);
    }

    #[tokio::test]
    async fn test_mouse_selects_then_toggles() {
        let mut app = loaded_app().await;

        handle_mouse_event(&mut app, click(10, MouseButton::Left), 6, 2);
        assert_eq!(app.selected_row, 2);

        handle_mouse_event(&mut app, click(11, MouseButton::Left), 6, 2);
        assert!(app.expansion.is_category_expanded("conversion"));

        // Above the table is ignored.
        handle_mouse_event(&mut app, click(1, MouseButton::Left), 6, 2);
        assert_eq!(app.selected_row, 2);

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, scroll, 6, 2);
        assert_eq!(app.selected_row, 3);
    }

    #[tokio::test]
    async fn test_mouse_click_follows_table_scroll() {
        let mut app = loaded_app().await;
        app.expand_all();
        app.select_last();
        crate::ui::test_support::draw(&app, 140, 30);
        let offset = app.table_offset.get();
        assert!(offset > 0);

        let top = crate::ui::TABLE_START_ROW;
        handle_mouse_event(&mut app, click(top + 2, MouseButton::Left), top, 2);
        assert_eq!(app.selected_row, offset + 1);
    }
}
