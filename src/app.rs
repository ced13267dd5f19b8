//! Application state and navigation logic.

use std::cell::Cell;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::{
    visible_rows, DashboardData, DeltaBadge, DeltaMode, ExpansionState, Filters, InvertedMetrics,
    Metric, MetricValue, TimeHorizon, VisibleRow,
};
use crate::source::{LoadOutcome, Loader};
use crate::ui::Theme;

/// How long a status message stays on screen.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_detail_overlay: bool,
    pub title: String,

    // Filters
    pub filters: Filters,
    pub delta_mode: DeltaMode,
    pub inverted: InvertedMetrics,

    // Data
    loader: Loader,
    pub data: Option<DashboardData>,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,

    // Navigation state
    pub expansion: ExpansionState,
    pub selected_row: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,
    /// First table row on screen, written back by the table renderer.
    pub table_offset: Cell<usize>,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App fetching through `loader` with the given settings.
    ///
    /// Nothing is fetched until [`App::request_load`] is called.
    pub fn new(loader: Loader, config: &DashboardConfig) -> Self {
        Self {
            running: true,
            show_help: false,
            show_detail_overlay: false,
            title: config.title.clone(),
            filters: Filters {
                time_horizon: config.time_horizon,
                product: config.product.clone(),
                region: config.region.clone(),
            },
            delta_mode: config.delta_mode,
            inverted: config.inverted(),
            loader,
            data: None,
            load_error: None,
            last_updated: None,
            expansion: ExpansionState::new(),
            selected_row: 0,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::dark(),
            table_offset: Cell::new(0),
            status_message: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.loader.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    // ---- Loading ----

    /// Start fetching data for the current time horizon.
    pub fn request_load(&mut self) {
        self.loader.request(self.filters.time_horizon);
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Apply a finished fetch, if any. Returns true when state changed.
    pub fn poll_loader(&mut self) -> bool {
        match self.loader.poll() {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    /// Wait for the pending fetch and apply it.
    pub async fn wait_for_load(&mut self) {
        if let Some(outcome) = self.loader.next().await {
            self.apply_outcome(outcome);
        }
    }

    /// Store a fetch result. Failures keep the previous data on screen.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(data) => {
                self.data = Some(data);
                self.load_error = None;
                self.last_updated = Some(Instant::now());
                self.clamp_selection();
            }
            LoadOutcome::Failed(err) => {
                self.load_error = Some(err.to_string());
            }
        }
    }

    // ---- Filters ----

    /// Switch horizon and refetch. No-op if unchanged.
    pub fn set_horizon(&mut self, horizon: TimeHorizon) {
        if self.filters.time_horizon == horizon {
            return;
        }
        self.filters.time_horizon = horizon;
        self.request_load();
    }

    pub fn next_horizon(&mut self) {
        self.set_horizon(self.filters.time_horizon.next());
    }

    pub fn prev_horizon(&mut self) {
        self.set_horizon(self.filters.time_horizon.prev());
    }

    /// Toggle between percentage and absolute deltas.
    pub fn toggle_delta_mode(&mut self) {
        self.delta_mode = self.delta_mode.toggle();
    }

    /// Delta badge for a value of `metric` in the current mode.
    pub fn badge(&self, metric: &Metric, value: &MetricValue) -> DeltaBadge {
        DeltaBadge::new(value, self.delta_mode, self.inverted.contains(&metric.id))
    }

    // ---- Rows and selection ----

    /// Rows currently shown in the metrics table.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        match self.data {
            Some(ref data) => visible_rows(data, &self.expansion, &self.filter_text),
            None => Vec::new(),
        }
    }

    pub fn selected(&self) -> Option<VisibleRow> {
        self.visible_rows().get(self.selected_row).copied()
    }

    /// Metric under the cursor (the key metric for category rows).
    pub fn selected_metric(&self) -> Option<&Metric> {
        let row = self.selected()?;
        row.metric(self.data.as_ref()?)
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_rows().len().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_row = self.visible_rows().len().saturating_sub(1);
    }

    /// Select a row by its position in the table, if it exists.
    pub fn select_row(&mut self, index: usize) {
        if index < self.visible_rows().len() {
            self.selected_row = index;
        }
    }

    fn clamp_selection(&mut self) {
        let max = self.visible_rows().len().saturating_sub(1);
        self.selected_row = self.selected_row.min(max);
    }

    // ---- Expansion ----

    /// Expand or collapse the selected category or metric.
    ///
    /// Child rows and metrics without children are left alone.
    pub fn toggle_selected(&mut self) {
        let (Some(row), Some(data)) = (self.selected(), self.data.as_ref()) else {
            return;
        };

        match row {
            VisibleRow::Category { .. } => {
                if let Some(category) = row.category(data) {
                    let id = category.id.clone();
                    self.expansion.toggle_category(&id);
                }
            }
            VisibleRow::Metric { .. } => {
                if let Some(metric) = row.metric(data).filter(|m| m.has_children()) {
                    let id = metric.id.clone();
                    self.expansion.toggle_metric(&id);
                }
            }
            VisibleRow::Child { .. } => {}
        }
        self.clamp_selection();
    }

    pub fn expand_all(&mut self) {
        if let Some(ref data) = self.data {
            self.expansion.expand_all(data);
        }
    }

    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
        self.clamp_selection();
    }

    // ---- Overlays ----

    /// Open the detail overlay for the selected metric.
    pub fn open_detail(&mut self) {
        if self.selected_metric().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Navigate back: close overlay first, then clear the search.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if !self.filter_text.is_empty() {
            self.clear_filter();
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ---- Search ----

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.clamp_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_row = 0;
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_selection();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current data to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };
        export_data(data, path)
    }
}

/// Write a snapshot as pretty JSON that the file source can read back.
pub fn export_data(data: &DashboardData, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
