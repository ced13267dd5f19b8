//! Data models and processing for dashboard snapshots.
//!
//! This module holds the metric types, the value/delta formatting rules and
//! the helpers that turn a [`DashboardData`] snapshot into table rows.
//!
//! ## Submodules
//!
//! - [`metrics`]: Core data models ([`DashboardData`], [`Metric`], [`MetricValue`])
//! - [`format`]: Value formatting and delta computation
//! - [`delta`]: Delta badges with good/bad direction per metric
//! - [`horizon`]: Column headers, date ranges and chart labels per time horizon
//! - [`sparkline`]: Text rendering of trend series
//! - [`expansion`]: Expand/collapse state and visible row flattening
//!
//! ## Data Flow
//!
//! ```text
//! MetricsAdapter::get_metrics()
//!        │
//!        ▼
//! DashboardData ──▶ visible_rows(ExpansionState, filter)
//!        │
//!        ├──▶ format_value / DeltaBadge (value cells)
//!        │
//!        └──▶ SparklineText (trend cells)
//! ```

pub mod delta;
pub mod expansion;
pub mod format;
pub mod horizon;
pub mod metrics;
pub mod sparkline;

pub use delta::{DeltaBadge, InvertedMetrics};
pub use expansion::{visible_rows, ExpansionState, VisibleRow};
pub use format::{calculate_delta, format_delta, format_value};
pub use horizon::{chart_dates, date_ranges, ColumnHeaders, DateRanges};
pub use metrics::{
    DashboardData, DeltaMode, Filters, Metric, MetricCategory, MetricLevel, MetricValue,
    SparklineData, SparklinePoint, TimeHorizon, ValueFormat,
};
pub use sparkline::SparklineText;
