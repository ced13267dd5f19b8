//! # metrics-dashboard
//!
//! A terminal dashboard for business metrics, grouped into categories, with
//! period-over-period delta badges and sparkline trends.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(formatting)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── MockAdapter | FileAdapter | HttpAdapter     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Filters, expansion state, selection and search
//! - **[`source`]**: The [`MetricsAdapter`] trait, its implementations and
//!   the [`Loader`] that runs fetches off the render thread
//! - **[`data`]**: Metric types, value/delta formatting, date ranges and
//!   sparkline rendering
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered configuration (defaults, TOML, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Built-in sample data
//! metrics-dashboard
//!
//! # A JSON snapshot on disk
//! metrics-dashboard --file metrics.json
//!
//! # A REST backend
//! metrics-dashboard --url http://localhost:8080 --horizon month
//! ```
//!
//! ### As a library
//!
//! ```
//! use metrics_dashboard::{format_delta, format_value, calculate_delta, DeltaMode, ValueFormat};
//!
//! assert_eq!(format_value(1_500_000.0, ValueFormat::Currency), "$1.50M");
//!
//! let delta = calculate_delta(110.0, 100.0, DeltaMode::Pct);
//! assert_eq!(format_delta(delta, DeltaMode::Pct, ValueFormat::Number), "+10.0%");
//! ```
//!
//! ### Driving the app from your own runtime
//!
//! ```no_run
//! use std::sync::Arc;
//! use metrics_dashboard::{App, DashboardConfig, Loader, MockAdapter};
//!
//! # tokio_test::block_on(async {
//! let loader = Loader::new(Arc::new(MockAdapter::new()), tokio::runtime::Handle::current());
//! let mut app = App::new(loader, &DashboardConfig::default());
//! app.request_load();
//! app.wait_for_load().await;
//! assert!(app.data.is_some());
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::DashboardConfig;
pub use data::{
    calculate_delta, format_delta, format_value, DashboardData, DeltaBadge, DeltaMode, Metric,
    MetricCategory, MetricValue, TimeHorizon, ValueFormat,
};
#[cfg(feature = "http")]
pub use source::HttpAdapter;
pub use source::{AdapterError, FileAdapter, LoadOutcome, Loader, MetricsAdapter, MockAdapter};
