//! Data source abstraction for fetching dashboard snapshots.
//!
//! A [`MetricsAdapter`] returns a [`DashboardData`] for a time horizon. The
//! TUI never awaits an adapter directly: the [`Loader`] runs fetches on the
//! tokio runtime and hands finished results to the render loop.

mod error;
mod file;
#[cfg(feature = "http")]
mod http;
mod loader;
mod mock;

pub use error::AdapterError;
pub use file::FileAdapter;
#[cfg(feature = "http")]
pub use http::{HttpAdapter, HttpAdapterBuilder};
pub use loader::{LoadOutcome, Loader};
pub use mock::{MockAdapter, Xorshift64, DEFAULT_SEED};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::{DashboardData, TimeHorizon};

/// Trait for fetching dashboard data from a backend.
///
/// Implement this trait to connect your own data source.
///
/// # Example
///
/// ```
/// use metrics_dashboard::{MetricsAdapter, MockAdapter, TimeHorizon};
///
/// # tokio_test::block_on(async {
/// let adapter = MockAdapter::new().with_latency(std::time::Duration::ZERO);
/// let data = adapter.get_metrics(TimeHorizon::Week).await.unwrap();
/// assert_eq!(data.categories.len(), 8);
/// # });
/// ```
#[async_trait]
pub trait MetricsAdapter: Send + Sync + Debug {
    /// Fetch dashboard metrics for a time horizon.
    async fn get_metrics(&self, horizon: TimeHorizon) -> Result<DashboardData, AdapterError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
