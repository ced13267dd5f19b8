//! File-based data source.
//!
//! Reads a JSON dashboard snapshot from disk on every fetch.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{AdapterError, MetricsAdapter};
use crate::data::{DashboardData, TimeHorizon};

/// An adapter that reads [`DashboardData`] from a JSON file.
///
/// The file holds a single snapshot; the requested horizon replaces the
/// horizon recorded in the file's filters.
#[derive(Debug)]
pub struct FileAdapter {
    path: PathBuf,
    description: String,
}

impl FileAdapter {
    /// Create a new file adapter for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetricsAdapter for FileAdapter {
    async fn get_metrics(&self, horizon: TimeHorizon) -> Result<DashboardData, AdapterError> {
        debug!(path = %self.path.display(), %horizon, "reading dashboard file");
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut data = DashboardData::parse(&content)?;
        data.filters.time_horizon = horizon;
        Ok(data)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
