//! Background fetching for the synchronous render loop.
//!
//! The TUI thread never blocks on an adapter. Each [`Loader::request`]
//! spawns a fetch on the tokio runtime and tags it with a generation
//! number; only the result of the most recent request is ever delivered.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::{AdapterError, MetricsAdapter};
use crate::data::{DashboardData, TimeHorizon};

/// Result of a finished fetch.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(DashboardData),
    Failed(AdapterError),
}

type Message = (u64, TimeHorizon, Result<DashboardData, AdapterError>);

/// Runs adapter fetches in the background and hands back the latest one.
#[derive(Debug)]
pub struct Loader {
    adapter: Arc<dyn MetricsAdapter>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    generation: u64,
    pending: bool,
}

impl Loader {
    /// Create a loader that spawns fetches on `runtime`.
    pub fn new(adapter: Arc<dyn MetricsAdapter>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            adapter,
            runtime,
            tx,
            rx,
            generation: 0,
            pending: false,
        }
    }

    /// Returns a description of the underlying adapter.
    pub fn description(&self) -> &str {
        self.adapter.description()
    }

    /// True while the latest request has not completed.
    pub fn is_loading(&self) -> bool {
        self.pending
    }

    /// Start fetching `horizon`, superseding any in-flight request.
    ///
    /// Returns the generation number of the new request.
    pub fn request(&mut self, horizon: TimeHorizon) -> u64 {
        self.generation += 1;
        self.pending = true;

        let generation = self.generation;
        let adapter = Arc::clone(&self.adapter);
        let tx = self.tx.clone();
        debug!(generation, %horizon, "requesting metrics");

        let fetch = self
            .runtime
            .spawn(async move { adapter.get_metrics(horizon).await });
        self.runtime.spawn(async move {
            // A panicking adapter must still clear the pending request.
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => {
                    let reason = format!("fetch task failed: {err}");
                    Err(AdapterError::Unavailable(reason))
                }
            };
            // The receiver only goes away when the loader is dropped.
            let _ = tx.send((generation, horizon, result));
        });

        generation
    }

    /// Non-blocking check for the result of the latest request.
    ///
    /// Results of superseded requests are discarded.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        while let Ok(message) = self.rx.try_recv() {
            if let Some(outcome) = self.accept(message) {
                return Some(outcome);
            }
        }
        None
    }

    /// Wait for the result of the latest request.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next(&mut self) -> Option<LoadOutcome> {
        while self.pending {
            let message = self.rx.recv().await?;
            if let Some(outcome) = self.accept(message) {
                return Some(outcome);
            }
        }
        None
    }

    fn accept(&mut self, (generation, horizon, result): Message) -> Option<LoadOutcome> {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "stale fetch dropped");
            return None;
        }
        self.pending = false;

        match result {
            Ok(data) => {
                info!(%horizon, metrics = data.metric_count(), "metrics loaded");
                Some(LoadOutcome::Loaded(data))
            }
            Err(err) => {
                error!(%horizon, error = %err, "failed to load metrics");
                Some(LoadOutcome::Failed(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockAdapter;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers hourly requests slowly and everything else at once.
    #[derive(Debug)]
    struct SlowHourAdapter;

    #[async_trait]
    impl MetricsAdapter for SlowHourAdapter {
        async fn get_metrics(&self, horizon: TimeHorizon) -> Result<DashboardData, AdapterError> {
            if horizon == TimeHorizon::Hour {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            Ok(MockAdapter::new().generate(horizon, chrono::Utc::now()))
        }

        fn description(&self) -> &str {
            "slow hour"
        }
    }

    #[derive(Debug)]
    struct FailingAdapter;

    #[async_trait]
    impl MetricsAdapter for FailingAdapter {
        async fn get_metrics(&self, _horizon: TimeHorizon) -> Result<DashboardData, AdapterError> {
            Err(AdapterError::Status(503))
        }

        fn description(&self) -> &str {
            "failing"
        }
    }

    /// Panics on hourly requests.
    #[derive(Debug)]
    struct PanickingAdapter;

    #[async_trait]
    impl MetricsAdapter for PanickingAdapter {
        async fn get_metrics(&self, horizon: TimeHorizon) -> Result<DashboardData, AdapterError> {
            if horizon == TimeHorizon::Hour {
                panic!("adapter bug");
            }
            Ok(MockAdapter::new().generate(horizon, chrono::Utc::now()))
        }

        fn description(&self) -> &str {
            "panicking"
        }
    }

    fn mock_loader() -> Loader {
        let adapter = MockAdapter::new().with_latency(Duration::ZERO);
        Loader::new(Arc::new(adapter), Handle::current())
    }

    #[tokio::test]
    async fn test_loader_delivers_result() {
        let mut loader = mock_loader();
        assert!(!loader.is_loading());

        loader.request(TimeHorizon::Month);
        assert!(loader.is_loading());

        match loader.next().await {
            Some(LoadOutcome::Loaded(data)) => {
                assert_eq!(data.filters.time_horizon, TimeHorizon::Month)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!loader.is_loading());
        assert_eq!(loader.description(), "sample data");
    }

    #[tokio::test]
    async fn test_loader_poll_without_request() {
        let mut loader = mock_loader();
        assert!(loader.poll().is_none());
        assert!(loader.next().await.is_none());
    }

    #[tokio::test]
    async fn test_loader_generations_increase() {
        let mut loader = mock_loader();
        let first = loader.request(TimeHorizon::Week);
        let second = loader.request(TimeHorizon::Day);
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_loader_drops_stale_results() {
        let mut loader = Loader::new(Arc::new(SlowHourAdapter), Handle::current());

        loader.request(TimeHorizon::Hour);
        loader.request(TimeHorizon::Week);

        match loader.next().await {
            Some(LoadOutcome::Loaded(data)) => {
                assert_eq!(data.filters.time_horizon, TimeHorizon::Week)
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        // The slow hourly fetch finishes later and must not surface.
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(loader.poll().is_none());
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_loader_reports_failure() {
        let mut loader = Loader::new(Arc::new(FailingAdapter), Handle::current());
        loader.request(TimeHorizon::Week);

        match loader.next().await {
            Some(LoadOutcome::Failed(err)) => {
                assert_eq!(err.to_string(), "API returned status 503")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn test_loader_recovers_from_panicking_adapter() {
        let mut loader = Loader::new(Arc::new(PanickingAdapter), Handle::current());
        loader.request(TimeHorizon::Hour);

        match loader.next().await {
            Some(LoadOutcome::Failed(AdapterError::Unavailable(msg))) => {
                assert!(msg.starts_with("fetch task failed"))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!loader.is_loading());

        // Later requests still go through.
        loader.request(TimeHorizon::Week);
        assert!(matches!(loader.next().await, Some(LoadOutcome::Loaded(_))));
    }
}
