//! HTTP adapter for a REST metrics backend.
//!
//! Fetches `GET {base_url}/api/metrics?horizon={hour|day|week|month}` and
//! expects a [`DashboardData`] JSON body.
//!
//! ## Example
//!
//! ```rust,no_run
//! use metrics_dashboard::{HttpAdapter, MetricsAdapter, TimeHorizon};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = HttpAdapter::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     let data = adapter.get_metrics(TimeHorizon::Week).await?;
//!     println!("Fetched {} categories", data.categories.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{AdapterError, MetricsAdapter};
use crate::data::{DashboardData, TimeHorizon};

/// Adapter that fetches dashboard snapshots over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAdapter {
    client: Client,
    base_url: String,
    description: String,
}

impl HttpAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> HttpAdapterBuilder {
        HttpAdapterBuilder::default()
    }

    /// The URL fetched for a horizon.
    pub fn metrics_url(&self, horizon: TimeHorizon) -> String {
        format!("{}/api/metrics?horizon={}", self.base_url, horizon.as_str())
    }
}

#[async_trait]
impl MetricsAdapter for HttpAdapter {
    async fn get_metrics(&self, horizon: TimeHorizon) -> Result<DashboardData, AdapterError> {
        let url = self.metrics_url(horizon);
        debug!(%url, "fetching metrics");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AdapterError::Status(response.status().as_u16()));
        }

        let mut data: DashboardData = response
            .json()
            .await
            .map_err(|e| AdapterError::Parse(e.to_string()))?;
        data.filters.time_horizon = horizon;
        Ok(data)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpAdapter.
#[derive(Debug, Default)]
pub struct HttpAdapterBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpAdapterBuilder {
    /// Set the backend base URL (e.g., "http://localhost:8080").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<HttpAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();
        let description = format!("http: {}", base_url);

        Ok(HttpAdapter {
            client,
            base_url,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockAdapter;
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response and return the request line that was received.
    async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base_url, handle)
    }

    /// Adapter for a local test server, bypassing any proxy from the environment.
    fn local_adapter(base_url: String) -> HttpAdapter {
        HttpAdapter {
            client: Client::builder().no_proxy().build().unwrap(),
            description: format!("http: {}", base_url),
            base_url,
        }
    }

    #[test]
    fn test_builder_defaults() {
        let adapter = HttpAdapter::builder().build().unwrap();
        assert_eq!(adapter.base_url, "http://localhost:8080");
        assert_eq!(adapter.description(), "http: http://localhost:8080");
    }

    #[test]
    fn test_metrics_url_per_horizon() {
        let adapter = HttpAdapter::builder()
            .base_url("https://metrics.example.com/")
            .build()
            .unwrap();

        assert_eq!(
            adapter.metrics_url(TimeHorizon::Hour),
            "https://metrics.example.com/api/metrics?horizon=hour"
        );
        assert_eq!(
            adapter.metrics_url(TimeHorizon::Month),
            "https://metrics.example.com/api/metrics?horizon=month"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_error() {
        let adapter = HttpAdapter::builder()
            .base_url("http://127.0.0.1:9")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        assert!(adapter.get_metrics(TimeHorizon::Week).await.is_err());
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let (base_url, server) = serve_once("503 Service Unavailable", String::new()).await;
        let adapter = local_adapter(base_url);

        let err = adapter.get_metrics(TimeHorizon::Week).await.unwrap_err();
        assert!(matches!(err, AdapterError::Status(503)));
        assert_eq!(err.to_string(), "API returned status 503");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_requested_horizon_overrides_body() {
        let data = MockAdapter::new().generate(TimeHorizon::Day, Utc::now());
        let body = serde_json::to_string(&data).unwrap();
        let (base_url, server) = serve_once("200 OK", body).await;
        let adapter = local_adapter(base_url);

        let fetched = adapter.get_metrics(TimeHorizon::Month).await.unwrap();
        assert_eq!(fetched.filters.time_horizon, TimeHorizon::Month);
        assert_eq!(fetched.categories.len(), data.categories.len());
        assert_eq!(fetched.metric_count(), data.metric_count());

        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /api/metrics?horizon=month HTTP/1.1");
    }

    #[tokio::test]
    async fn test_invalid_body_is_a_parse_error() {
        let (base_url, server) = serve_once("200 OK", "{\"categories\": 3}".to_string()).await;
        let adapter = local_adapter(base_url);

        let err = adapter.get_metrics(TimeHorizon::Week).await.unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
        server.await.unwrap();
    }
}
