//! Built-in sample data generator.
//!
//! Produces a full dashboard with eight categories and plausible trends.
//! All randomness comes from a seeded [`Xorshift64`], so the same seed,
//! horizon and clock always produce the same snapshot.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Months, TimeDelta, Utc};
use tracing::debug;

use super::{AdapterError, MetricsAdapter};
use crate::data::{
    DashboardData, Filters, Metric, MetricCategory, MetricLevel, MetricValue, SparklineData,
    SparklinePoint, TimeHorizon, ValueFormat,
};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x5EED_2024;

const DEFAULT_LATENCY: Duration = Duration::from_millis(100);
const SPARKLINE_VARIANCE: f64 = 0.15;

// Deterministic PRNG (xorshift64)

/// Small deterministic pseudo-random generator.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

struct MetricSpec {
    id: &'static str,
    name: &'static str,
    base: f64,
    format: ValueFormat,
    growth: f64,
    /// Label shown on child rows; only set on expandable metrics.
    child_label: Option<&'static str>,
    children: &'static [MetricSpec],
}

const fn spec(
    id: &'static str,
    name: &'static str,
    base: f64,
    format: ValueFormat,
    growth: f64,
) -> MetricSpec {
    MetricSpec {
        id,
        name,
        base,
        format,
        growth,
        child_label: None,
        children: &[],
    }
}

const fn expandable(
    parent: MetricSpec,
    child_label: &'static str,
    children: &'static [MetricSpec],
) -> MetricSpec {
    MetricSpec {
        child_label: Some(child_label),
        children,
        ..parent
    }
}

struct CategorySpec {
    id: &'static str,
    name: &'static str,
    hero: &'static str,
    metrics: &'static [MetricSpec],
}

use ValueFormat::{Currency, Milliseconds, Number, Percent};

const ACTIVE_USER_TIERS: &[MetricSpec] = &[
    spec("active-free", "Free", 3450.0, Number, 0.07),
    spec("active-paid", "Paid", 780.0, Number, 0.18),
];

const DAU_TIERS: &[MetricSpec] = &[
    spec("dau-free", "Free", 980.0, Number, 0.08),
    spec("dau-paid", "Paid", 260.0, Number, 0.22),
];

const ACTION_KINDS: &[MetricSpec] = &[
    spec("ask-ai", "Ask AI", 12340.0, Number, 0.18),
    spec("summarize", "Summarize", 8920.0, Number, 0.12),
    spec("polish", "Polish", 7190.0, Number, 0.1),
];

const REVENUE_TIERS: &[MetricSpec] = &[
    spec("revenue-pro", "Pro", 4680.0, Currency, 0.1),
    spec("revenue-max", "Max", 3140.0, Currency, 0.16),
];

const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "growth",
        name: "GROWTH",
        hero: "signups",
        metrics: &[
            spec("downloads", "DMG Downloads", 2340.0, Number, 0.12),
            spec("installs", "Installs", 1850.0, Number, 0.1),
            spec("signups", "Signups", 892.0, Number, 0.15),
            expandable(
                spec("active-users", "Active Users", 4230.0, Number, 0.09),
                "Active Users",
                ACTIVE_USER_TIERS,
            ),
        ],
    },
    CategorySpec {
        id: "engagement",
        name: "ENGAGEMENT",
        hero: "dau",
        metrics: &[
            expandable(
                spec("dau", "Daily Active Users", 1240.0, Number, 0.11),
                "DAU",
                DAU_TIERS,
            ),
            spec("wau", "Weekly Active Users", 3420.0, Number, 0.09),
            spec("mau", "Monthly Active Users", 4890.0, Number, 0.08),
        ],
    },
    CategorySpec {
        id: "conversion",
        name: "CONVERSION",
        hero: "free-to-paid",
        metrics: &[
            spec(
                "download-to-install",
                "Download → Install",
                79.1,
                Percent,
                0.02,
            ),
            spec("install-to-signup", "Install → Signup", 48.2, Percent, 0.04),
            spec("signup-to-active", "Signup → Active", 62.4, Percent, 0.03),
            spec("free-to-paid", "Free → Paid", 8.4, Percent, 0.15),
        ],
    },
    CategorySpec {
        id: "churn",
        name: "CHURN",
        hero: "churn-rate",
        metrics: &[
            spec("paid-to-free", "Paid → Free", 12.0, Number, -0.08),
            spec(
                "inactive-free",
                "Inactive Free (2+ weeks)",
                342.0,
                Number,
                -0.05,
            ),
            spec("churn-rate", "Churn Rate", 2.3, Percent, -0.12),
        ],
    },
    CategorySpec {
        id: "usage",
        name: "USAGE",
        hero: "total-actions",
        metrics: &[
            expandable(
                spec("total-actions", "Total Actions", 28450.0, Number, 0.14),
                "Actions",
                ACTION_KINDS,
            ),
            spec("actions-per-user", "Actions per User", 6.7, Number, 0.05),
            spec(
                "conversations",
                "Conversations Started",
                4230.0,
                Number,
                0.11,
            ),
        ],
    },
    CategorySpec {
        id: "revenue",
        name: "REVENUE",
        hero: "mrr",
        metrics: &[
            spec("mrr", "MRR", 7820.0, Currency, 0.12),
            spec("arr", "ARR", 93840.0, Currency, 0.12),
            expandable(
                spec("revenue-by-tier", "Revenue by Tier", 7820.0, Currency, 0.12),
                "Revenue",
                REVENUE_TIERS,
            ),
        ],
    },
    CategorySpec {
        id: "spend",
        name: "SPEND",
        hero: "gross-margin",
        metrics: &[
            spec("daily-spend", "Daily API Spend", 42.5, Currency, 0.08),
            spec("monthly-spend", "Monthly API Spend", 1275.0, Currency, 0.08),
            spec(
                "spend-per-user",
                "Spend per Active User",
                0.34,
                Currency,
                -0.03,
            ),
            spec("gross-margin", "Gross Margin", 72.4, Percent, 0.02),
        ],
    },
    CategorySpec {
        id: "performance",
        name: "PERFORMANCE",
        hero: "error-rate",
        metrics: &[
            spec("error-rate", "Error Rate", 0.8, Percent, -0.15),
            spec("latency-p50", "Latency p50", 245.0, Milliseconds, -0.05),
            spec("latency-p95", "Latency p95", 890.0, Milliseconds, -0.04),
            spec("latency-p99", "Latency p99", 1450.0, Milliseconds, -0.03),
        ],
    },
];

/// Adapter that generates sample dashboard data.
#[derive(Debug, Clone)]
pub struct MockAdapter {
    seed: u64,
    latency: Duration,
    product: String,
    region: String,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapter {
    pub fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            latency: DEFAULT_LATENCY,
            product: "dooze".to_string(),
            region: "global".to_string(),
        }
    }

    /// Use a different seed for the generated trends.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Simulated network delay before each response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the snapshot for `horizon` as seen at `now`.
    pub fn generate(&self, horizon: TimeHorizon, now: DateTime<Utc>) -> DashboardData {
        let mut rng = Xorshift64::new(self.seed);

        let categories = CATEGORIES
            .iter()
            .map(|category| MetricCategory {
                id: category.id.to_string(),
                name: category.name.to_string(),
                hero_metric_id: category.hero.to_string(),
                metrics: category
                    .metrics
                    .iter()
                    .map(|spec| build_metric(spec, None, horizon, now, &mut rng))
                    .collect(),
            })
            .collect();

        DashboardData {
            categories,
            filters: Filters {
                time_horizon: horizon,
                product: self.product.clone(),
                region: self.region.clone(),
            },
        }
    }
}

#[async_trait]
impl MetricsAdapter for MockAdapter {
    async fn get_metrics(&self, horizon: TimeHorizon) -> Result<DashboardData, AdapterError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!(seed = self.seed, %horizon, "generating sample metrics");
        Ok(self.generate(horizon, Utc::now()))
    }

    fn description(&self) -> &str {
        "sample data"
    }
}

fn build_metric(
    spec: &MetricSpec,
    parent_label: Option<&str>,
    horizon: TimeHorizon,
    now: DateTime<Utc>,
    rng: &mut Xorshift64,
) -> Metric {
    let base = spec.base;
    let previous = base / (1.0 + spec.growth);
    let sparkline = generate_sparkline(base, horizon, now, rng);

    let label = spec.child_label;
    let children = spec
        .children
        .iter()
        .map(|child| build_metric(child, label, horizon, now, rng))
        .collect();

    Metric {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        parent_label: parent_label.map(str::to_string),
        level: if parent_label.is_some() {
            MetricLevel::Child
        } else {
            MetricLevel::Parent
        },
        is_expandable: !spec.children.is_empty(),
        last_period: MetricValue::new(base, previous, spec.format),
        period_to_date: MetricValue::new(base * 0.4, previous * 0.38, spec.format),
        sparkline,
        rolling_period: MetricValue::new(base * 0.98, previous * 0.95, spec.format),
        children,
    }
}

/// Number of points and the timestamp of point `i` for a horizon.
fn point_count(horizon: TimeHorizon) -> usize {
    match horizon {
        TimeHorizon::Hour | TimeHorizon::Day => 7 * 24,
        TimeHorizon::Week | TimeHorizon::Month => 7,
    }
}

fn point_date(horizon: TimeHorizon, now: DateTime<Utc>, steps_back: usize) -> DateTime<Utc> {
    let steps = steps_back as i64;
    match horizon {
        TimeHorizon::Hour | TimeHorizon::Day => now - TimeDelta::hours(steps),
        TimeHorizon::Week => now - TimeDelta::days(steps * 7),
        TimeHorizon::Month => now
            .checked_sub_months(Months::new(steps_back as u32))
            .unwrap_or(now),
    }
}

fn generate_sparkline(
    base: f64,
    horizon: TimeHorizon,
    now: DateTime<Utc>,
    rng: &mut Xorshift64,
) -> SparklineData {
    let variance = SPARKLINE_VARIANCE;
    let count = point_count(horizon);
    let mut current = base * (1.0 - variance * 0.5);

    let points = (0..count)
        .map(|i| {
            let change = (rng.next_f64() - 0.4) * variance * base;
            current = (current + change).max(0.0);

            let scale = 0.85 + rng.next_f64() * 0.15;
            let offset = (rng.next_f64() - 0.5) * variance * base * 0.5;
            let comparison = current * scale + offset;

            SparklinePoint {
                date: point_date(horizon, now, count - 1 - i),
                value: round2(current),
                comparison: round2(comparison),
            }
        })
        .collect();

    SparklineData::from_points(points)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
