//! Core metric types for the dashboard.
//!
//! These types mirror the JSON shape served by metrics backends (camelCase
//! field names) so a [`DashboardData`] can be read straight from a file or
//! an HTTP response.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::format::{calculate_delta, format_value};

/// Display unit/scale family for a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Plain number with K/M suffixes.
    #[default]
    Number,
    /// Percentage with one decimal.
    Percent,
    /// Dollar amount with K/M suffixes.
    Currency,
    /// Latency in milliseconds, promoted to seconds past 1000ms.
    Milliseconds,
}

/// How period-over-period change is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    /// Percentage change relative to the previous value.
    #[default]
    Pct,
    /// Absolute difference, formatted like the metric itself.
    Abs,
}

impl DeltaMode {
    /// Switch between percentage and absolute deltas.
    pub fn toggle(self) -> Self {
        match self {
            DeltaMode::Pct => DeltaMode::Abs,
            DeltaMode::Abs => DeltaMode::Pct,
        }
    }

    /// Returns the display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            DeltaMode::Pct => "PCT",
            DeltaMode::Abs => "ABS",
        }
    }
}

impl FromStr for DeltaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pct" | "percent" => Ok(DeltaMode::Pct),
            "abs" | "absolute" => Ok(DeltaMode::Abs),
            other => Err(format!("unknown delta mode: {other}")),
        }
    }
}

/// Granularity filter for a metrics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Hour,
    Day,
    #[default]
    Week,
    Month,
}

impl TimeHorizon {
    /// All horizons in display order.
    pub const ALL: [TimeHorizon; 4] = [
        TimeHorizon::Hour,
        TimeHorizon::Day,
        TimeHorizon::Week,
        TimeHorizon::Month,
    ];

    /// Cycle to the next horizon.
    pub fn next(self) -> Self {
        match self {
            TimeHorizon::Hour => TimeHorizon::Day,
            TimeHorizon::Day => TimeHorizon::Week,
            TimeHorizon::Week => TimeHorizon::Month,
            TimeHorizon::Month => TimeHorizon::Hour,
        }
    }

    /// Cycle to the previous horizon.
    pub fn prev(self) -> Self {
        match self {
            TimeHorizon::Hour => TimeHorizon::Month,
            TimeHorizon::Day => TimeHorizon::Hour,
            TimeHorizon::Week => TimeHorizon::Day,
            TimeHorizon::Month => TimeHorizon::Week,
        }
    }

    /// Returns the display label for this horizon.
    pub fn label(&self) -> &'static str {
        match self {
            TimeHorizon::Hour => "HOUR",
            TimeHorizon::Day => "DAY",
            TimeHorizon::Week => "WEEK",
            TimeHorizon::Month => "MONTH",
        }
    }

    /// Lowercase name used in query strings and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizon::Hour => "hour",
            TimeHorizon::Day => "day",
            TimeHorizon::Week => "week",
            TimeHorizon::Month => "month",
        }
    }
}

impl fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeHorizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeHorizon::Hour),
            "day" => Ok(TimeHorizon::Day),
            "week" => Ok(TimeHorizon::Week),
            "month" => Ok(TimeHorizon::Month),
            other => Err(format!("unknown time horizon: {other}")),
        }
    }
}

/// One observed metric reading and its comparison baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
    pub value: f64,
    pub previous_value: f64,
    pub format: ValueFormat,
}

impl MetricValue {
    pub fn new(value: f64, previous_value: f64, format: ValueFormat) -> Self {
        Self {
            value,
            previous_value,
            format,
        }
    }

    /// Change from the previous value in the given mode.
    pub fn delta(&self, mode: DeltaMode) -> f64 {
        calculate_delta(self.value, self.previous_value, mode)
    }

    /// The current value rendered in this metric's format.
    pub fn formatted(&self) -> String {
        format_value(self.value, self.format)
    }
}

/// A single point of a trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparklinePoint {
    pub date: DateTime<Utc>,
    pub value: f64,
    /// Value of the comparison (previous) period at the same offset.
    pub comparison: f64,
}

/// Trend series for a metric, with the shared y-axis range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparklineData {
    #[serde(rename = "data")]
    pub points: Vec<SparklinePoint>,
    pub min: f64,
    pub max: f64,
}

impl SparklineData {
    /// Build sparkline data, computing the range over both series.
    pub fn from_points(points: Vec<SparklinePoint>) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let values = points.iter().flat_map(|p| [p.value, p.comparison]);
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        Self { points, min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Current-period values in chronological order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Comparison-period values in chronological order.
    pub fn comparisons(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.comparison).collect()
    }
}

/// Whether a metric is a top-level row or a breakdown of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricLevel {
    #[default]
    Parent,
    Child,
}

/// A metric row with its three comparison windows and trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_label: Option<String>,
    #[serde(default)]
    pub level: MetricLevel,
    #[serde(default)]
    pub is_expandable: bool,
    pub last_period: MetricValue,
    pub period_to_date: MetricValue,
    #[serde(default)]
    pub sparkline: SparklineData,
    pub rolling_period: MetricValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Metric>,
}

impl Metric {
    /// True when the metric can be expanded and has rows to reveal.
    pub fn has_children(&self) -> bool {
        self.is_expandable && !self.children.is_empty()
    }

    pub fn is_child(&self) -> bool {
        self.level == MetricLevel::Child
    }

    /// The format of the metric, taken from its last-period value.
    pub fn format(&self) -> ValueFormat {
        self.last_period.format
    }
}

/// A named group of metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCategory {
    pub id: String,
    pub name: String,
    pub hero_metric_id: String,
    pub metrics: Vec<Metric>,
}

impl MetricCategory {
    /// The first metric, shown as the category preview when collapsed.
    pub fn key_metric(&self) -> Option<&Metric> {
        self.metrics.first()
    }

    /// The metric named by `hero_metric_id`, if present.
    pub fn hero_metric(&self) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.id == self.hero_metric_id)
    }
}

/// Global filters the data was fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub time_horizon: TimeHorizon,
    pub product: String,
    pub region: String,
}

/// A complete dashboard snapshot for one time horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub categories: Vec<MetricCategory>,
    pub filters: Filters,
}

impl DashboardData {
    /// Parse dashboard data from a JSON string.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Find a metric (parent or child) by id.
    pub fn find_metric(&self, id: &str) -> Option<&Metric> {
        self.categories
            .iter()
            .flat_map(|c| c.metrics.iter())
            .flat_map(|m| std::iter::once(m).chain(m.children.iter()))
            .find(|m| m.id == id)
    }

    /// Total number of metrics including children.
    pub fn metric_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.metrics.iter())
            .map(|m| 1 + m.children.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "categories": [{
                "id": "revenue",
                "name": "REVENUE",
                "heroMetricId": "mrr",
                "metrics": [{
                    "id": "mrr",
                    "name": "MRR",
                    "level": "parent",
                    "isExpandable": true,
                    "lastPeriod": { "value": 7820, "previousValue": 6982.14, "format": "currency" },
                    "periodToDate": { "value": 3128, "previousValue": 2653.21, "format": "currency" },
                    "sparkline": {
                        "data": [
                            { "date": "2026-10-12T00:00:00Z", "value": 7000, "comparison": 6500 },
                            { "date": "2026-10-13T00:00:00Z", "value": 7820, "comparison": 6900 }
                        ],
                        "min": 6500,
                        "max": 7820
                    },
                    "rollingPeriod": { "value": 7663.6, "previousValue": 6633.03, "format": "currency" },
                    "children": [{
                        "id": "mrr-pro",
                        "name": "Pro",
                        "parentLabel": "MRR",
                        "level": "child",
                        "lastPeriod": { "value": 4680, "previousValue": 4254.55, "format": "currency" },
                        "periodToDate": { "value": 1872, "previousValue": 1616.73, "format": "currency" },
                        "rollingPeriod": { "value": 4586.4, "previousValue": 4041.82, "format": "currency" }
                    }]
                }]
            }],
            "filters": { "timeHorizon": "week", "product": "dooze", "region": "global" }
        }"#
    }

    #[test]
    fn test_deserialize_dashboard() {
        let data = DashboardData::parse(sample_json()).unwrap();
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.filters.time_horizon, TimeHorizon::Week);

        let category = &data.categories[0];
        assert_eq!(category.hero_metric().map(|m| m.name.as_str()), Some("MRR"));

        let mrr = category.key_metric().unwrap();
        assert_eq!(mrr.format(), ValueFormat::Currency);
        assert!(mrr.has_children());
        assert_eq!(mrr.sparkline.points.len(), 2);

        let pro = &mrr.children[0];
        assert!(pro.is_child());
        assert_eq!(pro.parent_label.as_deref(), Some("MRR"));
        assert!(pro.sparkline.is_empty());
    }

    #[test]
    fn test_find_metric_includes_children() {
        let data = DashboardData::parse(sample_json()).unwrap();
        assert!(data.find_metric("mrr-pro").is_some());
        assert!(data.find_metric("missing").is_none());
        assert_eq!(data.metric_count(), 2);
    }

    #[test]
    fn test_expandable_without_children_has_no_children() {
        let mut data = DashboardData::parse(sample_json()).unwrap();
        let mrr = &mut data.categories[0].metrics[0];
        mrr.children.clear();
        assert!(mrr.is_expandable);
        assert!(!mrr.has_children());
    }

    #[test]
    fn test_sparkline_range_covers_both_series() {
        let date = "2026-10-12T00:00:00Z".parse().unwrap();
        let point = |value, comparison| SparklinePoint {
            date,
            value,
            comparison,
        };
        let sparkline = SparklineData::from_points(vec![point(10.0, 4.0), point(12.0, 15.0)]);
        assert_eq!(sparkline.min, 4.0);
        assert_eq!(sparkline.max, 15.0);

        let empty = SparklineData::from_points(Vec::new());
        assert_eq!(empty, SparklineData::default());
    }

    #[test]
    fn test_horizon_cycle_and_parse() {
        let mut horizon = TimeHorizon::Hour;
        for expected in [
            TimeHorizon::Day,
            TimeHorizon::Week,
            TimeHorizon::Month,
            TimeHorizon::Hour,
        ] {
            horizon = horizon.next();
            assert_eq!(horizon, expected);
        }
        assert_eq!(TimeHorizon::Hour.prev(), TimeHorizon::Month);
        assert_eq!("Month".parse::<TimeHorizon>(), Ok(TimeHorizon::Month));
        assert!("year".parse::<TimeHorizon>().is_err());
    }

    #[test]
    fn test_delta_mode_toggle_and_parse() {
        assert_eq!(DeltaMode::Pct.toggle(), DeltaMode::Abs);
        assert_eq!(DeltaMode::Abs.toggle(), DeltaMode::Pct);
        assert_eq!("abs".parse::<DeltaMode>(), Ok(DeltaMode::Abs));
        assert_eq!(DeltaMode::default().label(), "PCT");
    }

    #[test]
    fn test_metric_value_helpers() {
        let value = MetricValue::new(245.0, 200.0, ValueFormat::Milliseconds);
        assert_eq!(value.formatted(), "245ms");
        assert_eq!(value.delta(DeltaMode::Abs), 45.0);
    }
}
