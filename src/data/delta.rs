//! Delta badges and good/bad direction for metric changes.

use std::collections::BTreeSet;

use super::format::{calculate_delta, format_delta};
use super::metrics::{DeltaMode, MetricValue};

/// Metrics where growth is bad (latency, churn, spend).
pub const DEFAULT_INVERTED_METRICS: &[&str] = &[
    "error-rate",
    "latency-p50",
    "latency-p95",
    "latency-p99",
    "churn-rate",
    "paid-to-free",
    "daily-spend",
    "monthly-spend",
    "spend-per-user",
];

/// Set of metric ids whose delta colors are inverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvertedMetrics {
    ids: BTreeSet<String>,
}

impl Default for InvertedMetrics {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl InvertedMetrics {
    /// The built-in set plus any extra ids.
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = DEFAULT_INVERTED_METRICS
            .iter()
            .map(|id| id.to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();
        Self { ids }
    }

    pub fn contains(&self, metric_id: &str) -> bool {
        self.ids.contains(metric_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A computed delta ready for display next to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaBadge {
    pub delta: f64,
    pub text: String,
    /// `delta >= 0`, so a flat metric counts as positive.
    pub is_positive: bool,
    /// Whether the change is desirable, after inversion.
    pub is_good: bool,
}

impl DeltaBadge {
    pub fn new(value: &MetricValue, mode: DeltaMode, inverted: bool) -> Self {
        let delta = calculate_delta(value.value, value.previous_value, mode);
        let is_positive = delta >= 0.0;
        Self {
            delta,
            text: format_delta(delta, mode, value.format),
            is_positive,
            is_good: if inverted { !is_positive } else { is_positive },
        }
    }

    pub fn arrow(&self) -> &'static str {
        if self.is_positive {
            "↑"
        } else {
            "↓"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ValueFormat;

    #[test]
    fn test_growth_is_good_by_default() {
        let value = MetricValue::new(892.0, 775.65, ValueFormat::Number);
        let badge = DeltaBadge::new(&value, DeltaMode::Pct, false);
        assert!(badge.is_positive);
        assert!(badge.is_good);
        assert_eq!(badge.arrow(), "↑");
        assert!(badge.text.starts_with('+'));
    }

    #[test]
    fn test_inverted_metric_flips_color_not_arrow() {
        let value = MetricValue::new(245.0, 200.0, ValueFormat::Milliseconds);
        let badge = DeltaBadge::new(&value, DeltaMode::Pct, true);
        assert_eq!(badge.text, "+22.5%");
        assert_eq!(badge.arrow(), "↑");
        assert!(!badge.is_good);

        let badge = DeltaBadge::new(&value, DeltaMode::Abs, true);
        assert_eq!(badge.text, "+45ms");
    }

    #[test]
    fn test_decline_on_inverted_metric_is_good() {
        let value = MetricValue::new(0.8, 0.94, ValueFormat::Percent);
        let badge = DeltaBadge::new(&value, DeltaMode::Abs, true);
        assert_eq!(badge.text, "-0.1%");
        assert_eq!(badge.arrow(), "↓");
        assert!(badge.is_good);
    }

    #[test]
    fn test_flat_metric_is_positive() {
        let value = MetricValue::new(10.0, 10.0, ValueFormat::Number);
        let badge = DeltaBadge::new(&value, DeltaMode::Pct, false);
        assert_eq!(badge.text, "+0.0%");
        assert!(badge.is_positive);
    }

    #[test]
    fn test_inverted_metrics_extend_defaults() {
        let inverted = InvertedMetrics::new(["refund-rate"]);
        assert!(inverted.contains("latency-p99"));
        assert!(inverted.contains("refund-rate"));
        assert!(!inverted.contains("signups"));
        assert_eq!(inverted.len(), DEFAULT_INVERTED_METRICS.len() + 1);

        let defaults = InvertedMetrics::default();
        assert_eq!(defaults.len(), DEFAULT_INVERTED_METRICS.len());
    }
}
