//! Expand/collapse state and the flattened list of visible table rows.

use std::collections::BTreeSet;

use super::metrics::{DashboardData, Metric, MetricCategory};

/// Which categories and metrics are expanded, by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    categories: BTreeSet<String>,
    metrics: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_category_expanded(&self, id: &str) -> bool {
        self.categories.contains(id)
    }

    pub fn is_metric_expanded(&self, id: &str) -> bool {
        self.metrics.contains(id)
    }

    /// Flip a category between expanded and collapsed.
    pub fn toggle_category(&mut self, id: &str) {
        toggle(&mut self.categories, id);
    }

    /// Flip a metric between expanded and collapsed.
    pub fn toggle_metric(&mut self, id: &str) {
        toggle(&mut self.metrics, id);
    }

    /// Expand every category and every expandable top-level metric.
    pub fn expand_all(&mut self, data: &DashboardData) {
        self.categories = data.categories.iter().map(|c| c.id.clone()).collect();
        self.metrics = data
            .categories
            .iter()
            .flat_map(|c| c.metrics.iter())
            .filter(|m| m.is_expandable)
            .map(|m| m.id.clone())
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.categories.clear();
        self.metrics.clear();
    }

    pub fn expanded_category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn expanded_metric_count(&self) -> usize {
        self.metrics.len()
    }
}

fn toggle(set: &mut BTreeSet<String>, id: &str) {
    if !set.remove(id) {
        set.insert(id.to_string());
    }
}

/// A row of the metrics table, addressed by indices into [`DashboardData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleRow {
    /// Category header; shows the key metric's values when collapsed.
    Category { category: usize },
    /// Top-level metric of an expanded category.
    Metric { category: usize, metric: usize },
    /// Breakdown row of an expanded metric.
    Child {
        category: usize,
        metric: usize,
        child: usize,
    },
}

impl VisibleRow {
    pub fn category<'a>(&self, data: &'a DashboardData) -> Option<&'a MetricCategory> {
        let index = match *self {
            VisibleRow::Category { category }
            | VisibleRow::Metric { category, .. }
            | VisibleRow::Child { category, .. } => category,
        };
        data.categories.get(index)
    }

    /// The metric this row displays. Category rows resolve to their key metric.
    pub fn metric<'a>(&self, data: &'a DashboardData) -> Option<&'a Metric> {
        let category = self.category(data)?;
        match *self {
            VisibleRow::Category { .. } => category.key_metric(),
            VisibleRow::Metric { metric, .. } => category.metrics.get(metric),
            VisibleRow::Child { metric, child, .. } => {
                category.metrics.get(metric)?.children.get(child)
            }
        }
    }

    /// True for the first metric of a category.
    pub fn is_key_metric(&self) -> bool {
        matches!(self, VisibleRow::Metric { metric: 0, .. })
    }
}

/// Flatten the data into the rows currently on screen.
///
/// A non-empty `filter` matches names case-insensitively. Matching
/// categories are forced open, and so are metrics with a matching child.
pub fn visible_rows(
    data: &DashboardData,
    expansion: &ExpansionState,
    filter: &str,
) -> Vec<VisibleRow> {
    let search = filter.trim().to_lowercase();
    let matches = |name: &str| search.is_empty() || name.to_lowercase().contains(&search);
    let mut rows = Vec::new();

    for (ci, category) in data.categories.iter().enumerate() {
        let category_matches = !search.is_empty() && matches(&category.name);
        let metric_visible = |m: &Metric| {
            search.is_empty()
                || category_matches
                || matches(&m.name)
                || m.children.iter().any(|c| matches(&c.name))
        };

        if !search.is_empty() && !category.metrics.iter().any(|m| metric_visible(m)) {
            continue;
        }

        rows.push(VisibleRow::Category { category: ci });

        let expanded = !search.is_empty() || expansion.is_category_expanded(&category.id);
        if !expanded {
            continue;
        }

        for (mi, metric) in category.metrics.iter().enumerate() {
            if !metric_visible(metric) {
                continue;
            }
            rows.push(VisibleRow::Metric {
                category: ci,
                metric: mi,
            });

            let forced = !search.is_empty() && metric.children.iter().any(|c| matches(&c.name));
            if metric.has_children() && (expansion.is_metric_expanded(&metric.id) || forced) {
                for child in 0..metric.children.len() {
                    rows.push(VisibleRow::Child {
                        category: ci,
                        metric: mi,
                        child,
                    });
                }
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Filters, MetricLevel, MetricValue, SparklineData, TimeHorizon, ValueFormat};

    fn metric(id: &str, name: &str, children: Vec<Metric>) -> Metric {
        let value = MetricValue::new(10.0, 9.0, ValueFormat::Number);
        Metric {
            id: id.to_string(),
            name: name.to_string(),
            parent_label: None,
            level: MetricLevel::Parent,
            is_expandable: !children.is_empty(),
            last_period: value,
            period_to_date: value,
            sparkline: SparklineData::default(),
            rolling_period: value,
            children,
        }
    }

    fn category_row(category: usize) -> VisibleRow {
        VisibleRow::Category { category }
    }

    fn metric_row(category: usize, metric: usize) -> VisibleRow {
        VisibleRow::Metric { category, metric }
    }

    fn child_row(category: usize, metric: usize, child: usize) -> VisibleRow {
        VisibleRow::Child {
            category,
            metric,
            child,
        }
    }

    fn id_of(row: VisibleRow, data: &DashboardData) -> Option<&str> {
        row.metric(data).map(|m| m.id.as_str())
    }

    fn sample() -> DashboardData {
        DashboardData {
            categories: vec![
                MetricCategory {
                    id: "growth".to_string(),
                    name: "GROWTH".to_string(),
                    hero_metric_id: "signups".to_string(),
                    metrics: vec![
                        metric("signups", "Signups", vec![]),
                        metric(
                            "active-users",
                            "Active Users",
                            vec![
                                metric("active-free", "Free", vec![]),
                                metric("active-paid", "Paid", vec![]),
                            ],
                        ),
                    ],
                },
                MetricCategory {
                    id: "revenue".to_string(),
                    name: "REVENUE".to_string(),
                    hero_metric_id: "mrr".to_string(),
                    metrics: vec![metric("mrr", "MRR", vec![])],
                },
            ],
            filters: Filters {
                time_horizon: TimeHorizon::Week,
                product: "dooze".to_string(),
                region: "global".to_string(),
            },
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut state = ExpansionState::new();
        state.toggle_category("growth");
        assert!(state.is_category_expanded("growth"));
        state.toggle_category("growth");
        assert!(!state.is_category_expanded("growth"));
    }

    #[test]
    fn test_expand_all_only_expandable_metrics() {
        let mut state = ExpansionState::new();
        state.expand_all(&sample());
        assert_eq!(state.expanded_category_count(), 2);
        assert!(state.is_metric_expanded("active-users"));
        assert!(!state.is_metric_expanded("signups"));
        state.collapse_all();
        assert_eq!(state, ExpansionState::default());
    }

    #[test]
    fn test_collapsed_shows_category_rows_only() {
        let rows = visible_rows(&sample(), &ExpansionState::new(), "");
        assert_eq!(rows, vec![category_row(0), category_row(1)]);
        let data = sample();
        assert_eq!(id_of(rows[0], &data), Some("signups"));
    }

    #[test]
    fn test_expanded_metric_reveals_children() {
        let data = sample();
        let mut state = ExpansionState::new();
        state.toggle_category("growth");
        assert_eq!(visible_rows(&data, &state, "").len(), 4);

        state.toggle_metric("active-users");
        let rows = visible_rows(&data, &state, "");
        assert_eq!(rows.len(), 6);
        assert!(rows[1].is_key_metric());
        assert_eq!(id_of(rows[4], &data), Some("active-paid"));
    }

    #[test]
    fn test_filter_forces_matching_rows_open() {
        let data = sample();
        let rows = visible_rows(&data, &ExpansionState::new(), "paid");
        assert_eq!(
            rows,
            vec![
                category_row(0),
                metric_row(0, 1),
                child_row(0, 1, 0),
                child_row(0, 1, 1),
            ]
        );
    }

    #[test]
    fn test_filter_on_category_name_shows_all_its_metrics() {
        let rows = visible_rows(&sample(), &ExpansionState::new(), "revenue");
        assert_eq!(rows, vec![category_row(1), metric_row(1, 0)]);
    }

    #[test]
    fn test_filter_without_matches_is_empty() {
        let rows = visible_rows(&sample(), &ExpansionState::new(), "latency");
        assert!(rows.is_empty());
    }
}
