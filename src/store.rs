use crate::normalize::MetricValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reporting year within a statement's time series.
pub type Period = i32;

/// Per-period values for one canonical metric. The `BTreeMap` keeps periods
/// unique and ascending, which is the ordering invariant consumers rely on.
pub type PeriodSeries = BTreeMap<Period, MetricValue>;

/// The normalized, statement-scoped metric store.
///
/// A metric that never matched any row in the raw table is absent from the
/// map entirely, which is a different state from being present but
/// [`MetricValue::Unavailable`] at some period. Both collapse to a
/// caller-supplied default through [`MetricSeries::value_at`], the single
/// access path used by the ratio and valuation calculators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSeries {
    metrics: BTreeMap<String, PeriodSeries>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: impl Into<String>, period: Period, value: MetricValue) {
        self.metrics
            .entry(metric.into())
            .or_default()
            .insert(period, value);
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn contains_metric(&self, metric: &str) -> bool {
        self.metrics.contains_key(metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = (&String, &PeriodSeries)> {
        self.metrics.iter()
    }

    pub fn series(&self, metric: &str) -> Option<&PeriodSeries> {
        self.metrics.get(metric)
    }

    /// Most recent period carried by any metric in this series.
    pub fn latest_period(&self) -> Option<Period> {
        self.metrics
            .values()
            .filter_map(|series| series.keys().next_back())
            .max()
            .copied()
    }

    /// Stored value at (metric, period); `default` if the metric is absent or
    /// the value is unavailable at that period.
    pub fn value_at(&self, metric: &str, period: Period, default: f64) -> f64 {
        self.metrics
            .get(metric)
            .and_then(|series| series.get(&period))
            .and_then(MetricValue::as_f64)
            .unwrap_or(default)
    }

    /// Value at the metric's own most recent period, if present and available.
    pub fn latest(&self, metric: &str) -> Option<f64> {
        self.metrics
            .get(metric)
            .and_then(|series| series.values().next_back())
            .and_then(MetricValue::as_f64)
    }

    /// Like [`Self::latest`], collapsing absence and unavailability to `default`.
    pub fn latest_or(&self, metric: &str, default: f64) -> f64 {
        self.latest(metric).unwrap_or(default)
    }
}
