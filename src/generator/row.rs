//! Generated series rows

use std::collections::BTreeMap;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use crate::query::DimensionValues;

/// A metric's value on one row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Summable count
    Count(u64),
    /// Summable amount (yuan, two decimals)
    Amount(f64),
    /// Percentage with one decimal, as displayed
    Rate(String),
}

/// Signed percentage changes against last month and last year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Delta {
    pub mom: f64,
    pub yoy: f64,
}

/// One record for a time bucket and dimension-value combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    /// Day of the record, or first day of its week/month bucket
    #[serde(rename = "dt")]
    pub date: NaiveDate,
    /// Hour of day; `None` once rolled up beyond hourly granularity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    pub dimensions: BTreeMap<String, String>,
    pub values: BTreeMap<String, MetricValue>,
    pub deltas: BTreeMap<String, Delta>,
}

impl MetricValue {
    /// Numeric view (rates parsed back from their display form)
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricValue::Count(n) => *n as f64,
            MetricValue::Amount(a) => *a,
            MetricValue::Rate(r) => r.parse().unwrap_or(0.0),
        }
    }
}

impl SeriesRow {
    pub fn value(&self, metric_id: &str) -> Option<&MetricValue> {
        self.values.get(metric_id)
    }

    pub fn count(&self, metric_id: &str) -> Option<u64> {
        match self.values.get(metric_id)? {
            MetricValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn amount(&self, metric_id: &str) -> Option<f64> {
        match self.values.get(metric_id)? {
            MetricValue::Amount(a) => Some(*a),
            _ => None,
        }
    }

    pub fn rate(&self, metric_id: &str) -> Option<&str> {
        match self.values.get(metric_id)? {
            MetricValue::Rate(r) => Some(r),
            _ => None,
        }
    }

    pub fn delta(&self, metric_id: &str) -> Option<Delta> {
        self.deltas.get(metric_id).copied()
    }

    /// Flat record: `dt`, `hour`, one key per dimension, and per metric
    /// `<id>`, `<id>_mom`, `<id>_yoy`
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("dt".to_string(), Value::String(self.date.to_string()));
        if let Some(hour) = self.hour {
            record.insert("hour".to_string(), Value::from(hour));
        }
        for (dim, value) in &self.dimensions {
            record.insert(dim.clone(), Value::String(value.clone()));
        }
        for (metric, value) in &self.values {
            let json = match value {
                MetricValue::Count(n) => Value::from(*n),
                MetricValue::Amount(a) => Value::from(*a),
                MetricValue::Rate(r) => Value::String(r.clone()),
            };
            record.insert(metric.clone(), json);
            if let Some(delta) = self.deltas.get(metric) {
                record.insert(format!("{}_mom", metric), Value::from(delta.mom));
                record.insert(format!("{}_yoy", metric), Value::from(delta.yoy));
            }
        }
        record
    }
}

impl DimensionValues for SeriesRow {
    fn dimension_value(&self, dim_id: &str) -> Option<&str> {
        if dim_id == crate::catalog::DATE_DIMENSION {
            return None;
        }
        self.dimensions.get(dim_id).map(String::as_str)
    }
}
