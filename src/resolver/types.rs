//! Types for resolved compatibility and validated queries

use serde::Serialize;
use crate::catalog::{Dimension, Granularity, Metric};
use crate::period::{ComparisonMode, DateRange};
use crate::query::FilterSet;

/// Why a dimension is disabled for the current metric selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncompatibleReason {
    pub dimension: String,
    /// Metric ids excluding the dimension, in catalog order
    pub metrics: Vec<String>,
    /// Display text naming the excluding metrics
    pub message: String,
}

/// Picker state of one dimension
#[derive(Debug, Clone, Serialize)]
pub struct DimensionStatus<'a> {
    pub dimension: &'a Dimension,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IncompatibleReason>,
}

/// A query spec checked against the catalog
#[derive(Debug, Clone)]
pub struct ValidatedQuery<'a> {
    /// Selected metrics, in selection order, without duplicates
    pub metrics: Vec<&'a Metric>,
    /// Selected dimensions, in selection order, without duplicates
    pub dimensions: Vec<&'a Dimension>,
    pub granularity: Granularity,
    pub range: DateRange,
    /// Mode and derived range, when comparison is enabled
    pub comparison: Option<(ComparisonMode, DateRange)>,
    /// Filters re-checked against the catalog
    pub filters: FilterSet,
}

impl<'a> ValidatedQuery<'a> {
    pub fn metric_ids(&self) -> Vec<&'a str> {
        self.metrics.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn dimension_ids(&self) -> Vec<&'a str> {
        self.dimensions.iter().map(|d| d.id.as_str()).collect()
    }

    pub fn comparison_range(&self) -> Option<DateRange> {
        self.comparison.map(|(_, range)| range)
    }
}
