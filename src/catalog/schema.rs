//! Root catalog definition
//!
//! The catalog is an immutable in-memory table of metrics and dimensions keyed
//! by id. It is built once from a [`CatalogDef`] (usually parsed from YAML) and
//! never mutated afterwards; edits go through [`super::CatalogEditor`] and
//! produce a new snapshot.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use serde::{Deserialize, Serialize};
use super::dimension::Dimension;
use super::error::CatalogError;
use super::metric::{Metric, DATE_DIMENSION};
use super::types::Aggregation;
use crate::error::ParseError;

const BUILTIN_CATALOG: &str = include_str!("builtin.yaml");

/// Raw catalog document, as written in YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDef {
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

/// Validated, read-only registry of metrics and dimensions
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    dimensions: Vec<Dimension>,
    metrics: Vec<Metric>,
    #[serde(skip)]
    metric_index: HashMap<String, usize>,
    #[serde(skip)]
    dimension_index: HashMap<String, usize>,
}

/// Dimensions sharing a `group`, in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct DimensionGroup<'a> {
    pub name: &'a str,
    pub dimensions: Vec<&'a Dimension>,
}

/// Metrics sharing a `group`, in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct MetricGroup<'a> {
    pub name: &'a str,
    pub metrics: Vec<&'a Metric>,
}

impl Catalog {
    /// Validate a catalog definition and build the lookup indexes
    pub fn from_def(def: CatalogDef) -> Result<Self, CatalogError> {
        validate(&def)?;

        let metric_index = def
            .metrics
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let dimension_index = def
            .dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.clone(), i))
            .collect();

        tracing::debug!(
            metrics = def.metrics.len(),
            dimensions = def.dimensions.len(),
            "catalog loaded"
        );

        Ok(Catalog {
            dimensions: def.dimensions,
            metrics: def.metrics,
            metric_index,
            dimension_index,
        })
    }

    /// Load a catalog from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        crate::parser::parse_file(path)
    }

    /// The embedded ride-hailing operations catalog
    pub fn builtin() -> Result<Self, ParseError> {
        crate::parser::parse_str(BUILTIN_CATALOG)
    }

    /// Copy the catalog back into its raw definition
    pub fn to_def(&self) -> CatalogDef {
        CatalogDef {
            dimensions: self.dimensions.clone(),
            metrics: self.metrics.clone(),
        }
    }

    /// Get a metric by id
    pub fn get_metric(&self, id: &str) -> Option<&Metric> {
        self.metric_index.get(id).map(|&i| &self.metrics[i])
    }

    /// Get a dimension by id
    pub fn get_dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimension_index.get(id).map(|&i| &self.dimensions[i])
    }

    /// Get a metric by id, reporting a miss as an error
    ///
    /// Ids produced by this crate always exist, so a miss here is a caller bug.
    pub fn metric(&self, id: &str) -> Result<&Metric, CatalogError> {
        self.get_metric(id).ok_or_else(|| {
            tracing::warn!(metric = id, "lookup of unknown metric");
            CatalogError::MetricNotFound(id.to_string())
        })
    }

    /// Get a dimension by id, reporting a miss as an error
    pub fn dimension(&self, id: &str) -> Result<&Dimension, CatalogError> {
        self.get_dimension(id).ok_or_else(|| {
            tracing::warn!(dimension = id, "lookup of unknown dimension");
            CatalogError::DimensionNotFound(id.to_string())
        })
    }

    /// All metrics in catalog order
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// All dimensions in catalog order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Position of a metric in catalog order
    pub fn metric_position(&self, id: &str) -> Option<usize> {
        self.metric_index.get(id).copied()
    }

    /// Dimensions grouped by `group`, groups in first-appearance order
    pub fn dimension_groups(&self) -> Vec<DimensionGroup<'_>> {
        let mut groups: Vec<DimensionGroup<'_>> = Vec::new();
        for dim in &self.dimensions {
            match groups.iter_mut().find(|g| g.name == dim.group) {
                Some(group) => group.dimensions.push(dim),
                None => groups.push(DimensionGroup {
                    name: &dim.group,
                    dimensions: vec![dim],
                }),
            }
        }
        groups
    }

    /// Metrics grouped by `group`, groups in first-appearance order
    pub fn metric_groups(&self) -> Vec<MetricGroup<'_>> {
        let mut groups: Vec<MetricGroup<'_>> = Vec::new();
        for metric in &self.metrics {
            match groups.iter_mut().find(|g| g.name == metric.group) {
                Some(group) => group.metrics.push(metric),
                None => groups.push(MetricGroup {
                    name: &metric.group,
                    metrics: vec![metric],
                }),
            }
        }
        groups
    }

    pub fn metrics_in_group(&self, group: &str) -> Vec<&Metric> {
        self.metrics.iter().filter(|m| m.group == group).collect()
    }

    pub fn starred_metrics(&self) -> Vec<&Metric> {
        self.metrics.iter().filter(|m| m.starred).collect()
    }

    /// Dimensions usable in filters
    pub fn enumerable_dimensions(&self) -> Vec<&Dimension> {
        self.dimensions.iter().filter(|d| d.is_enumerable).collect()
    }
}

/// Check every structural invariant of a catalog definition
fn validate(def: &CatalogDef) -> Result<(), CatalogError> {
    let mut dim_ids = HashSet::new();
    for dim in &def.dimensions {
        if !dim_ids.insert(dim.id.as_str()) {
            return Err(CatalogError::DuplicateDimension(dim.id.clone()));
        }
        if dim.id == DATE_DIMENSION {
            if dim.is_enumerable {
                return Err(CatalogError::EnumerableDateDimension(dim.id.clone()));
            }
            continue;
        }
        if dim.is_enumerable {
            if dim.enum_values.is_empty() {
                return Err(CatalogError::EmptyEnumValues(dim.id.clone()));
            }
            let mut seen = HashSet::new();
            for value in &dim.enum_values {
                if !seen.insert(value.as_str()) {
                    return Err(CatalogError::DuplicateEnumValue {
                        dimension: dim.id.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
    }
    if !dim_ids.contains(DATE_DIMENSION) {
        return Err(CatalogError::MissingDateDimension(DATE_DIMENSION.to_string()));
    }

    let mut metric_ids = HashSet::new();
    for metric in &def.metrics {
        if !metric_ids.insert(metric.id.as_str()) {
            return Err(CatalogError::DuplicateMetric(metric.id.clone()));
        }
    }

    for metric in &def.metrics {
        if metric.compatible_dims.is_empty() {
            return Err(CatalogError::EmptyCompatibility {
                metric: metric.id.clone(),
                kind: "dimensions",
            });
        }
        if metric.compatible_granularities.is_empty() {
            return Err(CatalogError::EmptyCompatibility {
                metric: metric.id.clone(),
                kind: "granularities",
            });
        }
        if let Some(unknown) = metric
            .compatible_dims
            .iter()
            .find(|d| !dim_ids.contains(d.as_str()))
        {
            return Err(CatalogError::UnknownCompatibleDimension {
                metric: metric.id.clone(),
                dimension: unknown.clone(),
            });
        }
        match (&metric.ratio, metric.aggregation) {
            (None, Aggregation::Calc) => {
                return Err(CatalogError::MissingRatio(metric.id.clone()));
            }
            (Some(ratio), _) => {
                for reference in [&ratio.numerator, &ratio.denominator] {
                    if !metric_ids.contains(reference.as_str()) {
                        return Err(CatalogError::UnknownRatioMetric {
                            metric: metric.id.clone(),
                            reference: reference.clone(),
                        });
                    }
                }
            }
            (None, _) => {}
        }
    }

    Ok(())
}
