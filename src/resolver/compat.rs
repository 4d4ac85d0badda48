//! Metric/dimension compatibility
//!
//! Determines which dimensions and granularities stay legal for a metric
//! selection:
//! - Dimensions: intersection of every selected metric's `compatibleDims`,
//!   always including `dt`
//! - Granularities: intersection of every selected metric's granularities
//!
//! Everything here is a pure function of the catalog and the selection. Dropping
//! dimensions that became disabled is the caller's job.

use crate::catalog::{Catalog, Dimension, Granularity, Metric, DATE_DIMENSION};
use super::error::ResolveError;
use super::types::{DimensionStatus, IncompatibleReason};

/// Look up the selected metrics, deduplicated and in catalog order
fn selected_metrics<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    metric_ids: &[S],
) -> Result<Vec<&'a Metric>, ResolveError> {
    let mut metrics = Vec::with_capacity(metric_ids.len());
    for id in metric_ids {
        let metric = catalog.metric(id.as_ref())?;
        if !metrics.iter().any(|m: &&Metric| m.id == metric.id) {
            metrics.push(metric);
        }
    }
    metrics.sort_by_key(|m| catalog.metric_position(&m.id));
    Ok(metrics)
}

/// Dimensions compatible with every selected metric, in catalog order
///
/// An empty selection leaves every dimension available.
pub fn compatible_dimensions<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    metric_ids: &[S],
) -> Result<Vec<&'a Dimension>, ResolveError> {
    let metrics = selected_metrics(catalog, metric_ids)?;
    Ok(catalog
        .dimensions()
        .iter()
        .filter(|d| metrics.iter().all(|m| m.supports_dimension(&d.id)))
        .collect())
}

/// Granularities supported by every selected metric, finest first
///
/// An empty intersection means the catalog makes this combination
/// unselectable, and is reported as [`ResolveError::EmptyGranularityIntersection`].
pub fn compatible_granularities<S: AsRef<str>>(
    catalog: &Catalog,
    metric_ids: &[S],
) -> Result<Vec<Granularity>, ResolveError> {
    let metrics = selected_metrics(catalog, metric_ids)?;
    let common: Vec<Granularity> = Granularity::ALL
        .into_iter()
        .filter(|g| metrics.iter().all(|m| m.supports_granularity(*g)))
        .collect();

    if common.is_empty() {
        return Err(ResolveError::EmptyGranularityIntersection {
            metrics: metrics.iter().map(|m| m.id.clone()).collect(),
        });
    }
    Ok(common)
}

/// True iff `dim_id` is not compatible with the selection
pub fn is_dimension_disabled<S: AsRef<str>>(
    catalog: &Catalog,
    dim_id: &str,
    metric_ids: &[S],
) -> Result<bool, ResolveError> {
    catalog.dimension(dim_id)?;
    let metrics = selected_metrics(catalog, metric_ids)?;
    Ok(!metrics.iter().all(|m| m.supports_dimension(dim_id)))
}

/// The metrics excluding `dim_id`, or `None` if the dimension is allowed
///
/// Excluding metrics are listed in catalog order so the message is stable for
/// the same selection regardless of click order.
pub fn incompatible_reason<S: AsRef<str>>(
    catalog: &Catalog,
    dim_id: &str,
    metric_ids: &[S],
) -> Result<Option<IncompatibleReason>, ResolveError> {
    let dimension = catalog.dimension(dim_id)?;
    let metrics = selected_metrics(catalog, metric_ids)?;
    Ok(reason_for(dimension, &metrics))
}

fn reason_for(dimension: &Dimension, metrics: &[&Metric]) -> Option<IncompatibleReason> {
    if dimension.id == DATE_DIMENSION {
        return None;
    }
    let excluding: Vec<&Metric> = metrics
        .iter()
        .copied()
        .filter(|m| !m.supports_dimension(&dimension.id))
        .collect();
    if excluding.is_empty() {
        return None;
    }

    let names: Vec<&str> = excluding.iter().map(|m| m.name.as_str()).collect();
    Some(IncompatibleReason {
        dimension: dimension.id.clone(),
        metrics: excluding.iter().map(|m| m.id.clone()).collect(),
        message: format!("指标 {} 不支持按「{}」拆分", names.join("、"), dimension.name),
    })
}

/// Every dimension with its disabled flag and reason, in catalog order
pub fn dimension_availability<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    metric_ids: &[S],
) -> Result<Vec<DimensionStatus<'a>>, ResolveError> {
    let metrics = selected_metrics(catalog, metric_ids)?;
    Ok(catalog
        .dimensions()
        .iter()
        .map(|dimension| {
            let reason = reason_for(dimension, &metrics);
            DimensionStatus {
                dimension,
                disabled: reason.is_some(),
                reason,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn ids(dims: &[&Dimension]) -> Vec<String> {
        dims.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_empty_selection_allows_everything() {
        let catalog = catalog();
        let none: [&str; 0] = [];
        let dims = compatible_dimensions(&catalog, &none).unwrap();
        assert_eq!(dims.len(), catalog.dimensions().len());
        assert_eq!(compatible_granularities(&catalog, &none).unwrap(), Granularity::ALL.to_vec());
    }

    #[test]
    fn test_intersection_narrows_dimensions() {
        let catalog = catalog();
        let dims = compatible_dimensions(&catalog, &["call_qty"]).unwrap();
        assert_eq!(ids(&dims), vec!["dt", "city", "service_type"]);

        let dims = compatible_dimensions(&catalog, &["call_qty", "cancel_rate"]).unwrap();
        assert_eq!(ids(&dims), vec!["dt", "city"]);
    }

    #[test]
    fn test_granularity_intersection() {
        let catalog = catalog();
        let grans = compatible_granularities(&catalog, &["call_qty", "gmv"]).unwrap();
        assert_eq!(grans, vec![Granularity::Day, Granularity::Week, Granularity::Month]);
    }

    #[test]
    fn test_disabled_and_reason() {
        let catalog = catalog();
        let selection = ["gmv", "call_qty", "cancel_rate"];
        assert!(is_dimension_disabled(&catalog, "service_type", &selection).unwrap());
        assert!(!is_dimension_disabled(&catalog, "city", &selection).unwrap());
        assert!(!is_dimension_disabled(&catalog, "dt", &selection).unwrap());

        let reason = incompatible_reason(&catalog, "service_type", &selection)
            .unwrap()
            .unwrap();
        // Catalog order, not selection order
        assert_eq!(reason.metrics, vec!["cancel_rate", "gmv"]);
        assert!(reason.message.contains("取消率"));
        assert!(reason.message.contains("业务线"));

        assert!(incompatible_reason(&catalog, "city", &selection).unwrap().is_none());
    }

    #[test]
    fn test_reason_is_independent_of_selection_order() {
        let catalog = catalog();
        let a = incompatible_reason(&catalog, "service_type", &["gmv", "cancel_rate"]).unwrap();
        let b = incompatible_reason(&catalog, "service_type", &["cancel_rate", "gmv"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let catalog = catalog();
        assert_eq!(
            compatible_dimensions(&catalog, &["nope"]).unwrap_err(),
            ResolveError::Catalog(CatalogError::MetricNotFound("nope".to_string()))
        );
        assert_eq!(
            is_dimension_disabled(&catalog, "nope", &["call_qty"]).unwrap_err(),
            ResolveError::Catalog(CatalogError::DimensionNotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_dimension_availability() {
        let catalog = catalog();
        let statuses = dimension_availability(&catalog, &["cancel_rate"]).unwrap();
        let disabled: Vec<&str> = statuses
            .iter()
            .filter(|s| s.disabled)
            .map(|s| s.dimension.id.as_str())
            .collect();
        assert_eq!(disabled, vec!["service_type"]);
        assert!(statuses.iter().all(|s| s.disabled == s.reason.is_some()));
    }
}
