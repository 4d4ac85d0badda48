//! Query spec validation
//!
//! Turns a [`QuerySpec`] of string ids into a [`ValidatedQuery`] of catalog
//! references, rejecting specs the generator and evaluator must never see.

use crate::catalog::{Catalog, Dimension, Metric};
use crate::query::{FilterSet, QuerySpec};
use super::compat::{compatible_granularities, incompatible_reason};
use super::error::ResolveError;
use super::types::ValidatedQuery;

/// Validate a query spec against the catalog
///
/// Checks, in order: metric selection non-empty and known, dimensions known and
/// compatible, granularity shared by every metric, comparison mode present when
/// comparison is enabled, filters valid.
pub fn validate_query<'a>(
    catalog: &'a Catalog,
    spec: &QuerySpec,
) -> Result<ValidatedQuery<'a>, ResolveError> {
    if spec.metrics.is_empty() {
        return Err(ResolveError::EmptyMetricSelection);
    }

    let metrics = resolve_metrics(catalog, &spec.metrics)?;
    let dimensions = resolve_dimensions(catalog, spec)?;

    let allowed = compatible_granularities(catalog, &spec.metrics)?;
    if !allowed.contains(&spec.granularity) {
        return Err(ResolveError::UnsupportedGranularity {
            granularity: spec.granularity,
            allowed,
        });
    }

    let comparison = if spec.compare {
        let mode = spec.comparison_mode.ok_or(ResolveError::MissingComparisonMode)?;
        Some((mode, spec.range.comparison(mode)?))
    } else {
        None
    };

    let filters = spec
        .filters
        .iter()
        .map(|f| f.revalidate(catalog))
        .collect::<Result<FilterSet, _>>()?;

    tracing::debug!(
        metrics = metrics.len(),
        dimensions = dimensions.len(),
        granularity = %spec.granularity,
        filters = filters.len(),
        "query validated"
    );

    Ok(ValidatedQuery {
        metrics,
        dimensions,
        granularity: spec.granularity,
        range: spec.range,
        comparison,
        filters,
    })
}

fn resolve_metrics<'a>(catalog: &'a Catalog, ids: &[String]) -> Result<Vec<&'a Metric>, ResolveError> {
    let mut metrics: Vec<&Metric> = Vec::with_capacity(ids.len());
    for id in ids {
        let metric = catalog.metric(id)?;
        if !metrics.iter().any(|m| m.id == metric.id) {
            metrics.push(metric);
        }
    }
    Ok(metrics)
}

fn resolve_dimensions<'a>(
    catalog: &'a Catalog,
    spec: &QuerySpec,
) -> Result<Vec<&'a Dimension>, ResolveError> {
    let mut dimensions: Vec<&Dimension> = Vec::with_capacity(spec.dimensions.len());
    for id in &spec.dimensions {
        let dimension = catalog.dimension(id)?;
        if let Some(reason) = incompatible_reason(catalog, id, &spec.metrics)? {
            return Err(ResolveError::IncompatibleDimension {
                dimension: reason.dimension,
                metrics: reason.metrics,
            });
        }
        if !dimensions.iter().any(|d| d.id == dimension.id) {
            dimensions.push(dimension);
        }
    }
    Ok(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Granularity;
    use crate::period::{ComparisonMode, DateRange};
    use crate::query::{Filter, FilterOperator};

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn range() -> DateRange {
        DateRange::parse("2024-03-10", "2024-03-12").unwrap()
    }

    #[test]
    fn test_validate_simple_query() {
        let catalog = catalog();
        let spec = QuerySpec::new(["call_qty", "resp_rate", "call_qty"], range())
            .with_dimensions(["city"])
            .with_granularity(Granularity::Hour)
            .compare_with(ComparisonMode::Dod);

        let validated = validate_query(&catalog, &spec).unwrap();
        assert_eq!(validated.metric_ids(), vec!["call_qty", "resp_rate"]);
        assert_eq!(validated.dimension_ids(), vec!["city"]);
        assert_eq!(
            validated.comparison_range(),
            Some(DateRange::parse("2024-03-07", "2024-03-09").unwrap())
        );
    }

    #[test]
    fn test_empty_metric_selection() {
        let catalog = catalog();
        let spec = QuerySpec::new(Vec::<String>::new(), range());
        assert_eq!(validate_query(&catalog, &spec).unwrap_err(), ResolveError::EmptyMetricSelection);
    }

    #[test]
    fn test_incompatible_dimension() {
        let catalog = catalog();
        let spec = QuerySpec::new(["gmv"], range()).with_dimensions(["service_type"]);
        match validate_query(&catalog, &spec).unwrap_err() {
            ResolveError::IncompatibleDimension { dimension, metrics } => {
                assert_eq!(dimension, "service_type");
                assert_eq!(metrics, vec!["gmv"]);
            }
            other => panic!("Expected IncompatibleDimension error, got: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_granularity() {
        let catalog = catalog();
        let spec = QuerySpec::new(["gmv"], range()).with_granularity(Granularity::Hour);
        assert!(matches!(
            validate_query(&catalog, &spec),
            Err(ResolveError::UnsupportedGranularity { granularity: Granularity::Hour, .. })
        ));
    }

    #[test]
    fn test_missing_comparison_mode() {
        let catalog = catalog();
        let mut spec = QuerySpec::new(["call_qty"], range());
        spec.compare = true;
        assert_eq!(validate_query(&catalog, &spec).unwrap_err(), ResolveError::MissingComparisonMode);
    }

    #[test]
    fn test_filters_are_revalidated() {
        let catalog = catalog();
        let raw: Filter =
            serde_json::from_str(r#"{"dimId":"city","operator":"IN","values":["上海市"]}"#).unwrap();
        let spec = QuerySpec::new(["call_qty"], range()).with_filters([raw].into_iter().collect());
        assert!(matches!(validate_query(&catalog, &spec), Err(ResolveError::Filter(_))));

        let ok = Filter::new(&catalog, "city", FilterOperator::NotIn, ["宿迁市"]).unwrap();
        let spec = QuerySpec::new(["call_qty"], range()).with_filters([ok].into_iter().collect());
        assert_eq!(validate_query(&catalog, &spec).unwrap().filters.len(), 1);
    }
}
