//! End-to-end query evaluation

use rand::Rng;
use serde::Serialize;
use crate::catalog::{Catalog, Granularity};
use crate::generator::{generate_range, GeneratorConfig, SeriesRow};
use crate::period::{ComparisonMode, DateRange};
use crate::query::QuerySpec;
use crate::resolver::{validate_query, ValidatedQuery};
use super::error::QueryError;
use super::rollup::rollup;

/// Series for the primary range, plus the comparison range when requested
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub metrics: Vec<String>,
    pub dimensions: Vec<String>,
    pub granularity: Granularity,
    pub range: DateRange,
    pub rows: Vec<SeriesRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSeries>,
}

/// Baseline series for a comparison mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub mode: ComparisonMode,
    pub label: &'static str,
    pub range: DateRange,
    pub rows: Vec<SeriesRow>,
}

/// Validate a query spec, generate its data and shape it for display
///
/// The primary range is generated first, then the comparison range, both from
/// the same `rng`; a seeded rng makes the whole result reproducible.
pub fn evaluate_query(
    catalog: &Catalog,
    config: &GeneratorConfig,
    spec: &QuerySpec,
    rng: &mut impl Rng,
) -> Result<QueryResult, QueryError> {
    let query = validate_query(catalog, spec)?;

    let rows = series(config, &query, &query.range, rng)?;
    let comparison = match query.comparison {
        Some((mode, range)) => Some(ComparisonSeries {
            mode,
            label: mode.label(),
            range,
            rows: series(config, &query, &range, rng)?,
        }),
        None => None,
    };

    tracing::debug!(
        rows = rows.len(),
        comparison_rows = comparison.as_ref().map(|c| c.rows.len()).unwrap_or(0),
        "query evaluated"
    );

    Ok(QueryResult {
        metrics: query.metric_ids().into_iter().map(String::from).collect(),
        dimensions: query.dimension_ids().into_iter().map(String::from).collect(),
        granularity: query.granularity,
        range: query.range,
        rows,
        comparison,
    })
}

fn series(
    config: &GeneratorConfig,
    query: &ValidatedQuery<'_>,
    range: &DateRange,
    rng: &mut impl Rng,
) -> Result<Vec<SeriesRow>, QueryError> {
    let generated = generate_range(config, range, rng)?;
    let filtered = query.filters.apply(generated);
    let mut rows = rollup(&filtered, query.granularity, &query.dimension_ids());
    project(&mut rows, &query.metric_ids());
    Ok(rows)
}

/// Keep only the selected metrics' values and deltas
fn project(rows: &mut [SeriesRow], metrics: &[&str]) {
    for row in rows {
        row.values.retain(|id, _| metrics.contains(&id.as_str()));
        row.deltas.retain(|id, _| metrics.contains(&id.as_str()));
    }
}
