use crate::catalog::{CatalogError, Granularity};
use crate::period::PeriodError;
use crate::query::FilterError;

/// Errors that can occur during compatibility resolution and query validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Unknown metric or dimension id
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Query must select at least one metric")]
    EmptyMetricSelection,
    /// The selected metrics share no granularity; a catalog defect
    #[error("Metrics [{}] have no granularity in common", .metrics.join(", "))]
    EmptyGranularityIntersection { metrics: Vec<String> },
    #[error("Dimension '{dimension}' is not compatible with metrics [{}]", .metrics.join(", "))]
    IncompatibleDimension { dimension: String, metrics: Vec<String> },
    #[error("Granularity '{granularity}' is not supported by the selected metrics")]
    UnsupportedGranularity { granularity: Granularity, allowed: Vec<Granularity> },
    #[error("Comparison is enabled but no comparison mode is set")]
    MissingComparisonMode,
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}
