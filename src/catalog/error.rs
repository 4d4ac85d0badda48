//! Catalog error types

/// Errors from catalog lookups and catalog validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A metric id was referenced that is not in the catalog
    #[error("Metric '{0}' not found")]
    MetricNotFound(String),
    /// A dimension id was referenced that is not in the catalog
    #[error("Dimension '{0}' not found")]
    DimensionNotFound(String),
    #[error("Duplicate metric id '{0}'")]
    DuplicateMetric(String),
    #[error("Duplicate dimension id '{0}'")]
    DuplicateDimension(String),
    #[error("Metric '{metric}' declares no compatible {kind}")]
    EmptyCompatibility { metric: String, kind: &'static str },
    #[error("Metric '{metric}' references unknown dimension '{dimension}'")]
    UnknownCompatibleDimension { metric: String, dimension: String },
    #[error("Enumerable dimension '{0}' has no values")]
    EmptyEnumValues(String),
    #[error("Dimension '{dimension}' lists value '{value}' more than once")]
    DuplicateEnumValue { dimension: String, value: String },
    #[error("Dimension '{0}' must not be enumerable")]
    EnumerableDateDimension(String),
    #[error("Catalog has no '{0}' dimension")]
    MissingDateDimension(String),
    #[error("Calculated metric '{0}' has no ratio definition")]
    MissingRatio(String),
    #[error("Metric '{metric}' ratio references unknown metric '{reference}'")]
    UnknownRatioMetric { metric: String, reference: String },
}
