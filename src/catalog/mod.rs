//! Metric and dimension catalog (nouns)
//!
//! These types represent the static schema the query layer works against.

mod dimension;
mod edit;
mod error;
mod metric;
mod schema;
mod types;

pub use dimension::Dimension;
pub use edit::CatalogEditor;
pub use error::CatalogError;
pub use metric::{Metric, Ratio, Label, DATE_DIMENSION};
pub use schema::{Catalog, CatalogDef, DimensionGroup, MetricGroup};
pub use types::{Aggregation, Granularity, ParseAggregationError, ParseGranularityError};
