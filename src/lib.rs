//! funnelscope - Query core for a ride-hailing order funnel dashboard
//!
//! This library provides:
//! - Metric and dimension catalog types, with an embedded default catalog
//! - Catalog parsing from YAML
//! - Metric/dimension/granularity compatibility resolution
//! - Comparison period derivation (dod, wow, mom, yoy)
//! - Dimension filters
//! - Synthetic hourly series generation
//! - End-to-end query evaluation (filter, rollup, projection)
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `catalog/` - Metric, Dimension, Catalog, CatalogEditor
//! - `query/` - query request types (QuerySpec, Filter, FilterSet)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Catalog, YAML → GeneratorConfig
//! - `resolver/` - Catalog + metric selection → compatible dimensions and granularities
//! - `period/` - DateRange + ComparisonMode → comparison DateRange
//! - `generator/` - GeneratorConfig + dates + Rng → SeriesRows
//! - `evaluator/` - Catalog + QuerySpec → QueryResult
//!
//! # Example
//!
//! ```ignore
//! use funnelscope::{evaluate_query, Catalog, ComparisonMode, DateRange, GeneratorConfig, QuerySpec};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let catalog = Catalog::builtin()?;
//! let range = DateRange::parse("2024-03-10", "2024-03-16")?;
//! let spec = QuerySpec::new(["call_qty", "resp_rate"], range)
//!     .with_dimensions(["city"])
//!     .compare_with(ComparisonMode::Wow);
//! let mut rng = StdRng::seed_from_u64(7);
//! let result = evaluate_query(&catalog, &GeneratorConfig::default(), &spec, &mut rng)?;
//! ```

pub mod catalog;
pub mod query;
pub mod resolver;
pub mod period;
pub mod generator;
pub mod evaluator;
pub mod parser;
pub mod error;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEditor, CatalogError, Metric, Dimension, Aggregation, Granularity, DATE_DIMENSION};
pub use query::{QuerySpec, Filter, FilterOperator, FilterSet, FilterError, DimensionValues};
pub use resolver::{compatible_dimensions, compatible_granularities, dimension_availability, validate_query, ResolveError, ValidatedQuery};
pub use period::{comparison_range, ComparisonMode, DateRange, PeriodError};
pub use generator::{generate, generate_range, GeneratorConfig, GenerateError, SeriesRow, MetricValue};
pub use evaluator::{evaluate_query, QueryResult, QueryError};
pub use error::ParseError;
