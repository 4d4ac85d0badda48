//! Query evaluator (verb module)
//!
//! Catalog + GeneratorConfig + QuerySpec → QueryResult: validate, derive the
//! comparison range, generate, filter, roll up and project.

mod error;
mod evaluate;
mod rollup;

pub use error::QueryError;
pub use evaluate::{evaluate_query, ComparisonSeries, QueryResult};
pub use rollup::{bucket_start, rollup};
