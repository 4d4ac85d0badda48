//! Evaluator error types

use crate::catalog::CatalogError;
use crate::generator::GenerateError;
use crate::period::PeriodError;
use crate::resolver::ResolveError;

/// Errors that can occur while evaluating a query spec end to end
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid query: {0}")]
    Resolve(#[from] ResolveError),
    #[error("Generation failed: {0}")]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
