//! Compatibility resolver (verb module)
//!
//! Catalog + metric selection → legal dimensions and granularities, and
//! Catalog + QuerySpec → ValidatedQuery.

mod compat;
mod error;
mod types;
mod validate;

pub use compat::{
    compatible_dimensions,
    compatible_granularities,
    dimension_availability,
    incompatible_reason,
    is_dimension_disabled,
};
pub use error::ResolveError;
pub use types::{DimensionStatus, IncompatibleReason, ValidatedQuery};
pub use validate::validate_query;
