//! Query request types (nouns)
//!
//! A [`QuerySpec`] is what the dashboard asks for; filters narrow the rows it
//! sees.

mod error;
mod filter;
mod request;

pub use error::FilterError;
pub use filter::{DimensionValues, Filter, FilterOperator, FilterSet};
pub use request::QuerySpec;
