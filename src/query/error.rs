//! Filter error types

/// Reasons a filter is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid filter: dimension '{0}' not found")]
    UnknownDimension(String),
    #[error("Invalid filter: dimension '{0}' is not enumerable")]
    NotEnumerable(String),
    #[error("Invalid filter: no values given for dimension '{0}'")]
    EmptyValues(String),
    #[error("Invalid filter: '{value}' is not a value of dimension '{dimension}'")]
    InvalidValue { dimension: String, value: String },
    #[error("Unknown filter operator '{0}'. Valid options: IN, NOT_IN")]
    UnknownOperator(String),
}
