//! Generator error types

/// Invalid generator input; generation itself cannot fail otherwise
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("Day count must not be negative, got {0}")]
    NegativeDays(i64),
    #[error("No values configured for '{0}'")]
    EmptyValueSet(&'static str),
    #[error("Duplicate value '{value}' for '{dimension}'")]
    DuplicateValue { dimension: &'static str, value: String },
    #[error("Invalid weight {weight} for '{name}'")]
    InvalidWeight { name: String, weight: f64 },
    #[error("Invalid bounds [{min}, {max}] for '{name}'")]
    InvalidBounds { name: String, min: f64, max: f64 },
    #[error("Invalid hour band {from}..={to}")]
    InvalidHourBand { from: u8, to: u8 },
    #[error("Date range overflows the calendar")]
    DateOverflow,
}
