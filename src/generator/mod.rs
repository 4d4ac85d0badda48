//! Synthetic series generator (verb module)
//!
//! GeneratorConfig + start date + day count + Rng → hourly SeriesRows for
//! every city and service type combination.
//!
//! Randomness is injected: pass a seeded `StdRng` for reproducible output.

mod config;
mod error;
mod funnel;
mod generate;
mod row;

pub use config::{
    Bounds,
    FunnelRates,
    GeneratorConfig,
    HourBand,
    WeightedValue,
    CITY_DIMENSION,
    SERVICE_TYPE_DIMENSION,
};
pub use error::GenerateError;
pub use funnel::{
    format_rate,
    round_to,
    FunnelCounts,
    RateDefinition,
    FUNNEL_STAGES,
    RATES,
    CALL_QTY,
    RESP_QTY,
    PICKUP_QTY,
    BOARD_QTY,
    DEPART_QTY,
    COMP_QTY,
    PAY_QTY,
    CANCEL_QTY,
    GMV,
};
pub use generate::{generate, generate_range};
pub(crate) use generate::count_of;
pub use row::{Delta, MetricValue, SeriesRow};
