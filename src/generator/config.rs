//! Volume and shape configuration for the synthetic generator
//!
//! All fields have defaults, so a YAML override only needs the keys it changes.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use super::error::GenerateError;

/// Dimension id carrying the city value on generated rows
pub const CITY_DIMENSION: &str = "city";
/// Dimension id carrying the service type value on generated rows
pub const SERVICE_TYPE_DIMENSION: &str = "service_type";

/// Fixed shape of the synthetic dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Expected calls per hour for one city and service type at weight 1.0
    pub base_volume: f64,
    /// Relative random jitter applied after the weights (0.2 means ±20%)
    pub jitter: f64,
    /// Hour bands with a non-baseline weight; unlisted hours weigh 1.0
    pub hour_weights: Vec<HourBand>,
    pub cities: Vec<WeightedValue>,
    pub service_types: Vec<WeightedValue>,
    pub funnel: FunnelRates,
    /// Fare per paid order, in yuan
    pub fare: Bounds,
    /// Half-width of the `_mom`/`_yoy` delta draws, in percent
    pub delta_span: f64,
}

/// Inclusive range of hours sharing a weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourBand {
    pub from: u8,
    pub to: u8,
    pub weight: f64,
}

/// A categorical value with its baseline multiplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedValue {
    pub value: String,
    pub weight: f64,
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Conversion bounds between consecutive funnel stages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelRates {
    /// call → respond
    pub respond: Bounds,
    /// respond → pickup
    pub pickup: Bounds,
    /// pickup → board
    pub board: Bounds,
    /// board → depart
    pub depart: Bounds,
    /// depart → complete
    pub complete: Bounds,
    /// complete → pay
    pub pay: Bounds,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }
}

impl WeightedValue {
    pub fn new(value: &str, weight: f64) -> Self {
        WeightedValue { value: value.to_string(), weight }
    }
}

impl Default for FunnelRates {
    fn default() -> Self {
        FunnelRates {
            respond: Bounds::new(0.80, 0.95),
            pickup: Bounds::new(0.90, 0.98),
            board: Bounds::new(0.92, 0.99),
            depart: Bounds::new(0.97, 1.00),
            complete: Bounds::new(0.95, 0.99),
            pay: Bounds::new(0.90, 0.99),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            base_volume: 120.0,
            jitter: 0.2,
            hour_weights: vec![
                HourBand { from: 0, to: 5, weight: 0.2 },
                HourBand { from: 7, to: 9, weight: 1.5 },
                HourBand { from: 17, to: 19, weight: 1.8 },
                HourBand { from: 22, to: 23, weight: 0.4 },
            ],
            cities: vec![
                WeightedValue::new("北京市", 1.5),
                WeightedValue::new("南京市", 1.0),
                WeightedValue::new("宿迁市", 0.5),
            ],
            service_types: vec![
                WeightedValue::new("快车", 1.0),
                WeightedValue::new("专车", 0.4),
                WeightedValue::new("拼车", 0.6),
            ],
            funnel: FunnelRates::default(),
            fare: Bounds::new(18.0, 45.0),
            delta_span: 15.0,
        }
    }
}

impl FunnelRates {
    /// Stage bounds in funnel order, with the stage name for errors
    pub fn stages(&self) -> [(&'static str, Bounds); 6] {
        [
            ("respond", self.respond),
            ("pickup", self.pickup),
            ("board", self.board),
            ("depart", self.depart),
            ("complete", self.complete),
            ("pay", self.pay),
        ]
    }
}

impl GeneratorConfig {
    /// Weight of each hour of the day; later bands override earlier ones
    pub fn hourly_weights(&self) -> [f64; 24] {
        let mut weights = [1.0; 24];
        for band in &self.hour_weights {
            for hour in band.from..=band.to.min(23) {
                weights[hour as usize] = band.weight;
            }
        }
        weights
    }

    /// Rows produced per generated day
    pub fn rows_per_day(&self) -> usize {
        24 * self.cities.len() * self.service_types.len()
    }

    /// Check the configuration can drive the generator
    pub fn validate(&self) -> Result<(), GenerateError> {
        check_weight("base_volume", self.base_volume)?;
        check_weight("delta_span", self.delta_span)?;
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(GenerateError::InvalidWeight {
                name: "jitter".to_string(),
                weight: self.jitter,
            });
        }

        for band in &self.hour_weights {
            if band.from > band.to || band.to > 23 {
                return Err(GenerateError::InvalidHourBand { from: band.from, to: band.to });
            }
            check_weight("hour band", band.weight)?;
        }

        for (name, values) in [
            (CITY_DIMENSION, &self.cities),
            (SERVICE_TYPE_DIMENSION, &self.service_types),
        ] {
            if values.is_empty() {
                return Err(GenerateError::EmptyValueSet(name));
            }
            let mut seen = HashSet::new();
            for v in values {
                if !seen.insert(v.value.as_str()) {
                    return Err(GenerateError::DuplicateValue {
                        dimension: name,
                        value: v.value.clone(),
                    });
                }
                check_weight(&v.value, v.weight)?;
            }
        }

        for (stage, bounds) in self.funnel.stages() {
            if !(0.0 <= bounds.min && bounds.min <= bounds.max && bounds.max <= 1.0) {
                return Err(GenerateError::InvalidBounds {
                    name: stage.to_string(),
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        if !(self.fare.min >= 0.0 && self.fare.min <= self.fare.max && self.fare.max.is_finite()) {
            return Err(GenerateError::InvalidBounds {
                name: "fare".to_string(),
                min: self.fare.min,
                max: self.fare.max,
            });
        }
        Ok(())
    }
}

fn check_weight(name: &str, weight: f64) -> Result<(), GenerateError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(GenerateError::InvalidWeight {
            name: name.to_string(),
            weight,
        })
    }
}
