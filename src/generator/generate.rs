//! Synthetic series generation
//!
//! Produces one row per (day, hour, city, service type), in that nesting
//! order. Volume per row is
//!
//! ```text
//! base_volume × hour_weight × city_weight × service_weight × (1 ± jitter)
//! ```
//!
//! and every downstream stage is drawn as a conversion of the stage before it,
//! so funnel ordering and rate derivation hold for any random draw.

use std::collections::BTreeMap;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use crate::period::DateRange;
use super::config::{GeneratorConfig, CITY_DIMENSION, SERVICE_TYPE_DIMENSION};
use super::error::GenerateError;
use super::funnel::{format_rate, round_to, FunnelCounts, CANCEL_QTY, GMV, RATES};
use super::row::{Delta, MetricValue, SeriesRow};

/// Generate `days` days of hourly rows starting at `start`
///
/// Zero days yields no rows; negative days are rejected, as is a span whose
/// last day falls outside the representable calendar.
pub fn generate(
    config: &GeneratorConfig,
    start: NaiveDate,
    days: i64,
    rng: &mut impl Rng,
) -> Result<Vec<SeriesRow>, GenerateError> {
    if days < 0 {
        return Err(GenerateError::NegativeDays(days));
    }
    config.validate()?;

    if days > 0 {
        Duration::try_days(days - 1)
            .and_then(|span| start.checked_add_signed(span))
            .ok_or(GenerateError::DateOverflow)?;
    }

    let hourly = config.hourly_weights();
    let mut rows = Vec::new();

    for offset in 0..days {
        let date = start
            .checked_add_signed(Duration::days(offset))
            .ok_or(GenerateError::DateOverflow)?;
        for (hour, hour_weight) in hourly.iter().enumerate() {
            for city in &config.cities {
                for service in &config.service_types {
                    let weight = hour_weight * city.weight * service.weight;
                    let jitter = 1.0 + rng.gen_range(-config.jitter..=config.jitter);
                    let call = (config.base_volume * weight * jitter).round().max(0.0) as u64;
                    let counts = FunnelCounts::draw(call, &config.funnel, rng);

                    let dimensions = BTreeMap::from([
                        (CITY_DIMENSION.to_string(), city.value.clone()),
                        (SERVICE_TYPE_DIMENSION.to_string(), service.value.clone()),
                    ]);
                    rows.push(build_row(config, date, hour as u8, dimensions, &counts, rng));
                }
            }
        }
    }

    tracing::debug!(%start, days, rows = rows.len(), "generated synthetic series");
    Ok(rows)
}

/// Generate hourly rows covering every day of `range`
pub fn generate_range(
    config: &GeneratorConfig,
    range: &DateRange,
    rng: &mut impl Rng,
) -> Result<Vec<SeriesRow>, GenerateError> {
    generate(config, range.start(), range.days(), rng)
}

fn build_row(
    config: &GeneratorConfig,
    date: NaiveDate,
    hour: u8,
    dimensions: BTreeMap<String, String>,
    counts: &FunnelCounts,
    rng: &mut impl Rng,
) -> SeriesRow {
    let mut values = BTreeMap::new();
    for (id, n) in counts.stages() {
        values.insert(id.to_string(), MetricValue::Count(n));
    }
    values.insert(CANCEL_QTY.to_string(), MetricValue::Count(counts.cancel()));

    let fare = rng.gen_range(config.fare.min..=config.fare.max);
    values.insert(GMV.to_string(), MetricValue::Amount(round_to(counts.pay as f64 * fare, 2)));

    for rate in RATES {
        let numerator = count_of(&values, rate.numerator);
        let denominator = count_of(&values, rate.denominator);
        values.insert(rate.id.to_string(), MetricValue::Rate(format_rate(numerator, denominator)));
    }

    let span = config.delta_span;
    let deltas = values
        .keys()
        .map(|id| {
            let delta = Delta {
                mom: round_to(rng.gen_range(-span..=span), 1),
                yoy: round_to(rng.gen_range(-span..=span), 1),
            };
            (id.clone(), delta)
        })
        .collect();

    SeriesRow {
        date,
        hour: Some(hour),
        dimensions,
        values,
        deltas,
    }
}

pub(crate) fn count_of(values: &BTreeMap<String, MetricValue>, id: &str) -> u64 {
    match values.get(id) {
        Some(MetricValue::Count(n)) => *n,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_row_count_covers_every_combination() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let rows = generate(&config, start(), 2, &mut rng).unwrap();
        assert_eq!(rows.len(), 2 * 24 * 3 * 3);

        assert_eq!(rows[0].date, start());
        assert_eq!(rows[0].hour, Some(0));
        assert_eq!(rows.last().unwrap().hour, Some(23));
        assert_eq!(rows.last().unwrap().date, start() + Duration::days(1));
    }

    #[test]
    fn test_zero_and_negative_days() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate(&config, start(), 0, &mut rng).unwrap().is_empty());
        assert_eq!(
            generate(&config, start(), -1, &mut rng).unwrap_err(),
            GenerateError::NegativeDays(-1)
        );
    }

    #[test]
    fn test_span_past_calendar_end_is_rejected() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for days in [1_000_000_000, i64::MAX] {
            assert_eq!(
                generate(&config, start(), days, &mut rng).unwrap_err(),
                GenerateError::DateOverflow
            );
        }
        let last = NaiveDate::MAX;
        assert_eq!(generate(&config, last, 1, &mut rng).unwrap().len(), config.rows_per_day());
        assert_eq!(
            generate(&config, last, 2, &mut rng).unwrap_err(),
            GenerateError::DateOverflow
        );
    }

    #[test]
    fn test_zero_volume_rates() {
        let config = GeneratorConfig {
            base_volume: 0.0,
            ..GeneratorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let rows = generate(&config, start(), 1, &mut rng).unwrap();
        for row in &rows {
            assert_eq!(row.count("call_qty"), Some(0));
            for rate in RATES {
                assert_eq!(row.rate(rate.id), Some("0.0"));
            }
            assert_eq!(row.amount("gmv"), Some(0.0));
        }
    }

    #[test]
    fn test_every_metric_has_deltas() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let rows = generate(&config, start(), 1, &mut rng).unwrap();
        let span = config.delta_span;
        for row in &rows {
            assert_eq!(row.deltas.len(), row.values.len());
            for delta in row.deltas.values() {
                assert!(delta.mom.abs() <= span && delta.yoy.abs() <= span);
            }
        }
    }

    #[test]
    fn test_without_jitter_volume_follows_weights() {
        let config = GeneratorConfig {
            jitter: 0.0,
            base_volume: 100.0,
            ..GeneratorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let rows = generate(&config, start(), 1, &mut rng).unwrap();
        let call = |hour: u8, city: &str, service: &str| {
            rows.iter()
                .find(|r| {
                    r.hour == Some(hour)
                        && r.dimensions["city"] == city
                        && r.dimensions["service_type"] == service
                })
                .and_then(|r| r.count("call_qty"))
                .unwrap()
        };
        // 100 × 1.0 × 1.0 × 1.0
        assert_eq!(call(12, "南京市", "快车"), 100);
        // 100 × 0.2 (night) × 1.5 (北京市)
        assert_eq!(call(3, "北京市", "快车"), 30);
        // 100 × 1.8 (evening peak) × 0.5 (宿迁市)
        assert_eq!(call(18, "宿迁市", "快车"), 90);
        // 100 × 1.5 (morning peak) × 1.0 × 0.4 (专车)
        assert_eq!(call(8, "南京市", "专车"), 60);
    }
}
