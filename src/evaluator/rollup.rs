//! Rollup of hourly rows to a coarser grain
//!
//! Rows sharing a time bucket and the same values for the kept dimensions are
//! merged. Counts and amounts are summed, rates are recomputed from the summed
//! numerator and denominator, and deltas are averaged.

use std::collections::{BTreeMap, BTreeSet};
use chrono::NaiveDate;
use crate::catalog::Granularity;
use crate::generator::{count_of, format_rate, round_to, Delta, MetricValue, SeriesRow, RATES};
use crate::period::calendar::{month_start, week_start};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BucketKey {
    date: NaiveDate,
    hour: Option<u8>,
    dimensions: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct Bucket {
    counts: BTreeMap<String, u64>,
    amounts: BTreeMap<String, f64>,
    rates: BTreeSet<String>,
    deltas: BTreeMap<String, (f64, f64, u32)>,
}

/// First day of the bucket `date` falls into
pub fn bucket_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Hour | Granularity::Day => date,
        Granularity::Week => week_start(date),
        Granularity::Month => month_start(date),
    }
}

/// Merge rows into one row per time bucket and kept-dimension combination
///
/// Dimensions not listed in `dimensions` are dropped from the output rows.
/// Output is ordered by bucket date, hour, then dimension values.
pub fn rollup(rows: &[SeriesRow], granularity: Granularity, dimensions: &[&str]) -> Vec<SeriesRow> {
    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();

    for row in rows {
        let key = BucketKey {
            date: bucket_start(row.date, granularity),
            hour: if granularity == Granularity::Hour { row.hour } else { None },
            dimensions: dimensions
                .iter()
                .filter_map(|d| row.dimensions.get(*d).map(|v| (d.to_string(), v.clone())))
                .collect(),
        };
        let bucket = buckets.entry(key).or_default();

        for (id, value) in &row.values {
            match value {
                MetricValue::Count(n) => *bucket.counts.entry(id.clone()).or_insert(0) += n,
                MetricValue::Amount(a) => *bucket.amounts.entry(id.clone()).or_insert(0.0) += a,
                MetricValue::Rate(_) => {
                    bucket.rates.insert(id.clone());
                }
            }
        }
        for (id, delta) in &row.deltas {
            let acc = bucket.deltas.entry(id.clone()).or_insert((0.0, 0.0, 0));
            acc.0 += delta.mom;
            acc.1 += delta.yoy;
            acc.2 += 1;
        }
    }

    let merged: Vec<SeriesRow> = buckets.into_iter().map(|(key, bucket)| finish(key, bucket)).collect();
    tracing::debug!(
        input = rows.len(),
        output = merged.len(),
        %granularity,
        "rolled up series"
    );
    merged
}

fn finish(key: BucketKey, bucket: Bucket) -> SeriesRow {
    let mut values: BTreeMap<String, MetricValue> = bucket
        .counts
        .into_iter()
        .map(|(id, n)| (id, MetricValue::Count(n)))
        .collect();
    for (id, total) in bucket.amounts {
        values.insert(id, MetricValue::Amount(round_to(total, 2)));
    }

    let mut rates = BTreeMap::new();
    for rate in RATES.iter().filter(|r| bucket.rates.contains(r.id)) {
        let numerator = count_of(&values, rate.numerator);
        let denominator = count_of(&values, rate.denominator);
        rates.insert(rate.id.to_string(), MetricValue::Rate(format_rate(numerator, denominator)));
    }
    values.extend(rates);

    let deltas = bucket
        .deltas
        .into_iter()
        .map(|(id, (mom, yoy, n))| {
            let n = f64::from(n.max(1));
            (id, Delta { mom: round_to(mom / n, 1), yoy: round_to(yoy / n, 1) })
        })
        .collect();

    SeriesRow {
        date: key.date,
        hour: key.hour,
        dimensions: key.dimensions.into_iter().collect(),
        values,
        deltas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, hour: u8, city: &str, call: u64, resp: u64, gmv: f64, mom: f64) -> SeriesRow {
        SeriesRow {
            date: date.parse().unwrap(),
            hour: Some(hour),
            dimensions: BTreeMap::from([
                ("city".to_string(), city.to_string()),
                ("service_type".to_string(), "快车".to_string()),
            ]),
            values: BTreeMap::from([
                ("call_qty".to_string(), MetricValue::Count(call)),
                ("resp_qty".to_string(), MetricValue::Count(resp)),
                ("resp_rate".to_string(), MetricValue::Rate(format_rate(resp, call))),
                ("gmv".to_string(), MetricValue::Amount(gmv)),
            ]),
            deltas: BTreeMap::from([("call_qty".to_string(), Delta { mom, yoy: 0.0 })]),
        }
    }

    #[test]
    fn test_bucket_start() {
        let date: NaiveDate = "2024-03-14".parse().unwrap();
        assert_eq!(bucket_start(date, Granularity::Day), date);
        assert_eq!(bucket_start(date, Granularity::Week).to_string(), "2024-03-11");
        assert_eq!(bucket_start(date, Granularity::Month).to_string(), "2024-03-01");
    }

    #[test]
    fn test_rollup_day_recomputes_rates() {
        let rows = vec![
            row("2024-03-10", 8, "北京市", 10, 9, 100.25, 2.0),
            row("2024-03-10", 9, "北京市", 30, 20, 50.5, 5.0),
        ];
        let merged = rollup(&rows, Granularity::Day, &[]);
        assert_eq!(merged.len(), 1);

        let day = &merged[0];
        assert_eq!(day.hour, None);
        assert!(day.dimensions.is_empty());
        assert_eq!(day.count("call_qty"), Some(40));
        assert_eq!(day.count("resp_qty"), Some(29));
        // 29 / 40, not the mean of 90.0 and 66.7
        assert_eq!(day.rate("resp_rate"), Some("72.5"));
        assert_eq!(day.amount("gmv"), Some(150.75));
        assert_eq!(day.delta("call_qty").unwrap().mom, 3.5);
    }

    #[test]
    fn test_rollup_keeps_selected_dimensions() {
        let rows = vec![
            row("2024-03-10", 8, "北京市", 10, 9, 0.0, 0.0),
            row("2024-03-10", 8, "南京市", 20, 10, 0.0, 0.0),
            row("2024-03-11", 8, "北京市", 5, 5, 0.0, 0.0),
        ];
        let merged = rollup(&rows, Granularity::Week, &["city"]);
        assert_eq!(merged.len(), 3);
        // 2024-03-10 is a Sunday, 2024-03-11 the following Monday
        let cities: Vec<_> = merged.iter().map(|r| (r.date.to_string(), r.dimensions["city"].clone())).collect();
        assert!(cities.contains(&("2024-03-04".to_string(), "北京市".to_string())));
        assert!(cities.contains(&("2024-03-04".to_string(), "南京市".to_string())));
        assert!(cities.contains(&("2024-03-11".to_string(), "北京市".to_string())));
        assert!(!merged.iter().any(|r| r.dimensions.contains_key("service_type")));
    }

    #[test]
    fn test_rollup_hour_keeps_hours() {
        let rows = vec![
            row("2024-03-10", 8, "北京市", 10, 9, 0.0, 0.0),
            row("2024-03-10", 8, "南京市", 20, 10, 0.0, 0.0),
            row("2024-03-10", 9, "北京市", 5, 5, 0.0, 0.0),
        ];
        let merged = rollup(&rows, Granularity::Hour, &[]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].hour, Some(8));
        assert_eq!(merged[0].count("call_qty"), Some(30));
        assert_eq!(merged[1].hour, Some(9));
    }
}
