//! Integration tests for metric/dimension/granularity compatibility

mod common;

use common::{builtin, load_fixture};
use funnelscope::catalog::Granularity;
use funnelscope::resolver::{incompatible_reason, is_dimension_disabled};
use funnelscope::{
    compatible_dimensions, compatible_granularities, dimension_availability, DateRange, QuerySpec,
    ResolveError,
};

fn ids<'a>(dims: &[&'a funnelscope::Dimension]) -> Vec<&'a str> {
    dims.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn test_dimensions_are_intersected_across_metrics() {
    let catalog = builtin();

    let all = compatible_dimensions(&catalog, &["call_qty"]).unwrap();
    assert_eq!(ids(&all), vec!["dt", "city", "service_type"]);

    let narrowed = compatible_dimensions(&catalog, &["call_qty", "gmv"]).unwrap();
    assert_eq!(ids(&narrowed), vec!["dt", "city"]);

    // Adding a metric never widens the set
    let wider = compatible_dimensions(&catalog, &["call_qty", "gmv", "cancel_rate"]).unwrap();
    assert!(ids(&wider).iter().all(|d| ids(&narrowed).contains(d)));
}

#[test]
fn test_empty_selection_allows_everything() {
    let catalog = builtin();
    let none: [&str; 0] = [];
    let dims = compatible_dimensions(&catalog, &none).unwrap();
    assert_eq!(dims.len(), catalog.dimensions().len());
}

#[test]
fn test_date_dimension_is_never_disabled() {
    let catalog = builtin();
    for metric in catalog.metrics() {
        assert!(!is_dimension_disabled(&catalog, "dt", &[metric.id.as_str()]).unwrap());
    }
}

#[test]
fn test_incompatible_reason_names_metrics_in_catalog_order() {
    let catalog = builtin();
    let reason = incompatible_reason(&catalog, "service_type", &["gmv", "call_qty", "cancel_rate"])
        .unwrap()
        .expect("service_type should be disabled");
    assert_eq!(reason.metrics, vec!["cancel_rate", "gmv"]);

    // Same selection in another order gives the same answer
    let again = incompatible_reason(&catalog, "service_type", &["cancel_rate", "gmv", "call_qty"])
        .unwrap()
        .unwrap();
    assert_eq!(reason, again);

    assert!(incompatible_reason(&catalog, "city", &["gmv"]).unwrap().is_none());
}

#[test]
fn test_dimension_availability_flags_disabled_dimensions() {
    let catalog = builtin();
    let statuses = dimension_availability(&catalog, &["gmv"]).unwrap();
    assert_eq!(statuses.len(), catalog.dimensions().len());
    let service = statuses.iter().find(|s| s.dimension.id == "service_type").unwrap();
    assert!(service.disabled);
    assert!(service.reason.is_some());
    let city = statuses.iter().find(|s| s.dimension.id == "city").unwrap();
    assert!(!city.disabled);
}

#[test]
fn test_granularities_are_intersected() {
    let catalog = builtin();
    assert_eq!(
        compatible_granularities(&catalog, &["call_qty"]).unwrap(),
        Granularity::ALL.to_vec()
    );
    assert_eq!(
        compatible_granularities(&catalog, &["call_qty", "pay_qty"]).unwrap(),
        vec![Granularity::Day, Granularity::Week, Granularity::Month]
    );
}

#[test]
fn test_empty_granularity_intersection_is_an_error() {
    let catalog = load_fixture("mixed_grain.yaml");
    match compatible_granularities(&catalog, &["realtime_calls", "monthly_drivers"]).unwrap_err() {
        ResolveError::EmptyGranularityIntersection { metrics } => {
            assert_eq!(metrics, vec!["realtime_calls", "monthly_drivers"]);
        }
        other => panic!("Expected EmptyGranularityIntersection, got: {:?}", other),
    }

    assert_eq!(
        compatible_granularities(&catalog, &["realtime_calls", "daily_calls"]).unwrap(),
        vec![Granularity::Hour]
    );
}

#[test]
fn test_unknown_metric_is_not_found() {
    let catalog = builtin();
    assert!(matches!(
        compatible_dimensions(&catalog, &["call_qty", "bogus"]),
        Err(ResolveError::Catalog(_))
    ));
}

#[test]
fn test_retain_compatible_drops_disabled_dimensions() {
    let catalog = load_fixture("mixed_grain.yaml");
    let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
    let mut spec = QuerySpec::new(["realtime_calls"], range).with_dimensions(["channel", "city"]);

    assert!(spec.retain_compatible(&catalog).unwrap().is_empty());

    spec.metrics.push("daily_calls".to_string());
    let dropped = spec.retain_compatible(&catalog).unwrap();
    assert_eq!(dropped, vec!["city"]);
    assert_eq!(spec.dimensions, vec!["channel"]);
}
