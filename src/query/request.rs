use serde::{Deserialize, Serialize};
use crate::catalog::{Catalog, Granularity};
use crate::period::{ComparisonMode, DateRange, PeriodError};
use crate::resolver::{compatible_dimensions, ResolveError};
use super::filter::FilterSet;

/// A dashboard query: what to compute, sliced how, over which dates
///
/// Query specs are plain values owned by the UI interaction that builds them.
/// Validation against the catalog happens in [`crate::resolver::validate_query`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Selected metric ids, in selection order
    pub metrics: Vec<String>,
    /// Selected dimension ids (grouping)
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub granularity: Granularity,
    pub range: DateRange,
    #[serde(default)]
    pub filters: FilterSet,
    /// Whether a comparison range is requested
    #[serde(default)]
    pub compare: bool,
    #[serde(rename = "comparisonMode", default, skip_serializing_if = "Option::is_none")]
    pub comparison_mode: Option<ComparisonMode>,
}

impl QuerySpec {
    pub fn new<I, S>(metrics: I, range: DateRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QuerySpec {
            metrics: metrics.into_iter().map(Into::into).collect(),
            dimensions: Vec::new(),
            granularity: Granularity::default(),
            range,
            filters: FilterSet::new(),
            compare: false,
            comparison_mode: None,
        }
    }

    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    /// Enable comparison against the range derived by `mode`
    pub fn compare_with(mut self, mode: ComparisonMode) -> Self {
        self.compare = true;
        self.comparison_mode = Some(mode);
        self
    }

    /// The active comparison mode, if comparison is enabled
    pub fn active_comparison(&self) -> Option<ComparisonMode> {
        self.comparison_mode.filter(|_| self.compare)
    }

    /// Derive the comparison range from the current primary range
    ///
    /// Always recomputed, so a changed primary range or mode is picked up.
    pub fn comparison_range(&self) -> Result<Option<DateRange>, PeriodError> {
        self.active_comparison()
            .map(|mode| self.range.comparison(mode))
            .transpose()
    }

    /// Drop selected dimensions the current metric selection disables
    ///
    /// Returns the dropped dimension ids, in their previous selection order.
    pub fn retain_compatible(&mut self, catalog: &Catalog) -> Result<Vec<String>, ResolveError> {
        let allowed = compatible_dimensions(catalog, &self.metrics)?;
        let (kept, dropped): (Vec<String>, Vec<String>) = self
            .dimensions
            .drain(..)
            .partition(|d| allowed.iter().any(|a| a.id == *d));
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "dropping dimensions disabled by metric selection");
        }
        self.dimensions = kept;
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> DateRange {
        DateRange::parse("2024-03-10", "2024-03-12").unwrap()
    }

    #[test]
    fn test_comparison_range_follows_primary() {
        let mut spec = QuerySpec::new(["call_qty"], range()).compare_with(ComparisonMode::Wow);
        let first = spec.comparison_range().unwrap().unwrap();
        assert_eq!(first, DateRange::parse("2024-03-03", "2024-03-05").unwrap());

        spec.range = DateRange::parse("2024-04-10", "2024-04-10").unwrap();
        let second = spec.comparison_range().unwrap().unwrap();
        assert_eq!(second, DateRange::parse("2024-04-03", "2024-04-03").unwrap());
    }

    #[test]
    fn test_comparison_disabled() {
        let mut spec = QuerySpec::new(["call_qty"], range()).compare_with(ComparisonMode::Dod);
        spec.compare = false;
        assert_eq!(spec.comparison_range().unwrap(), None);
    }

    #[test]
    fn test_retain_compatible_drops_disabled_dimensions() {
        let catalog = Catalog::builtin().unwrap();
        let mut spec = QuerySpec::new(["call_qty"], range()).with_dimensions(["city", "service_type"]);
        assert!(spec.retain_compatible(&catalog).unwrap().is_empty());

        spec.metrics.push("cancel_rate".to_string());
        let dropped = spec.retain_compatible(&catalog).unwrap();
        assert_eq!(dropped, vec!["service_type".to_string()]);
        assert_eq!(spec.dimensions, vec!["city".to_string()]);
    }

    #[test]
    fn test_deserialize_yaml_spec() {
        let yaml = r#"
metrics: [call_qty, resp_rate]
dimensions: [city]
granularity: day
range: { startDate: 2024-03-10, endDate: 2024-03-12 }
filters:
  - { dimId: city, operator: NOT_IN, values: [宿迁市] }
compare: true
comparisonMode: yoy
"#;
        let spec: QuerySpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.metrics.len(), 2);
        assert_eq!(spec.granularity, Granularity::Day);
        assert_eq!(spec.filters.len(), 1);
        assert_eq!(spec.active_comparison(), Some(ComparisonMode::Yoy));
    }
}
