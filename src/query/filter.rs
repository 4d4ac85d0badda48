//! Dimension filters
//!
//! A filter restricts one enumerable dimension to (or away from) a set of its
//! enum values. A [`FilterSet`] combines filters conjunctively: a row must
//! satisfy every filter to be kept.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::catalog::Catalog;
use super::error::FilterError;

/// Read access to a row's dimension values
pub trait DimensionValues {
    /// Value of `dim_id` on this row, if the row carries that dimension
    fn dimension_value(&self, dim_id: &str) -> Option<&str>;
}

/// Set membership operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    In,
    NotIn,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOperator::In => write!(f, "IN"),
            FilterOperator::NotIn => write!(f, "NOT_IN"),
        }
    }
}

impl FromStr for FilterOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace(' ', "_").as_str() {
            "IN" => Ok(FilterOperator::In),
            "NOT_IN" | "NOTIN" => Ok(FilterOperator::NotIn),
            _ => Err(FilterError::UnknownOperator(s.to_string())),
        }
    }
}

fn new_filter_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A validated (dimension, operator, values) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default = "new_filter_id")]
    id: String,
    #[serde(rename = "dimId")]
    dim_id: String,
    operator: FilterOperator,
    values: Vec<String>,
}

impl Filter {
    /// Build a filter, checking it against the catalog
    ///
    /// Duplicate values are collapsed, keeping first-appearance order.
    pub fn new<I, S>(
        catalog: &Catalog,
        dim_id: &str,
        operator: FilterOperator,
        values: I,
    ) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = checked_values(catalog, dim_id, values)?;
        Ok(Filter {
            id: new_filter_id(),
            dim_id: dim_id.to_string(),
            operator,
            values,
        })
    }

    /// Re-check a filter (e.g. one deserialized from a request), keeping its id
    pub fn revalidate(&self, catalog: &Catalog) -> Result<Self, FilterError> {
        let values = checked_values(catalog, &self.dim_id, self.values.iter().cloned())?;
        Ok(Filter {
            id: self.id.clone(),
            dim_id: self.dim_id.clone(),
            operator: self.operator,
            values,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dim_id(&self) -> &str {
        &self.dim_id
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Check a single dimension value against this filter
    ///
    /// A missing value is never a member, so it fails `IN` and passes `NOT_IN`.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        let member = value.is_some_and(|v| self.values.iter().any(|x| x == v));
        match self.operator {
            FilterOperator::In => member,
            FilterOperator::NotIn => !member,
        }
    }

    pub fn matches<R: DimensionValues + ?Sized>(&self, row: &R) -> bool {
        self.accepts(row.dimension_value(&self.dim_id))
    }
}

fn checked_values<I, S>(catalog: &Catalog, dim_id: &str, values: I) -> Result<Vec<String>, FilterError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let dimension = catalog
        .get_dimension(dim_id)
        .ok_or_else(|| FilterError::UnknownDimension(dim_id.to_string()))?;
    if !dimension.is_enumerable {
        return Err(FilterError::NotEnumerable(dim_id.to_string()));
    }

    let mut unique: Vec<String> = Vec::new();
    for value in values {
        let value = value.into();
        if !dimension.has_value(&value) {
            return Err(FilterError::InvalidValue {
                dimension: dim_id.to_string(),
                value,
            });
        }
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    if unique.is_empty() {
        return Err(FilterError::EmptyValues(dim_id.to_string()));
    }
    Ok(unique)
}

/// Active filters of a query, applied as a logical AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a filter, returning its id
    ///
    /// Any filter already targeting the same dimension is replaced.
    pub fn add_filter<I, S>(
        &mut self,
        catalog: &Catalog,
        dim_id: &str,
        operator: FilterOperator,
        values: I,
    ) -> Result<String, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filter = Filter::new(catalog, dim_id, operator, values)?;
        let id = filter.id.clone();
        self.insert(filter);
        Ok(id)
    }

    /// Add an already-validated filter, replacing one on the same dimension
    pub fn insert(&mut self, filter: Filter) -> Option<Filter> {
        match self.filters.iter().position(|f| f.dim_id == filter.dim_id) {
            Some(i) => Some(std::mem::replace(&mut self.filters[i], filter)),
            None => {
                self.filters.push(filter);
                None
            }
        }
    }

    /// Remove a filter by id; absent ids are ignored
    pub fn remove_filter(&mut self, filter_id: &str) -> Option<Filter> {
        let i = self.filters.iter().position(|f| f.id == filter_id)?;
        Some(self.filters.remove(i))
    }

    pub fn get(&self, filter_id: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.id == filter_id)
    }

    pub fn for_dimension(&self, dim_id: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.dim_id == dim_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// True if the row satisfies every filter
    pub fn matches<R: DimensionValues + ?Sized>(&self, row: &R) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Keep the rows satisfying every filter
    pub fn apply<R: DimensionValues>(&self, rows: Vec<R>) -> Vec<R> {
        if self.filters.is_empty() {
            return rows;
        }
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<T: IntoIterator<Item = Filter>>(iter: T) -> Self {
        let mut set = FilterSet::new();
        for filter in iter {
            set.insert(filter);
        }
        set
    }
}
