//! Administrative write path for the catalog
//!
//! Edits are staged on a copy of the catalog definition and committed as a
//! brand-new [`Catalog`] snapshot. The catalog being edited is never touched,
//! so resolvers holding a reference to it keep seeing a consistent view.

use super::dimension::Dimension;
use super::error::CatalogError;
use super::metric::Metric;
use super::schema::{Catalog, CatalogDef};

/// Staged edits over a catalog snapshot
#[derive(Debug, Clone)]
pub struct CatalogEditor {
    def: CatalogDef,
}

impl Catalog {
    /// Start editing a copy of this catalog
    pub fn edit(&self) -> CatalogEditor {
        CatalogEditor { def: self.to_def() }
    }
}

impl CatalogEditor {
    /// Append a metric (validated on commit)
    pub fn add_metric(mut self, metric: Metric) -> Self {
        self.def.metrics.push(metric);
        self
    }

    /// Replace the metric with the same id
    pub fn update_metric(mut self, metric: Metric) -> Result<Self, CatalogError> {
        let slot = self
            .def
            .metrics
            .iter_mut()
            .find(|m| m.id == metric.id)
            .ok_or_else(|| CatalogError::MetricNotFound(metric.id.clone()))?;
        *slot = metric;
        Ok(self)
    }

    pub fn remove_metric(mut self, id: &str) -> Result<Self, CatalogError> {
        let before = self.def.metrics.len();
        self.def.metrics.retain(|m| m.id != id);
        if self.def.metrics.len() == before {
            return Err(CatalogError::MetricNotFound(id.to_string()));
        }
        Ok(self)
    }

    pub fn set_starred(mut self, id: &str, starred: bool) -> Result<Self, CatalogError> {
        let metric = self
            .def
            .metrics
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::MetricNotFound(id.to_string()))?;
        metric.starred = starred;
        Ok(self)
    }

    /// Append a dimension (validated on commit)
    pub fn add_dimension(mut self, dimension: Dimension) -> Self {
        self.def.dimensions.push(dimension);
        self
    }

    /// Move every dimension in group `from` to group `to`
    ///
    /// Renaming onto an existing group merges the two.
    pub fn rename_dimension_group(mut self, from: &str, to: &str) -> Self {
        for dim in self.def.dimensions.iter_mut().filter(|d| d.group == from) {
            dim.group = to.to_string();
        }
        self
    }

    /// Re-validate and produce the new snapshot
    pub fn commit(self) -> Result<Catalog, CatalogError> {
        Catalog::from_def(self.def)
    }
}
