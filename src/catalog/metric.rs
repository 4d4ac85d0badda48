//! Metric definitions

use serde::{Deserialize, Serialize};
use super::types::{Aggregation, Granularity};

/// The date dimension, implicitly compatible with every metric
pub const DATE_DIMENSION: &str = "dt";

/// A named, aggregable quantity with declared compatible dimensions and granularities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub group: String,
    #[serde(rename = "subGroup", default)]
    pub sub_group: Option<String>,
    #[serde(default)]
    pub unit: String,
    pub aggregation: Aggregation,
    /// Dimension ids this metric can be sliced by (`dt` is implied)
    #[serde(rename = "compatibleDims")]
    pub compatible_dims: Vec<String>,
    #[serde(rename = "compatibleGranularities")]
    pub compatible_granularities: Vec<Granularity>,
    /// Numerator/denominator for calculated rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<Ratio>,
    #[serde(default)]
    pub owners: Vec<String>,
    /// Human-readable description for UIs
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "updateCadence", default)]
    pub update_cadence: Option<String>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Defines a rate metric as numerator / denominator, both metric ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: String,
    pub denominator: String,
}

/// Display badge attached to a metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Presentation color class, opaque to this crate
    #[serde(default)]
    pub color: String,
}

impl Metric {
    /// Check if this metric can be sliced by a dimension
    pub fn supports_dimension(&self, dim_id: &str) -> bool {
        dim_id == DATE_DIMENSION || self.compatible_dims.iter().any(|d| d == dim_id)
    }

    /// Check if this metric can be bucketed at a granularity
    pub fn supports_granularity(&self, granularity: Granularity) -> bool {
        self.compatible_granularities.contains(&granularity)
    }

    pub fn is_calculated(&self) -> bool {
        self.aggregation == Aggregation::Calc
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Get the display sub group, falling back to the group
    pub fn display_group(&self) -> &str {
        self.sub_group.as_deref().unwrap_or(&self.group)
    }
}
