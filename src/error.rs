//! Error types for loading catalogs and configuration

use crate::catalog::CatalogError;

/// Errors that can occur during parsing
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// IO error reading file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML deserialization error
    #[error("Invalid YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
    /// Document parsed but violates catalog invariants
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}
