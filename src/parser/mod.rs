//! Catalog and configuration parser (verb module)
//!
//! Transforms YAML documents into validated catalogs and generator configs.

use std::path::Path;
use crate::catalog::{Catalog, CatalogDef};
use crate::error::ParseError;
use crate::generator::GeneratorConfig;

fn read_file(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse a catalog from a YAML file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Catalog, ParseError> {
    let contents = read_file(path.as_ref())?;
    parse_str(&contents)
}

/// Parse a catalog from a YAML string
pub fn parse_str(yaml: &str) -> Result<Catalog, ParseError> {
    let def: CatalogDef = serde_yaml::from_str(yaml)?;
    Ok(Catalog::from_def(def)?)
}

/// Parse a generator configuration from a YAML file
///
/// Fields missing from the document keep their default values.
pub fn parse_generator_file<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, ParseError> {
    let contents = read_file(path.as_ref())?;
    parse_generator_str(&contents)
}

/// Parse a generator configuration from a YAML string
pub fn parse_generator_str(yaml: &str) -> Result<GeneratorConfig, ParseError> {
    serde_yaml::from_str(yaml).map_err(ParseError::from)
}
