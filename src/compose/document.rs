//! YAML document loading and the built-in defaults document.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::compose::error::ComposeError;

/// The defaults document shipped with the crate.
///
/// Baseline simulator entries for the built-in model types; scenarios layer
/// on top of it. Callers may substitute any other defaults document, the
/// composition entry point takes the document as an explicit argument.
pub const BUILTIN_DEFAULTS: &str = include_str!("../../config/defaults.yaml");

/// Reads a configuration document from a YAML file.
///
/// # Errors
///
/// Returns [`ComposeError::Read`] if the file cannot be read,
/// [`ComposeError::Parse`] if it is not valid YAML, and
/// [`ComposeError::NotAMapping`] if the top level is not a mapping.
pub fn load_document(path: &Path) -> Result<Mapping, ComposeError> {
    let text = fs::read_to_string(path).map_err(|source| ComposeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text, &format!("`{}`", path.display()))
}

/// Parses a configuration document from YAML text.
///
/// An empty or all-comment document resolves to an empty mapping.
///
/// # Errors
///
/// Returns [`ComposeError::Parse`] or [`ComposeError::NotAMapping`] as for
/// [`load_document`]; `origin` labels the document in error messages.
pub fn parse_document(text: &str, origin: &str) -> Result<Mapping, ComposeError> {
    let value: Value = serde_yaml::from_str(text).map_err(|source| ComposeError::Parse {
        origin: origin.to_string(),
        source,
    })?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(map) => Ok(map),
        _ => Err(ComposeError::NotAMapping {
            origin: origin.to_string(),
        }),
    }
}

/// Parses the built-in defaults document.
///
/// # Errors
///
/// Fails only if the embedded document is damaged, which a unit test guards
/// against.
pub fn builtin_defaults() -> Result<Mapping, ComposeError> {
    parse_document(BUILTIN_DEFAULTS, "the built-in defaults document")
}
