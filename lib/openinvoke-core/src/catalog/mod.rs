//! Loading and indexing of interface descriptions.
//!
//! A [`SpecCatalog`] is built once from a JSON or YAML document and is immutable afterwards:
//! share it by reference (or behind an `Arc`) between any number of callers.

use std::fmt;
use std::path::Path;

use http::Method;
use tracing::debug;

use crate::InvokerError;
use crate::error::NotFoundKind;

mod document;
use self::document::{OperationTable, RawDocument};

mod operation;
pub use self::operation::{OperationSpec, ParameterSpec, RequestBodySpec};

/// Serialization format of an interface description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl Format {
    /// Picks the format from a file extension: `.yaml` and `.yml` are YAML, anything else JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_yaml = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml { Self::Yaml } else { Self::Json }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("<json>"),
            Self::Yaml => f.write_str("<yaml>"),
        }
    }
}

/// An indexed interface description.
///
/// # Example
///
/// ```rust
/// use openinvoke_core::SpecCatalog;
///
/// # fn example() -> Result<(), openinvoke_core::InvokerError> {
/// let catalog = SpecCatalog::from_json_str(r#"{
///     "servers": [{ "url": "https://api.example.com/v1" }],
///     "paths": { "/pets": { "get": {} } }
/// }"#)?;
///
/// assert_eq!(catalog.base_url(), "https://api.example.com/v1");
/// let operation = catalog.resolve_operation("/pets", "GET")?;
/// assert_eq!(operation.path(), "/pets");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpecCatalog {
    base_url: String,
    paths: OperationTable,
}

// Load
impl SpecCatalog {
    /// Loads a description file, the format being picked by [`Format::from_path`].
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::Parse`] if the file cannot be read or is not a valid description.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InvokerError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|err| InvokerError::parse(origin.as_str(), err))?;

        let raw = match Format::from_path(path) {
            Format::Json => parse_json(&origin, &content)?,
            Format::Yaml => parse_yaml(&origin, &content)?,
        };
        Self::from_raw(&origin, raw)
    }

    /// Parses a JSON description held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::Parse`] if the document is malformed.
    pub fn from_json_str(content: &str) -> Result<Self, InvokerError> {
        let origin = Format::Json.to_string();
        let raw = parse_json(&origin, content)?;
        Self::from_raw(&origin, raw)
    }

    /// Parses a YAML description held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::Parse`] if the document is malformed, or if the `yaml` feature is disabled.
    pub fn from_yaml_str(content: &str) -> Result<Self, InvokerError> {
        let origin = Format::Yaml.to_string();
        let raw = parse_yaml(&origin, content)?;
        Self::from_raw(&origin, raw)
    }

    fn from_raw(origin: &str, raw: RawDocument) -> Result<Self, InvokerError> {
        let base_url = raw.base_url();
        let paths = raw
            .into_operations()
            .map_err(|message| InvokerError::parse(origin, message))?;

        let result = Self { base_url, paths };
        debug!(
            %origin,
            base_url = %result.base_url,
            paths = result.paths.len(),
            operations = result.len(),
            "interface description loaded"
        );
        Ok(result)
    }
}

fn parse_json(origin: &str, content: &str) -> Result<RawDocument, InvokerError> {
    let deserializer = &mut serde_json::Deserializer::from_str(content);
    serde_path_to_error::deserialize(deserializer).map_err(|err| InvokerError::parse(origin, err))
}

#[cfg(feature = "yaml")]
fn parse_yaml(origin: &str, content: &str) -> Result<RawDocument, InvokerError> {
    serde_saphyr::from_str(content).map_err(|err| InvokerError::parse(origin, err))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(origin: &str, _content: &str) -> Result<RawDocument, InvokerError> {
    Err(InvokerError::parse(
        origin,
        "YAML documents require the `yaml` feature",
    ))
}

// Lookup
impl SpecCatalog {
    /// The base URL: first server entry's `url`, or `"/"` when no server is declared.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves an operation by exact path template and case-insensitive method.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::NotFound`] with [`NotFoundKind::UnknownPath`] if the path is not declared,
    /// or [`NotFoundKind::UnsupportedMethod`] if the path does not declare this method.
    pub fn resolve_operation(&self, path: &str, method: &str) -> Result<&OperationSpec, InvokerError> {
        let not_found = |kind| InvokerError::NotFound {
            kind,
            path: path.to_string(),
            method: method.to_string(),
        };

        let operations = self
            .paths
            .get(path)
            .ok_or_else(|| not_found(NotFoundKind::UnknownPath))?;

        Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .ok()
            .and_then(|method| operations.get(&method))
            .ok_or_else(|| not_found(NotFoundKind::UnsupportedMethod))
    }

    /// Iterates every declared operation, in document order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> + '_ {
        self.paths.values().flat_map(|operations| operations.values())
    }

    /// Number of declared operations.
    pub fn len(&self) -> usize {
        self.paths.values().map(|operations| operations.len()).sum()
    }

    /// Whether the description declares no operation.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
