use std::sync::LazyLock;

use indexmap::{IndexMap, IndexSet};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use super::value::to_string_value;
use crate::InvokerError;

/// Regular expression for matching path placeholders in the format `{param_name}`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>[^{}/]+)}").expect("a valid regex"));

/// Everything but RFC 3986 unreserved characters gets percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn encode_path_param_value(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Substitutes every `{name}` placeholder of a path template.
///
/// Values are rendered `simple` style (arrays comma-joined) then percent-encoded as a path segment.
/// A placeholder used several times is replaced everywhere. Values without a placeholder are ignored.
///
/// # Errors
///
/// Returns [`InvokerError::PathUnresolved`] listing every placeholder without value,
/// or [`InvokerError::UnsupportedParameterValue`] if a value is an object.
///
/// # Example
///
/// ```rust
/// use indexmap::IndexMap;
/// use openinvoke_core::format_path;
/// use serde_json::json;
///
/// let params = IndexMap::from([("petId".to_string(), json!(1))]);
/// let path = format_path("/pets/{petId}", &params).expect("resolved");
/// assert_eq!(path, "/pets/1");
/// ```
pub fn format_path(
    template: &str,
    params: &IndexMap<String, serde_json::Value>,
) -> Result<String, InvokerError> {
    let names: IndexSet<&str> = RE
        .captures_iter(template)
        .filter_map(|caps| caps.name("name"))
        .map(|name| name.as_str())
        .collect();

    let mut path = template.to_string();
    let mut missings = Vec::new();
    for name in names {
        let Some(value) = params.get(name) else {
            missings.push(name.to_string());
            continue;
        };
        let encoded_value = encode_path_param_value(&to_string_value(value)?);
        path = replace_path_param(&path, name, &encoded_value);
    }

    if !missings.is_empty() {
        return Err(InvokerError::PathUnresolved {
            path: template.to_string(),
            missings,
        });
    }

    Ok(path)
}

/// Joins a base URL and a formatted path with exactly one `/` between them.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
