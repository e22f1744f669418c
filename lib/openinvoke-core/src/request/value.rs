use serde_json::Value;

use crate::InvokerError;

fn scalar_to_string(value: &Value) -> Result<String, InvokerError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(InvokerError::UnsupportedParameterValue {
            message: "nested complex values not supported in parameters".to_string(),
            value: value.clone(),
        }),
    }
}

fn array_to_strings(items: &[Value]) -> Result<Vec<String>, InvokerError> {
    items.iter().map(scalar_to_string).collect()
}

/// Renders a parameter value as a single string, `simple` style: arrays are comma-joined.
pub(crate) fn to_string_value(value: &Value) -> Result<String, InvokerError> {
    match value {
        Value::Array(items) => array_to_strings(items).map(|values| values.join(",")),
        Value::Object(_) => Err(InvokerError::UnsupportedParameterValue {
            message: "object values not supported in parameters".to_string(),
            value: value.clone(),
        }),
        _ => scalar_to_string(value),
    }
}

/// Renders a query value, `form` style with explode: one string per array item.
pub(crate) fn to_query_values(value: &Value) -> Result<Vec<String>, InvokerError> {
    match value {
        Value::Array(items) => array_to_strings(items),
        _ => to_string_value(value).map(|value| vec![value]),
    }
}
