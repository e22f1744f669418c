use http::Method;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::Request;
use reqwest::multipart::Form;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{HttpExecutor, InvokeResult};
use crate::InvokerError;
use crate::request::{BuiltRequest, Payload, to_query_values, to_string_value};

/// [`HttpExecutor`] backed by a [`reqwest::Client`].
///
/// Timeouts, proxies and TLS are configured on the client given to [`ReqwestExecutor::new`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    /// Creates an executor sending requests with the given client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Converts a built request into a [`reqwest::Request`] without sending it.
    ///
    /// - query values are appended to the URL, arrays repeating the parameter name
    /// - a text payload becomes the request body as is
    /// - structured fields become a multipart form when [`BuiltRequest::is_multipart`],
    ///   an `application/x-www-form-urlencoded` body otherwise
    ///
    /// For multipart payloads, the `Content-Type` header carrying the boundary is generated
    /// by the form and replaces the built one.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not absolute, a header is invalid or the payload cannot be encoded.
    pub fn to_request(&self, built: &BuiltRequest) -> Result<Request, InvokerError> {
        let method = Method::from_bytes(built.method().to_ascii_uppercase().as_bytes())?;

        let mut url = Url::parse(built.url())?;
        if !built.query().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in built.query() {
                for value in to_query_values(value)? {
                    pairs.append_pair(name, &value);
                }
            }
        }

        let multipart = built.is_multipart();
        let mut headers = HeaderMap::with_capacity(built.headers().len());
        for (name, value) in built.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            if multipart && name == CONTENT_TYPE {
                continue;
            }
            headers.insert(name, HeaderValue::from_str(value)?);
        }

        let builder = self.client.request(method, url).headers(headers);
        let builder = match built.payload() {
            None => builder,
            Some(Payload::Text(text)) => builder.body(text.clone()),
            Some(Payload::Fields(fields)) if multipart => builder.multipart(to_multipart(fields)?),
            Some(Payload::Fields(fields)) => builder.body(to_form_urlencoded(fields)?),
        };

        Ok(builder.build()?)
    }
}

impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, built: &BuiltRequest) -> Result<InvokeResult, InvokerError> {
        let request = self.to_request(built)?;
        let url = request.url().to_string();

        debug!(?request, "sending...");
        let response = self.client.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(InvokeResult::new(url, status, content_type, body))
    }
}

/// Flattens a body object into `(name, value)` pairs: arrays repeat the name, nested values are sent as JSON text.
fn to_field_pairs(fields: &Value) -> Result<Vec<(String, String)>, InvokerError> {
    let Value::Object(fields) = fields else {
        return Err(InvokerError::SerializationError {
            message: format!("form fields must be an object, got {fields}"),
        });
    };

    let mut result = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let items = match value {
            Value::Array(items) => items.iter().collect(),
            value => vec![value],
        };
        for item in items {
            let text = match item {
                Value::Array(_) | Value::Object(_) => serde_json::to_string(item)?,
                scalar => to_string_value(scalar)?,
            };
            result.push((name.clone(), text));
        }
    }
    Ok(result)
}

fn to_form_urlencoded(fields: &Value) -> Result<String, InvokerError> {
    let pairs = to_field_pairs(fields)?;
    serde_urlencoded::to_string(&pairs).map_err(|err| InvokerError::SerializationError {
        message: format!("Failed to serialize form data: {err}"),
    })
}

fn to_multipart(fields: &Value) -> Result<Form, InvokerError> {
    let form = to_field_pairs(fields)?
        .into_iter()
        .fold(Form::new(), |form, (name, text)| form.text(name, text));
    Ok(form)
}
