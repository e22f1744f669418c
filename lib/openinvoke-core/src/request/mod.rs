//! Request construction from an operation declaration and caller values.
//!
//! [`RequestBuilder::build`] is a pure function: it classifies caller values into path, query and
//! header slots, picks a body encoding, formats the path and returns a [`BuiltRequest`].
//! Nothing is sent from here, see [`crate::HttpExecutor`].

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;
use utoipa::openapi::path::ParameterIn;

use crate::InvokerError;
use crate::catalog::OperationSpec;

mod body;
pub use self::body::{BodyEncoding, EncodedBody, Payload};

mod path;
pub(crate) use self::path::join_url;
pub use self::path::format_path;

mod value;
pub(crate) use self::value::{to_query_values, to_string_value};


/// Caller-supplied values, by parameter name.
///
/// The [`BODY_KEY`] entry carries the request body.
pub type ParameterValues = IndexMap<String, Value>;

/// Header values, by header name.
pub type Headers = IndexMap<String, String>;

/// Key of [`ParameterValues`] holding the request body.
pub const BODY_KEY: &str = "body";

/// Name of the header set from the selected body encoding.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Which computed payloads are actually handed over for transmission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyPolicy {
    /// Only a `multipart/form-data` payload is transmitted; JSON and form-urlencoded payloads
    /// are computed then dropped. This is the historical behavior of the invoker.
    #[default]
    MultipartOnly,
    /// Every computed payload is transmitted.
    SendAll,
}

impl BodyPolicy {
    fn keeps(self, headers: &Headers) -> bool {
        match self {
            Self::SendAll => true,
            Self::MultipartOnly => headers
                .get(CONTENT_TYPE)
                .is_some_and(|content_type| content_type == mime::MULTIPART_FORM_DATA.as_ref()),
        }
    }
}

/// A fully-formed request, ready for an execution layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    method: String,
    url: String,
    query: ParameterValues,
    headers: Headers,
    encoded_body: Option<EncodedBody>,
    payload: Option<Payload>,
}

impl BuiltRequest {
    /// The HTTP method, lowercase.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The absolute URL (base URL joined with the formatted path), without query string.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query parameters, in declaration order.
    pub fn query(&self) -> &ParameterValues {
        &self.query
    }

    /// Request headers: caller headers, then header parameters, then `Content-Type`.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body computed from the operation's declared content types, whether or not it is sent.
    pub fn encoded_body(&self) -> Option<&EncodedBody> {
        self.encoded_body.as_ref()
    }

    /// The payload to transmit, after applying the [`BodyPolicy`].
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Whether the payload must be transmitted as a multipart form.
    pub fn is_multipart(&self) -> bool {
        self.payload.is_some()
            && self
                .encoded_body
                .as_ref()
                .is_some_and(|body| body.encoding == BodyEncoding::Multipart)
    }
}

/// Turns an operation declaration and caller values into a [`BuiltRequest`].
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use openinvoke_core::{Headers, OperationSpec, ParameterSpec, ParameterValues, RequestBuilder};
/// use serde_json::json;
/// use utoipa::openapi::path::ParameterIn;
///
/// # fn example() -> Result<(), openinvoke_core::InvokerError> {
/// let operation = OperationSpec::new("/pets/{petId}", Method::GET)
///     .with_parameter(ParameterSpec::new("petId", ParameterIn::Path))
///     .with_parameter(ParameterSpec::new("fields", ParameterIn::Query));
///
/// let values = ParameterValues::from([
///     ("petId".to_string(), json!(1)),
///     ("fields".to_string(), json!("name")),
/// ]);
///
/// let request = RequestBuilder::default().build(
///     &operation,
///     "https://api.example.com/v1",
///     "/pets/{petId}",
///     &values,
///     &Headers::new(),
/// )?;
///
/// assert_eq!(request.method(), "get");
/// assert_eq!(request.url(), "https://api.example.com/v1/pets/1");
/// assert_eq!(request.query().get("fields"), Some(&json!("name")));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder {
    policy: BodyPolicy,
}

impl RequestBuilder {
    /// Creates a builder applying the given payload policy.
    pub fn new(policy: BodyPolicy) -> Self {
        Self { policy }
    }

    /// The payload policy.
    pub fn policy(&self) -> BodyPolicy {
        self.policy
    }

    /// Builds the request.
    ///
    /// Every caller value takes part in path substitution, whatever its declared location:
    /// a value named like a path placeholder fills it even when the operation declares it as a
    /// query or header parameter. Declared parameters without a value are skipped.
    ///
    /// The URL is `base_url` and the formatted path joined with exactly one `/`: a trailing `/`
    /// on the base is not doubled, and a base of `"/"` yields the bare path. Path values are
    /// percent-encoded as a single segment, so a `/` inside a value becomes `%2F` and never
    /// adds a path segment.
    ///
    /// # Errors
    ///
    /// - [`InvokerError::PathUnresolved`] if a placeholder of `path_template` has no value
    /// - [`InvokerError::UnsupportedParameterValue`] if a header or path value is an object
    /// - [`InvokerError::JsonValueError`] if the JSON body cannot be serialized
    pub fn build(
        &self,
        operation: &OperationSpec,
        base_url: &str,
        path_template: &str,
        values: &ParameterValues,
        headers: &Headers,
    ) -> Result<BuiltRequest, InvokerError> {
        let mut path_params = values.clone();
        let mut query = ParameterValues::new();
        let mut headers = headers.clone();

        for parameter in operation.parameters() {
            let Some(value) = values.get(parameter.name()) else {
                continue;
            };
            match parameter.location() {
                ParameterIn::Query => {
                    query.insert(parameter.name().to_string(), value.clone());
                }
                ParameterIn::Path => {
                    path_params.insert(parameter.name().to_string(), value.clone());
                }
                ParameterIn::Header => {
                    headers.insert(parameter.name().to_string(), to_string_value(value)?);
                }
                ParameterIn::Cookie => {
                    debug!(name = parameter.name(), "cookie parameter not routed");
                }
            }
        }

        let encoded_body = match operation.request_body() {
            Some(request_body) => match BodyEncoding::select(request_body) {
                Some(encoding) => {
                    let body = values
                        .get(BODY_KEY)
                        .cloned()
                        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
                    headers.insert(CONTENT_TYPE.to_string(), encoding.mime().to_string());
                    let payload = encoding.encode(&body)?;
                    debug!(?encoding, "request body encoded");
                    Some(EncodedBody { encoding, payload })
                }
                None => {
                    debug!(
                        content_types = ?request_body.content_types().collect::<Vec<_>>(),
                        "no supported request body encoding"
                    );
                    None
                }
            },
            None => None,
        };

        let payload = match &encoded_body {
            Some(body) if self.policy.keeps(&headers) => Some(body.payload.clone()),
            Some(body) => {
                debug!(encoding = ?body.encoding, policy = ?self.policy, "payload not transmitted");
                None
            }
            None => None,
        };

        let path = format_path(path_template, &path_params)?;
        let url = join_url(base_url, &path);

        Ok(BuiltRequest {
            method: operation.method().as_str().to_ascii_lowercase(),
            url,
            query,
            headers,
            encoded_body,
            payload,
        })
    }
}
