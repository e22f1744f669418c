//! Sending built requests over the network.
//!
//! The request builder never performs I/O; an [`HttpExecutor`] receives the [`BuiltRequest`]
//! and returns an [`InvokeResult`]. [`ReqwestExecutor`] is the default implementation.

use std::borrow::Cow;
use std::future::Future;

use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::InvokerError;
use crate::request::BuiltRequest;

mod http_client;
pub use self::http_client::ReqwestExecutor;

/// Maximum body length kept in error messages.
const BODY_MAX_LENGTH: usize = 1024;

/// Sends a [`BuiltRequest`] and buffers the response.
///
/// Implementations decide transport details (TLS, timeouts, proxies); the payload must be sent
/// as a multipart form when [`BuiltRequest::is_multipart`] is true.
pub trait HttpExecutor: Send + Sync {
    /// Executes the request.
    fn execute(
        &self,
        request: &BuiltRequest,
    ) -> impl Future<Output = Result<InvokeResult, InvokerError>> + Send;
}

/// A buffered HTTP response.
///
/// The status code is not validated: a `404` or `500` is a successful invocation.
#[derive(Clone, derive_more::Debug)]
pub struct InvokeResult {
    url: String,
    status: StatusCode,
    content_type: Option<String>,
    #[debug(ignore)]
    body: Vec<u8>,
}

impl InvokeResult {
    /// Creates a result, typically from a custom [`HttpExecutor`].
    pub fn new(
        url: impl Into<String>,
        status: StatusCode,
        content_type: Option<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            content_type,
            body,
        }
    }

    /// The URL the request was sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response status code.
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// The response `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the response has no body.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// The raw response body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// The response body as text, invalid UTF-8 sequences being replaced.
    pub fn as_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserializes the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::JsonError`] with the (truncated) body if the body does not match `T`.
    pub fn as_json<T>(&self) -> Result<T, InvokerError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body).map_err(|error| {
            let text = self.as_text();
            let body = if text.len() > BODY_MAX_LENGTH {
                let cut = (0..=BODY_MAX_LENGTH)
                    .rev()
                    .find(|index| text.is_char_boundary(*index))
                    .unwrap_or_default();
                format!("{}... (truncated)", text.get(..cut).unwrap_or_default())
            } else {
                text.into_owned()
            };
            InvokerError::JsonError {
                url: self.url.clone(),
                error,
                body,
            }
        })
    }
}
