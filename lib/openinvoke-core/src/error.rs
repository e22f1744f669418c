/// Why an operation lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum NotFoundKind {
    /// The path is not a key of the document's `paths`.
    #[display("unknown path")]
    UnknownPath,
    /// The path exists but does not declare the requested method.
    #[display("unsupported method")]
    UnsupportedMethod,
}

/// Errors that can occur while loading a description, building a request or executing it.
///
/// Nothing here is retried: catalog and builder errors are surfaced before any I/O happens,
/// transport errors come straight from the execution layer.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum InvokerError {
    /// The interface description could not be read or is malformed.
    #[display("Failed to parse interface description '{origin}': {message}")]
    #[from(skip)]
    Parse {
        /// Where the document came from (file path, `<json>`, `<yaml>`).
        origin: String,
        /// Description of the failure, including the document path when known.
        message: String,
    },

    /// An [`Invoker`](crate::Invoker) was built without an interface description.
    #[display("No interface description configured, see `InvokerBuilder::with_catalog`")]
    #[from(skip)]
    MissingCatalog,

    /// The requested operation is not declared by the description.
    #[display("Operation {} {path} not found: {kind}", method.to_uppercase())]
    #[from(skip)]
    NotFound {
        /// Whether the path or only the method is missing.
        kind: NotFoundKind,
        /// The requested path template.
        path: String,
        /// The requested method, as given by the caller.
        method: String,
    },

    /// Path template contains placeholders without a value.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path template that couldn't be resolved.
        path: String,
        /// Names of the placeholders without value, in template order.
        missings: Vec<String>,
    },

    /// Parameter value cannot be rendered for its location.
    #[display("Unsupported parameter value: {message}. Got: {value}")]
    #[from(skip)]
    UnsupportedParameterValue {
        /// Specific error message describing the conversion failure.
        message: String,
        /// The value that failed to convert.
        value: serde_json::Value,
    },

    /// Body serialization failed.
    #[display("Serialization error: {message}")]
    #[from(skip)]
    SerializationError {
        /// Description of the serialization failure.
        message: String,
    },

    /// JSON response deserialization failure.
    #[display("Failed to deserialize JSON from '{url}': {error}\n{body}")]
    #[from(skip)]
    JsonError {
        /// The request URL.
        url: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// HTTP client error from the underlying reqwest library.
    ReqwestError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// HTTP protocol error from the http crate.
    HttpError(http::Error),

    /// The operation method is not a valid HTTP method token.
    InvalidMethod(http::method::InvalidMethod),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// JSON serialization error for request bodies.
    JsonValueError(serde_json::Error),
}

impl InvokerError {
    pub(crate) fn parse(origin: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    /// Returns the lookup failure kind, if this is a not-found error.
    pub fn not_found_kind(&self) -> Option<NotFoundKind> {
        match self {
            Self::NotFound { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoker_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<InvokerError>();
        assert_sync::<InvokerError>();
    }

    #[test]
    fn should_display_not_found() {
        let error = InvokerError::NotFound {
            kind: NotFoundKind::UnsupportedMethod,
            path: "/pets".to_string(),
            method: "patch".to_string(),
        };

        insta::assert_snapshot!(error.to_string(), @"Operation PATCH /pets not found: unsupported method");
        assert_eq!(
            error.not_found_kind(),
            Some(NotFoundKind::UnsupportedMethod)
        );
    }

    #[test]
    fn should_display_path_unresolved() {
        let error = InvokerError::PathUnresolved {
            path: "/pets/{petId}".to_string(),
            missings: vec!["petId".to_string()],
        };

        insta::assert_snapshot!(error.to_string(), @r#"Path '/pets/{petId}' is missing required arguments: ["petId"]"#);
        assert_eq!(error.not_found_kind(), None);
    }
}
