use http::Method;
use indexmap::IndexMap;
use utoipa::openapi::path::ParameterIn;

/// A declared operation parameter: its name and where its value travels.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub(super) name: String,
    pub(super) location: ParameterIn,
}

impl ParameterSpec {
    /// Creates a parameter declaration.
    pub fn new(name: impl Into<String>, location: ParameterIn) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }

    /// The parameter name, as used as key of the caller values.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter location (`path`, `query`, `header` or `cookie`).
    pub fn location(&self) -> &ParameterIn {
        &self.location
    }

    pub(super) fn same_slot(&self, other: &Self) -> bool {
        self.name == other.name && self.location == other.location
    }
}

/// The request body declaration of an operation.
///
/// Only the content-type keys are used to pick an encoding; schemas are kept verbatim
/// and never inspected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBodySpec {
    pub(super) content: IndexMap<String, Option<serde_json::Value>>,
}

impl RequestBodySpec {
    /// Creates a request body declaration accepting the given content types, without schemas.
    pub fn from_content_types<I, S>(content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let content = content_types
            .into_iter()
            .map(|content_type| (content_type.into(), None))
            .collect();
        Self { content }
    }

    /// Declared content types, in document order.
    pub fn content_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.content.keys().map(String::as_str)
    }

    /// The schema placeholder declared for a content type.
    pub fn schema(&self, content_type: &str) -> Option<&serde_json::Value> {
        self.content.get(content_type).and_then(Option::as_ref)
    }
}

/// One HTTP operation of the interface description.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use openinvoke_core::{OperationSpec, ParameterSpec, RequestBodySpec};
/// use utoipa::openapi::path::ParameterIn;
///
/// let operation = OperationSpec::new("/pets/{petId}", Method::PUT)
///     .with_parameter(ParameterSpec::new("petId", ParameterIn::Path))
///     .with_request_body(RequestBodySpec::from_content_types(["application/json"]));
///
/// assert_eq!(operation.parameters().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    pub(super) path: String,
    pub(super) method: Method,
    pub(super) operation_id: Option<String>,
    pub(super) parameters: Vec<ParameterSpec>,
    pub(super) request_body: Option<RequestBodySpec>,
}

impl OperationSpec {
    /// Creates an operation without parameters nor request body.
    pub fn new(path: impl Into<String>, method: Method) -> Self {
        Self {
            path: path.into(),
            method,
            operation_id: None,
            parameters: Vec::new(),
            request_body: None,
        }
    }

    /// Adds a parameter declaration.
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the request body declaration.
    pub fn with_request_body(mut self, request_body: RequestBodySpec) -> Self {
        self.request_body = Some(request_body);
        self
    }

    /// Sets the operation id.
    pub fn with_operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// The path template this operation is declared under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The declared `operationId`, if any.
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Declared parameters, path-level ones first.
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// The request body declaration, if any.
    pub fn request_body(&self) -> Option<&RequestBodySpec> {
        self.request_body.as_ref()
    }
}
