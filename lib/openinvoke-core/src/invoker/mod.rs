use std::path::Path;

use tracing::debug;

use crate::InvokerError;
use crate::catalog::SpecCatalog;
use crate::execution::{HttpExecutor, InvokeResult, ReqwestExecutor};
use crate::request::{BuiltRequest, Headers, ParameterValues, RequestBuilder};

mod builder;
pub use self::builder::InvokerBuilder;

/// Invokes the operations of an interface description.
///
/// The invoker owns a [`SpecCatalog`], a [`RequestBuilder`] and an [`HttpExecutor`]:
/// [`Invoker::prepare`] resolves and builds a request without any I/O,
/// [`Invoker::invoke`] also sends it.
///
/// # Example
///
/// ```rust,no_run
/// use openinvoke_core::{Headers, Invoker, ParameterValues};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), openinvoke_core::InvokerError> {
/// let invoker = Invoker::from_path("openapi.yaml")?;
///
/// let values = ParameterValues::from([("petId".to_string(), json!(1))]);
/// let result = invoker
///     .invoke("/pets/{petId}", "get", &values, &Headers::new())
///     .await?;
///
/// println!("{}: {}", result.status_code(), result.as_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Invoker<E = ReqwestExecutor> {
    catalog: SpecCatalog,
    base_url: String,
    builder: RequestBuilder,
    executor: E,
}

impl Invoker {
    /// Creates a new [`InvokerBuilder`] with the reqwest executor.
    pub fn builder() -> InvokerBuilder {
        InvokerBuilder::default()
    }

    /// Loads a description file and creates an invoker with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::Parse`] if the file cannot be loaded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InvokerError> {
        let catalog = SpecCatalog::load(path)?;
        Self::builder().with_catalog(catalog).build()
    }
}

impl<E> Invoker<E> {
    /// The loaded interface description.
    pub fn catalog(&self) -> &SpecCatalog {
        &self.catalog
    }

    /// The base URL requests are sent to.
    ///
    /// This is the catalog base URL unless overridden with [`InvokerBuilder::with_base_url`].
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request builder, carrying the body policy.
    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// The executor sending requests.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Resolves the operation and builds its request, without sending it.
    ///
    /// # Errors
    ///
    /// - [`InvokerError::NotFound`] if the operation is not declared
    /// - any error of [`RequestBuilder::build`]
    pub fn prepare(
        &self,
        path: &str,
        method: &str,
        values: &ParameterValues,
        headers: &Headers,
    ) -> Result<BuiltRequest, InvokerError> {
        let operation = self.catalog.resolve_operation(path, method)?;
        self.builder
            .build(operation, &self.base_url, path, values, headers)
    }
}

impl<E> Invoker<E>
where
    E: HttpExecutor,
{
    /// Resolves, builds and sends a request.
    ///
    /// The response status is not checked.
    ///
    /// # Errors
    ///
    /// Any error of [`Invoker::prepare`] or of the executor.
    pub async fn invoke(
        &self,
        path: &str,
        method: &str,
        values: &ParameterValues,
        headers: &Headers,
    ) -> Result<InvokeResult, InvokerError> {
        let request = self.prepare(path, method, values, headers)?;
        debug!(method = request.method(), url = request.url(), "invoking");
        self.executor.execute(&request).await
    }
}
