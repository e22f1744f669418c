use super::Invoker;
use crate::InvokerError;
use crate::catalog::SpecCatalog;
use crate::execution::ReqwestExecutor;
use crate::request::{BodyPolicy, RequestBuilder};

/// Builder for [`Invoker`] instances.
///
/// # Default Configuration
///
/// - **Catalog**: none, [`InvokerBuilder::with_catalog`] is required
/// - **Base URL**: the catalog's [`SpecCatalog::base_url`]
/// - **Body policy**: [`BodyPolicy::MultipartOnly`]
/// - **Executor**: [`ReqwestExecutor`] with a default `reqwest::Client`
///
/// # Example
///
/// ```rust
/// use openinvoke_core::{BodyPolicy, Invoker, SpecCatalog};
///
/// # fn example() -> Result<(), openinvoke_core::InvokerError> {
/// let catalog = SpecCatalog::from_json_str(r#"{ "paths": { "/pets": { "get": {} } } }"#)?;
///
/// let invoker = Invoker::builder()
///     .with_catalog(catalog)
///     .with_base_url("http://localhost:8080/v1")
///     .with_body_policy(BodyPolicy::SendAll)
///     .build()?;
///
/// assert_eq!(invoker.base_url(), "http://localhost:8080/v1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvokerBuilder<E = ReqwestExecutor> {
    catalog: Option<SpecCatalog>,
    base_url: Option<String>,
    policy: BodyPolicy,
    executor: E,
}

impl<E> InvokerBuilder<E> {
    /// Builds the [`Invoker`].
    ///
    /// # Errors
    ///
    /// Returns [`InvokerError::MissingCatalog`] if no catalog was provided.
    pub fn build(self) -> Result<Invoker<E>, InvokerError> {
        let Self {
            catalog,
            base_url,
            policy,
            executor,
        } = self;

        let catalog = catalog.ok_or(InvokerError::MissingCatalog)?;
        let base_url = base_url.unwrap_or_else(|| catalog.base_url().to_string());

        Ok(Invoker {
            catalog,
            base_url,
            builder: RequestBuilder::new(policy),
            executor,
        })
    }

    /// Sets the interface description to invoke.
    pub fn with_catalog(mut self, catalog: SpecCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Overrides the base URL declared by the description's first server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets which computed payloads are transmitted.
    pub fn with_body_policy(mut self, policy: BodyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the executor, for example to share a configured `reqwest::Client`
    /// or to record requests in tests.
    pub fn with_executor<F>(self, executor: F) -> InvokerBuilder<F> {
        let Self {
            catalog,
            base_url,
            policy,
            ..
        } = self;

        InvokerBuilder {
            catalog,
            base_url,
            policy,
            executor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETSTORE: &str = r#"{
        "servers": [{ "url": "https://api.petstore.example.com/v1" }],
        "paths": { "/pets": { "get": {} } }
    }"#;

    fn catalog() -> SpecCatalog {
        SpecCatalog::from_json_str(PETSTORE).expect("valid description")
    }

    #[test]
    fn should_require_catalog() {
        let error = Invoker::builder().build().expect_err("no catalog");

        assert!(matches!(error, InvokerError::MissingCatalog));
    }

    #[test]
    fn should_use_catalog_base_url_by_default() {
        let invoker = Invoker::builder()
            .with_catalog(catalog())
            .build()
            .expect("should build invoker");

        assert_eq!(invoker.base_url(), "https://api.petstore.example.com/v1");
        assert_eq!(
            invoker.request_builder().policy(),
            BodyPolicy::MultipartOnly
        );
    }

    #[test]
    fn should_override_base_url_and_policy() {
        let invoker = Invoker::builder()
            .with_catalog(catalog())
            .with_base_url("http://localhost:3000")
            .with_body_policy(BodyPolicy::SendAll)
            .build()
            .expect("should build invoker");

        assert_eq!(invoker.base_url(), "http://localhost:3000");
        assert_eq!(invoker.request_builder().policy(), BodyPolicy::SendAll);
    }

    #[test]
    fn should_keep_settings_when_replacing_executor() {
        #[derive(Debug, PartialEq)]
        struct Noop;

        let invoker = Invoker::builder()
            .with_body_policy(BodyPolicy::SendAll)
            .with_executor(Noop)
            .with_catalog(catalog())
            .build()
            .expect("should build invoker");

        assert_eq!(invoker.executor(), &Noop);
        assert_eq!(invoker.request_builder().policy(), BodyPolicy::SendAll);
    }
}
