//! # OpenInvoke Core
//!
//! Build and send HTTP calls from an OpenAPI description.
//!
//! The crate is split in three layers:
//! - **[`SpecCatalog`]** - loads a JSON or YAML description and resolves operations by path and method
//! - **[`RequestBuilder`]** - turns an operation and caller values into a [`BuiltRequest`], without I/O
//! - **[`HttpExecutor`]** - sends a [`BuiltRequest`], [`ReqwestExecutor`] being the default one
//!
//! [`Invoker`] ties them together.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openinvoke_core::{Headers, Invoker, ParameterValues};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let invoker = Invoker::from_path("petstore.yaml")?;
//!
//! let values = ParameterValues::from([("limit".to_string(), json!(10))]);
//! let headers = Headers::from([("Authorization".to_string(), "Bearer token".to_string())]);
//!
//! let pets: serde_json::Value = invoker
//!     .invoke("/pets", "GET", &values, &headers)
//!     .await?
//!     .as_json()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Parameters
//!
//! Caller values are a flat map from parameter name to JSON value. Each declared parameter of
//! the operation picks its value by name and routes it to its location:
//!
//! - `query` parameters are appended to the URL, arrays repeating the name
//! - `header` parameters are added to the request headers
//! - `path` parameters fill the `{name}` placeholders of the path template
//!
//! Every value also takes part in path formatting, so a placeholder is filled even when the
//! description declares the parameter elsewhere or not at all.
//! The request body is read from the [`BODY_KEY`] entry.
//!
//! ## Request Bodies
//!
//! The body encoding is the first declared content type among
//! `application/json`, `application/x-www-form-urlencoded` and `multipart/form-data`.
//! With the default [`BodyPolicy::MultipartOnly`], only multipart payloads are transmitted:
//! the other encodings set the `Content-Type` header but their payload is dropped.
//! Use [`BodyPolicy::SendAll`] to transmit every payload.
//!
//! ```rust
//! use openinvoke_core::{BodyPolicy, Headers, Invoker, ParameterValues, Payload, SpecCatalog};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), openinvoke_core::InvokerError> {
//! let catalog = SpecCatalog::from_json_str(r#"{
//!     "servers": [{ "url": "https://api.example.com" }],
//!     "paths": {
//!         "/pets": {
//!             "post": {
//!                 "requestBody": { "content": { "application/json": {} } }
//!             }
//!         }
//!     }
//! }"#)?;
//! let invoker = Invoker::builder()
//!     .with_catalog(catalog)
//!     .with_body_policy(BodyPolicy::SendAll)
//!     .build()?;
//!
//! let values = ParameterValues::from([("body".to_string(), json!({ "name": "dog" }))]);
//! let request = invoker.prepare("/pets", "post", &values, &Headers::new())?;
//!
//! assert_eq!(request.headers().get("Content-Type").map(String::as_str), Some("application/json"));
//! assert_eq!(request.payload(), Some(&Payload::Text(r#"{"name":"dog"}"#.to_string())));
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `yaml` (default): YAML descriptions, with `serde-saphyr`
//! - `default-tls` (default): TLS support for the reqwest executor

mod catalog;
mod error;
mod execution;
mod invoker;
mod request;

pub use self::catalog::{Format, OperationSpec, ParameterSpec, RequestBodySpec, SpecCatalog};
pub use self::error::{InvokerError, NotFoundKind};
pub use self::execution::{HttpExecutor, InvokeResult, ReqwestExecutor};
pub use self::invoker::{Invoker, InvokerBuilder};
pub use self::request::{
    BODY_KEY, BodyEncoding, BodyPolicy, BuiltRequest, CONTENT_TYPE, EncodedBody, Headers,
    ParameterValues, Payload, RequestBuilder, format_path,
};

/// Location of a parameter, re-exported from `utoipa`.
pub use utoipa::openapi::path::ParameterIn;
