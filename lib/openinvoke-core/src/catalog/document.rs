//! Serde shims for the subset of an OpenAPI document the catalog reads.
//!
//! Everything else (`info`, `responses`, `components.schemas`, ...) is ignored.

use http::Method;
use indexmap::IndexMap;
use serde::Deserialize;
use utoipa::openapi::path::ParameterIn;

use super::operation::{OperationSpec, ParameterSpec, RequestBodySpec};

const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

pub(super) const DEFAULT_BASE_URL: &str = "/";

#[derive(Debug, Deserialize)]
pub(super) struct RawDocument {
    #[serde(default)]
    servers: Vec<RawServer>,
    paths: IndexMap<String, RawPathItem>,
    #[serde(default)]
    components: RawComponents,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    url: String,
    #[serde(default)]
    variables: IndexMap<String, RawServerVariable>,
}

#[derive(Debug, Deserialize)]
struct RawServerVariable {
    default: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawComponents {
    #[serde(default)]
    parameters: IndexMap<String, RawParameter>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPathItem {
    #[serde(default)]
    parameters: Vec<RawParameterOrRef>,
    get: Option<RawOperation>,
    put: Option<RawOperation>,
    post: Option<RawOperation>,
    delete: Option<RawOperation>,
    options: Option<RawOperation>,
    head: Option<RawOperation>,
    patch: Option<RawOperation>,
    trace: Option<RawOperation>,
}

#[derive(Debug, Deserialize)]
struct RawOperation {
    #[serde(rename = "operationId")]
    operation_id: Option<String>,
    #[serde(default)]
    parameters: Vec<RawParameterOrRef>,
    #[serde(rename = "requestBody")]
    request_body: Option<RawRequestBody>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawParameterOrRef {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline(RawParameter),
}

#[derive(Debug, Clone, Deserialize)]
struct RawParameter {
    name: String,
    #[serde(rename = "in")]
    location: ParameterIn,
}

#[derive(Debug, Deserialize)]
struct RawRequestBody {
    #[serde(default)]
    content: IndexMap<String, Option<RawMediaType>>,
}

#[derive(Debug, Deserialize)]
struct RawMediaType {
    schema: Option<serde_json::Value>,
}

pub(super) type OperationTable = IndexMap<String, IndexMap<Method, OperationSpec>>;

impl RawDocument {
    /// Base URL from the first server entry, with server variables replaced by their default.
    pub(super) fn base_url(&self) -> String {
        let Some(server) = self.servers.first() else {
            return DEFAULT_BASE_URL.to_string();
        };

        server
            .variables
            .iter()
            .fold(server.url.clone(), |url, (name, variable)| {
                let pattern = ["{", name, "}"].concat();
                url.replace(&pattern, &variable.default)
            })
    }

    pub(super) fn into_operations(self) -> Result<OperationTable, String> {
        let Self {
            servers: _,
            paths,
            components,
        } = self;

        let mut result = OperationTable::with_capacity(paths.len());
        for (path, item) in paths {
            let RawPathItem {
                parameters,
                get,
                put,
                post,
                delete,
                options,
                head,
                patch,
                trace,
            } = item;

            let shared = components.resolve_all(parameters)?;

            let declared = [
                (Method::GET, get),
                (Method::PUT, put),
                (Method::POST, post),
                (Method::DELETE, delete),
                (Method::OPTIONS, options),
                (Method::HEAD, head),
                (Method::PATCH, patch),
                (Method::TRACE, trace),
            ];

            let mut operations = IndexMap::new();
            for (method, operation) in declared {
                let Some(operation) = operation else {
                    continue;
                };
                let operation = components.to_operation(&path, method.clone(), &shared, operation)?;
                operations.insert(method, operation);
            }

            result.insert(path, operations);
        }

        Ok(result)
    }
}

impl RawComponents {
    fn resolve(&self, parameter: RawParameterOrRef) -> Result<ParameterSpec, String> {
        let RawParameter { name, location } = match parameter {
            RawParameterOrRef::Inline(parameter) => parameter,
            RawParameterOrRef::Reference { reference } => reference
                .strip_prefix(PARAMETER_REF_PREFIX)
                .and_then(|name| self.parameters.get(name))
                .cloned()
                .ok_or_else(|| format!("unresolvable parameter reference '{reference}'"))?,
        };
        Ok(ParameterSpec::new(name, location))
    }

    fn resolve_all(&self, parameters: Vec<RawParameterOrRef>) -> Result<Vec<ParameterSpec>, String> {
        parameters
            .into_iter()
            .map(|parameter| self.resolve(parameter))
            .collect()
    }

    fn to_operation(
        &self,
        path: &str,
        method: Method,
        shared: &[ParameterSpec],
        operation: RawOperation,
    ) -> Result<OperationSpec, String> {
        let RawOperation {
            operation_id,
            parameters,
            request_body,
        } = operation;

        // Operation-level parameters override path-level ones declared with the same name and location
        let mut merged = shared.to_vec();
        for parameter in self.resolve_all(parameters)? {
            match merged.iter_mut().find(|it| it.same_slot(&parameter)) {
                Some(existing) => *existing = parameter,
                None => merged.push(parameter),
            }
        }

        let request_body = request_body.map(|body| RequestBodySpec {
            content: body
                .content
                .into_iter()
                .map(|(content_type, media)| {
                    (content_type, media.and_then(|media| media.schema))
                })
                .collect(),
        });

        Ok(OperationSpec {
            path: path.to_string(),
            method,
            operation_id,
            parameters: merged,
            request_body,
        })
    }
}
