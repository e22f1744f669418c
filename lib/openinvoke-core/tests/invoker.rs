use std::sync::Mutex;

use http::StatusCode;
use openinvoke_core::{
    BodyEncoding, BodyPolicy, BuiltRequest, Headers, HttpExecutor, InvokeResult, Invoker,
    InvokerError, NotFoundKind, ParameterIn, ParameterValues, Payload, SpecCatalog,
};
use serde_json::{Value, json};

const YAML_SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/samples/openapi.yaml");
const JSON_SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/samples/openapi.json");

/// Records every request and answers with a canned response.
#[derive(Debug)]
struct RecordingExecutor {
    status: StatusCode,
    body: Value,
    requests: Mutex<Vec<BuiltRequest>>,
}

impl RecordingExecutor {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            requests: Mutex::default(),
        }
    }

    fn requests(&self) -> Vec<BuiltRequest> {
        self.requests.lock().expect("not poisoned").clone()
    }
}

impl HttpExecutor for RecordingExecutor {
    async fn execute(&self, request: &BuiltRequest) -> Result<InvokeResult, InvokerError> {
        self.requests
            .lock()
            .expect("not poisoned")
            .push(request.clone());

        Ok(InvokeResult::new(
            request.url(),
            self.status,
            Some("application/json".to_string()),
            serde_json::to_vec(&self.body)?,
        ))
    }
}

fn invoker(
    policy: BodyPolicy,
    status: StatusCode,
    body: Value,
) -> anyhow::Result<Invoker<RecordingExecutor>> {
    let invoker = Invoker::builder()
        .with_catalog(SpecCatalog::load(YAML_SAMPLE)?)
        .with_body_policy(policy)
        .with_executor(RecordingExecutor::new(status, body))
        .build()?;
    Ok(invoker)
}

fn headers(authorization: &str) -> Headers {
    Headers::from([("Authorization".to_string(), authorization.to_string())])
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn should_load_base_url() -> anyhow::Result<()> {
    let invoker = Invoker::from_path(YAML_SAMPLE)?;

    assert_eq!(invoker.base_url(), "https://api.petstore.example.com/v1");
    assert_eq!(invoker.catalog().len(), 4);
    Ok(())
}

#[test]
fn should_load_same_catalog_from_yaml_and_json() -> anyhow::Result<()> {
    let yaml = SpecCatalog::load(YAML_SAMPLE)?;
    let json = SpecCatalog::load(JSON_SAMPLE)?;

    assert_eq!(yaml.base_url(), json.base_url());
    assert_eq!(
        yaml.operations().collect::<Vec<_>>(),
        json.operations().collect::<Vec<_>>()
    );
    Ok(())
}

#[test]
fn should_resolve_parameters_from_fixture() -> anyhow::Result<()> {
    let catalog = SpecCatalog::load(YAML_SAMPLE)?;

    let list_pets = catalog.resolve_operation("/pets", "get")?;
    let parameters: Vec<_> = list_pets
        .parameters()
        .iter()
        .map(|parameter| (parameter.name(), parameter.location().clone()))
        .collect();
    assert_eq!(
        parameters,
        [("limit", ParameterIn::Query), ("tags", ParameterIn::Query)]
    );

    let show_pet = catalog.resolve_operation("/pets/{petId}", "GET")?;
    let names: Vec<_> = show_pet.parameters().iter().map(|it| it.name()).collect();
    assert_eq!(names, ["petId", "X-Request-ID"]);
    assert_eq!(show_pet.operation_id(), Some("showPetById"));
    Ok(())
}

#[tokio::test]
async fn should_get_pets() -> anyhow::Result<()> {
    init_tracing();
    let invoker = invoker(
        BodyPolicy::default(),
        StatusCode::OK,
        json!([{ "id": 1, "name": "dog" }]),
    )?;

    let result = invoker
        .invoke("/pets", "get", &ParameterValues::new(), &Headers::new())
        .await?;

    let requests = invoker.executor().requests();
    insta::assert_debug_snapshot!(requests, @r#"
    [
        BuiltRequest {
            method: "get",
            url: "https://api.petstore.example.com/v1/pets",
            query: {},
            headers: {},
            encoded_body: None,
            payload: None,
        },
    ]
    "#);
    assert_eq!(result.status_code(), StatusCode::OK);
    assert_eq!(
        result.as_json::<Value>()?,
        json!([{ "id": 1, "name": "dog" }])
    );
    Ok(())
}

#[tokio::test]
async fn should_get_pets_with_query() -> anyhow::Result<()> {
    let invoker = invoker(BodyPolicy::default(), StatusCode::OK, json!([]))?;
    let values = ParameterValues::from([
        ("limit".to_string(), json!(10)),
        ("tags".to_string(), json!(["cute", "small"])),
    ]);

    invoker
        .invoke("/pets", "GET", &values, &Headers::new())
        .await?;

    let requests = invoker.executor().requests();
    let request = requests.first().expect("one request");
    assert_eq!(request.url(), "https://api.petstore.example.com/v1/pets");
    assert_eq!(request.query(), &values);
    assert!(request.headers().is_empty());
    Ok(())
}

#[tokio::test]
async fn should_post_with_bearer_auth() -> anyhow::Result<()> {
    init_tracing();
    let invoker = invoker(
        BodyPolicy::default(),
        StatusCode::CREATED,
        json!({ "id": 1, "name": "dog" }),
    )?;
    let values = ParameterValues::from([(
        "body".to_string(),
        json!({ "name": "dog", "type": "bulldog" }),
    )]);

    let result = invoker
        .invoke("/pets", "post", &values, &headers("Bearer test-token"))
        .await?;

    let requests = invoker.executor().requests();
    let request = requests.first().expect("one request");
    assert_eq!(request.method(), "post");
    assert_eq!(request.url(), "https://api.petstore.example.com/v1/pets");
    insta::assert_debug_snapshot!(request.headers(), @r#"
    {
        "Authorization": "Bearer test-token",
        "Content-Type": "application/json",
    }
    "#);
    assert_eq!(
        request.encoded_body().map(|body| body.encoding),
        Some(BodyEncoding::Json)
    );
    assert_eq!(request.payload(), None);
    assert_eq!(result.status_code(), StatusCode::CREATED);
    assert_eq!(
        result.as_json::<Value>()?,
        json!({ "id": 1, "name": "dog" })
    );
    Ok(())
}

#[tokio::test]
async fn should_post_with_basic_auth_and_send_all() -> anyhow::Result<()> {
    let invoker = invoker(
        BodyPolicy::SendAll,
        StatusCode::CREATED,
        json!({ "id": 1, "name": "dog" }),
    )?;
    let values = ParameterValues::from([(
        "body".to_string(),
        json!({ "name": "dog", "type": "bulldog" }),
    )]);

    invoker
        .invoke(
            "/pets",
            "post",
            &values,
            &headers("Basic dXNlcm5hbWU6cGFzc3dvcmQ="),
        )
        .await?;

    let requests = invoker.executor().requests();
    let request = requests.first().expect("one request");
    assert_eq!(
        request.headers().get("Authorization").map(String::as_str),
        Some("Basic dXNlcm5hbWU6cGFzc3dvcmQ=")
    );
    assert_eq!(
        request.payload(),
        Some(&Payload::Text(
            r#"{"name":"dog","type":"bulldog"}"#.to_string()
        ))
    );
    assert!(!request.is_multipart());
    Ok(())
}

#[tokio::test]
async fn should_get_pet_by_id() -> anyhow::Result<()> {
    let invoker = invoker(
        BodyPolicy::default(),
        StatusCode::OK,
        json!({ "id": 1, "name": "dog", "type": "bulldog" }),
    )?;
    let values = ParameterValues::from([
        ("petId".to_string(), json!(1)),
        ("X-Request-ID".to_string(), json!("req-42")),
    ]);

    let result = invoker
        .invoke("/pets/{petId}", "get", &values, &Headers::new())
        .await?;

    let requests = invoker.executor().requests();
    insta::assert_debug_snapshot!(requests, @r#"
    [
        BuiltRequest {
            method: "get",
            url: "https://api.petstore.example.com/v1/pets/1",
            query: {},
            headers: {
                "X-Request-ID": "req-42",
            },
            encoded_body: None,
            payload: None,
        },
    ]
    "#);
    assert_eq!(result.as_json::<Value>()?["type"], "bulldog");
    Ok(())
}

#[tokio::test]
async fn should_upload_multipart_photo() -> anyhow::Result<()> {
    let invoker = invoker(BodyPolicy::default(), StatusCode::NO_CONTENT, Value::Null)?;
    let values = ParameterValues::from([
        ("petId".to_string(), json!(7)),
        ("body".to_string(), json!({ "caption": "good boy" })),
    ]);

    invoker
        .invoke("/pets/{petId}/photo", "post", &values, &Headers::new())
        .await?;

    let requests = invoker.executor().requests();
    let request = requests.first().expect("one request");
    assert_eq!(
        request.url(),
        "https://api.petstore.example.com/v1/pets/7/photo"
    );
    assert!(request.is_multipart());
    assert_eq!(
        request.payload(),
        Some(&Payload::Fields(json!({ "caption": "good boy" })))
    );
    Ok(())
}

#[tokio::test]
async fn should_fail_on_unknown_operation_without_sending() -> anyhow::Result<()> {
    let invoker = invoker(BodyPolicy::default(), StatusCode::OK, Value::Null)?;

    let unknown_path = invoker
        .invoke("/owners", "get", &ParameterValues::new(), &Headers::new())
        .await
        .expect_err("unknown path");
    let unsupported_method = invoker
        .invoke("/pets", "delete", &ParameterValues::new(), &Headers::new())
        .await
        .expect_err("unsupported method");

    assert_eq!(
        unknown_path.not_found_kind(),
        Some(NotFoundKind::UnknownPath)
    );
    assert_eq!(
        unsupported_method.not_found_kind(),
        Some(NotFoundKind::UnsupportedMethod)
    );
    assert!(invoker.executor().requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn should_fail_on_missing_path_value_without_sending() -> anyhow::Result<()> {
    let invoker = invoker(BodyPolicy::default(), StatusCode::OK, Value::Null)?;

    let error = invoker
        .invoke(
            "/pets/{petId}",
            "get",
            &ParameterValues::new(),
            &Headers::new(),
        )
        .await
        .expect_err("missing petId");

    assert!(matches!(error, InvokerError::PathUnresolved { .. }));
    assert!(invoker.executor().requests().is_empty());
    Ok(())
}

#[test]
fn should_prepare_against_overridden_base_url() -> anyhow::Result<()> {
    let invoker = Invoker::builder()
        .with_catalog(SpecCatalog::load(JSON_SAMPLE)?)
        .with_base_url("http://localhost:8080/")
        .build()?;
    let values = ParameterValues::from([("petId".to_string(), json!("a/b"))]);

    let request = invoker.prepare("/pets/{petId}", "get", &values, &Headers::new())?;

    assert_eq!(request.url(), "http://localhost:8080/pets/a%2Fb");
    Ok(())
}

#[test]
fn should_report_unreadable_file() {
    let error = Invoker::from_path("does/not/exist.yaml").expect_err("missing file");

    assert!(matches!(error, InvokerError::Parse { .. }));
}
