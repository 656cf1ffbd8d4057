//! Execution tests for the generate and upload commands.
//!
//! Uses wiremock to mock the service and test actual execution flow.

use specgen::{
    ApiVersion, ApplicationRef, CodeProvider, FetchError, FileSet, GeneratedFile,
    GenerationRequest, Get, SpecUpload, SpecgenClient, SpecgenError, Upload,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GO_MODELS_PATH: &str =
    "/organizations/acme/applications/widgets/versions/1.0.0/generators/go_models";

#[tokio::test]
async fn test_generate_single_file_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GO_MODELS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "types.go",
            "content": "package models"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SpecgenClient::new("test-token", &mock_server.uri()).unwrap();
    let request = GenerationRequest::new("acme", "widgets", "1.0.0", "go_models");
    let files = FileSet::get(&client, request).await.unwrap();

    assert_eq!(files.generator(), "go_models");
    assert_eq!(
        files.files(),
        &[GeneratedFile::new("types.go", "package models")]
    );
}

#[tokio::test]
async fn test_generate_multi_file_response_keeps_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/organizations/acme/applications/widgets/versions/latest/generators/ts_client",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                { "name": "index.ts", "content": "export * from './models';" },
                { "name": "models.ts", "content": "export interface Widget {}" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SpecgenClient::new("test-token", &mock_server.uri()).unwrap();
    let request = GenerationRequest::new("acme", "widgets", "latest", "ts_client");
    let files = FileSet::get(&client, request).await.unwrap();

    let names: Vec<&str> = files.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["index.ts", "models.ts"]);
}

#[tokio::test]
async fn test_generate_empty_file_list_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GO_MODELS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "files": [] })))
        .mount(&mock_server)
        .await;

    let client = SpecgenClient::new("test-token", &mock_server.uri()).unwrap();
    let request = GenerationRequest::new("acme", "widgets", "1.0.0", "go_models");
    let result = FileSet::get(&client, request).await;

    assert!(matches!(result, Err(SpecgenError::ApiError { .. })));
}

#[tokio::test]
async fn test_provider_maps_status_codes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GO_MODELS_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/organizations/acme/applications/widgets/versions/1.0.0/generators/broken",
        ))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "errors": ["schema Widget is missing a type"]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(
            "/organizations/acme/applications/widgets/versions/1.0.0/generators/flaky",
        ))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let client = SpecgenClient::new("test-token", &mock_server.uri()).unwrap();

    let not_found = client
        .fetch(&GenerationRequest::new("acme", "widgets", "1.0.0", "go_models"))
        .await;
    assert_eq!(not_found, Err(FetchError::NotFound));

    let conflict = client
        .fetch(&GenerationRequest::new("acme", "widgets", "1.0.0", "broken"))
        .await;
    assert_eq!(
        conflict,
        Err(FetchError::Conflict(vec![
            "schema Widget is missing a type".to_string()
        ]))
    );

    let server_error = client
        .fetch(&GenerationRequest::new("acme", "widgets", "1.0.0", "flaky"))
        .await;
    assert_eq!(
        server_error,
        Err(FetchError::ServerError {
            status_code: Some(502),
            message: "bad gateway".to_string(),
        })
    );
}

#[tokio::test]
async fn test_upload_spec_returns_created_version() {
    let mock_server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "version": "1.2.0",
        "filename": "openapi.yaml",
        "content": "openapi: 3.0.0\n"
    });

    Mock::given(method("POST"))
        .and(path("/organizations/acme/applications/widgets/versions"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "version": "1.2.0",
            "organization": "acme",
            "application": "widgets",
            "latest": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("openapi.yaml");
    std::fs::write(&spec, "openapi: 3.0.0\n").unwrap();

    let client = SpecgenClient::new("test-token", &mock_server.uri()).unwrap();
    let upload = SpecUpload::from_path(&spec, Some("1.2.0".to_string())).unwrap();
    let created = ApiVersion::upload(&client, ApplicationRef::new("acme", "widgets"), upload)
        .await
        .unwrap();

    assert_eq!(created.version, "1.2.0");
    assert!(created.latest);
}

#[tokio::test]
async fn test_upload_conflict_carries_messages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/organizations/acme/applications/widgets/versions"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "errors": [
                { "message": "version 1.0.0 already exists" },
                { "message": "info.title is required" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = SpecgenClient::new("test-token", &mock_server.uri()).unwrap();
    let upload = SpecUpload {
        version: Some("1.0.0".to_string()),
        filename: "openapi.yaml".to_string(),
        content: "openapi: 3.0.0".to_string(),
    };
    let err = ApiVersion::upload(&client, ApplicationRef::new("acme", "widgets"), upload)
        .await
        .unwrap_err();

    match err {
        SpecgenError::Conflict { messages } => assert_eq!(
            messages,
            vec!["version 1.0.0 already exists", "info.title is required"]
        ),
        other => panic!("Expected Conflict, got {other:?}"),
    }
}
