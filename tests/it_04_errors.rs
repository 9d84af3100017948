use harness_models::Config;
use harness_testsupport::{invoke, register_function, seed_dynamic_html, spawn_server, HarnessClient};
use serde_json::json;

#[tokio::test]
async fn unknown_function_is_404_with_error_shape() {
    let mut config = Config::default();
    config.functions.preload.clear();
    let server = spawn_server(config).await.unwrap();

    let reply = invoke(&server, "missing", json!({})).await.unwrap();
    assert_eq!(reply.status, 404);

    let error = reply.error.unwrap();
    assert_eq!(error.error_type, "FunctionNotFound");
    assert!(error.error_message.contains("missing"));
}

#[tokio::test]
async fn missing_template_fails_the_invocation() {
    // Functions dir exists but holds no template.
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.functions.dir = dir.path().to_string_lossy().to_string();

    let server = spawn_server(config).await.unwrap();

    let reply = invoke(
        &server,
        "dynamic-html",
        json!({"random_len": 3, "username": "alice"}),
    )
    .await
    .unwrap();

    // An error, never a rendered value.
    assert_eq!(reply.status, 500);
    assert!(reply.response.is_none());

    let error = reply.error.unwrap();
    assert_eq!(error.error_type, "HandlerError");
    assert!(error.error_message.contains("template"));
}

#[tokio::test]
async fn malformed_event_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    seed_dynamic_html(dir.path()).unwrap();

    let mut config = Config::default();
    config.functions.dir = dir.path().to_string_lossy().to_string();

    let server = spawn_server(config).await.unwrap();

    // random_len absent
    let reply = invoke(&server, "dynamic-html", json!({"username": "alice"}))
        .await
        .unwrap();
    assert_eq!(reply.status, 400);
    assert_eq!(reply.error.unwrap().error_type, "InvalidRequest");

    // random_len negative
    let reply = invoke(
        &server,
        "dynamic-html",
        json!({"random_len": -1, "username": "alice"}),
    )
    .await
    .unwrap();
    assert_eq!(reply.status, 400);
}

#[tokio::test]
async fn registration_errors_map_to_statuses() {
    let mut config = Config::default();
    config.functions.preload.clear();
    let server = spawn_server(config).await.unwrap();
    let client = HarnessClient::new(server.base_url.clone());

    register_function(
        &server,
        json!({"function_name": "fn-a", "handler": "dynamic-html"}),
    )
    .await
    .unwrap();

    // Duplicate name conflicts.
    let err = register_function(
        &server,
        json!({"function_name": "fn-a", "handler": "dynamic-html"}),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("FunctionAlreadyExists"));

    // Unknown handler key is rejected.
    let err = register_function(
        &server,
        json!({"function_name": "fn-b", "handler": "no-such-handler"}),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("UnknownHandler"));

    // Deleting a function that never existed is 404.
    let err = client.delete_function("never-registered").await.unwrap_err();
    assert!(err.to_string().contains("FunctionNotFound"));
}
