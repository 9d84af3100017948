use harness_models::Config;
use harness_testsupport::{invoke, seed_dynamic_html, spawn_server};
use serde_json::json;

async fn server_with_sample() -> (harness_testsupport::TestServer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    seed_dynamic_html(dir.path()).unwrap();

    let mut config = Config::default();
    config.functions.dir = dir.path().to_string_lossy().to_string();

    let server = spawn_server(config).await.unwrap();
    (server, dir)
}

fn extract_numbers(html: &str) -> Vec<i64> {
    html.split("<li>")
        .skip(1)
        .map(|part| {
            let end = part.find("</li>").unwrap();
            part[..end].trim().parse().unwrap()
        })
        .collect()
}

#[tokio::test]
async fn invoke_renders_template_with_random_sequence() {
    let (server, _dir) = server_with_sample().await;

    let reply = invoke(
        &server,
        "dynamic-html",
        json!({"random_len": 3, "username": "alice"}),
    )
    .await
    .unwrap();

    assert_eq!(reply.status, 200);
    assert!(reply.request_id_header.is_some());

    let response = reply.response.unwrap();
    assert_eq!(response.function_name, "dynamic-html");

    let html = response.result.as_str().unwrap();
    assert!(html.contains("alice"));

    let numbers = extract_numbers(html);
    assert_eq!(numbers.len(), 3);
    for n in numbers {
        assert!((0..=100).contains(&n), "number out of range: {n}");
    }
}

#[tokio::test]
async fn measurement_is_well_formed() {
    let (server, _dir) = server_with_sample().await;

    let reply = invoke(
        &server,
        "dynamic-html",
        json!({"random_len": 1, "username": "bob"}),
    )
    .await
    .unwrap();

    let measurement = reply.response.unwrap().measurement;
    assert!(measurement.begin <= measurement.end);
    assert!(measurement.is_cold);
    assert!(measurement.init_duration_us.is_some());
}

#[tokio::test]
async fn zero_random_len_yields_no_numbers() {
    let (server, _dir) = server_with_sample().await;

    let reply = invoke(
        &server,
        "dynamic-html",
        json!({"random_len": 0, "username": "carol"}),
    )
    .await
    .unwrap();

    assert_eq!(reply.status, 200);
    let response = reply.response.unwrap();
    assert!(extract_numbers(response.result.as_str().unwrap()).is_empty());
}
