use crate::handler::{Handler, HandlerFactory, InvocationContext};
use async_trait::async_trait;
use handlebars::Handlebars;
use harness_models::HarnessError;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

/// Template location, relative to the configured functions directory.
pub const TEMPLATE_PATH: &str = "dynamic-html/templates/template.html";

// Events may carry more fields than the handler reads.
#[derive(Debug, Deserialize)]
struct DynamicHtmlEvent {
    random_len: u64,
    username: String,
}

pub struct DynamicHtmlFactory;

#[async_trait]
impl HandlerFactory for DynamicHtmlFactory {
    fn key(&self) -> &'static str {
        "dynamic-html"
    }

    async fn instantiate(&self) -> Result<Box<dyn Handler>, HarnessError> {
        Ok(Box::new(DynamicHtml {
            registry: Handlebars::new(),
        }))
    }
}

/// Renders an HTML page from a template file, filling in the requesting
/// username, the render time, and a server-generated random sequence.
pub struct DynamicHtml {
    registry: Handlebars<'static>,
}

#[async_trait]
impl Handler for DynamicHtml {
    async fn handle(&self, ctx: &InvocationContext, event: Value) -> Result<Value, HarnessError> {
        let event: DynamicHtmlEvent =
            serde_json::from_value(event).map_err(|e| HarnessError::InvalidRequest {
                reason: format!("dynamic-html event: {e}"),
            })?;

        // Template read failure is fatal to the invocation.
        let template_path = ctx.functions_dir.join(TEMPLATE_PATH);
        let template = tokio::fs::read_to_string(&template_path).await.map_err(|e| {
            HarnessError::HandlerFailed {
                reason: format!("template {}: {}", template_path.display(), e),
            }
        })?;

        let mut rng = rand::thread_rng();
        let random_numbers: Vec<u8> = (0..event.random_len)
            .map(|_| rng.gen_range(0..=100u8))
            .collect();
        let cur_time = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let html = self
            .registry
            .render_template(
                &template,
                &json!({
                    "username": event.username,
                    "cur_time": cur_time,
                    "random_numbers": random_numbers,
                }),
            )
            .map_err(|e| HarnessError::HandlerFailed {
                reason: format!("template render: {e}"),
            })?;

        // The rendered page goes to the log stream as well as the response.
        info!(request_id = %ctx.request_id, "{}", html);

        Ok(Value::String(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;
    use uuid::Uuid;

    const TEST_TEMPLATE: &str = r#"<html>
<body>
<h2>Welcome {{username}}!</h2>
<p>Generated at {{cur_time}}</p>
<ul>
{{#each random_numbers}}<li>{{this}}</li>
{{/each}}</ul>
</body>
</html>
"#;

    fn test_context(functions_dir: &Path) -> InvocationContext {
        InvocationContext {
            request_id: Uuid::new_v4(),
            function_name: "dynamic-html".to_string(),
            functions_dir: functions_dir.to_path_buf(),
            environment: HashMap::new(),
        }
    }

    fn seed_template(functions_dir: &Path) {
        let path = functions_dir.join(TEMPLATE_PATH);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, TEST_TEMPLATE).unwrap();
    }

    fn extract_numbers(html: &str) -> Vec<i64> {
        html.split("<li>")
            .skip(1)
            .map(|part| {
                let end = part.find("</li>").unwrap();
                part[..end].parse().unwrap()
            })
            .collect()
    }

    async fn render(functions_dir: &Path, event: Value) -> Result<Value, HarnessError> {
        let handler = DynamicHtmlFactory.instantiate().await.unwrap();
        handler.handle(&test_context(functions_dir), event).await
    }

    #[tokio::test]
    async fn renders_username_and_exact_sequence_length() {
        let dir = tempfile::tempdir().unwrap();
        seed_template(dir.path());

        let result = render(
            dir.path(),
            json!({"random_len": 3, "username": "alice"}),
        )
        .await
        .unwrap();

        let html = result.as_str().unwrap();
        assert!(html.contains("alice"));

        let numbers = extract_numbers(html);
        assert_eq!(numbers.len(), 3);
        for n in numbers {
            assert!((0..=100).contains(&n), "number out of range: {n}");
        }
    }

    #[tokio::test]
    async fn zero_length_sequence_renders_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        seed_template(dir.path());

        let result = render(dir.path(), json!({"random_len": 0, "username": "bob"}))
            .await
            .unwrap();

        let html = result.as_str().unwrap();
        assert!(html.contains("bob"));
        assert!(extract_numbers(html).is_empty());
    }

    #[tokio::test]
    async fn output_deterministic_apart_from_time_and_randoms() {
        let dir = tempfile::tempdir().unwrap();
        seed_template(dir.path());

        let event = json!({"random_len": 0, "username": "carol"});
        let first = render(dir.path(), event.clone()).await.unwrap();
        let second = render(dir.path(), event).await.unwrap();

        // With no random numbers, only the timestamp line may differ.
        let differing: Vec<(&str, &str)> = first
            .as_str()
            .unwrap()
            .lines()
            .zip(second.as_str().unwrap().lines())
            .filter(|(a, b)| a != b)
            .collect();
        for (a, b) in differing {
            assert!(a.contains("Generated at"), "unexpected diff: {a} vs {b}");
        }
    }

    #[tokio::test]
    async fn missing_template_is_a_handler_error() {
        let dir = tempfile::tempdir().unwrap();
        // no template seeded

        let err = render(dir.path(), json!({"random_len": 1, "username": "dave"}))
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::HandlerFailed { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[tokio::test]
    async fn absent_random_len_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        seed_template(dir.path());

        let err = render(dir.path(), json!({"username": "eve"}))
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidRequest { .. }));

        let err = render(
            dir.path(),
            json!({"random_len": -1, "username": "eve"}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HarnessError::InvalidRequest { .. }));
    }
}
