pub mod config;
pub mod error;
pub mod function;
pub mod invoke;

pub use config::*;
pub use error::*;
pub use function::*;
pub use invoke::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_function_spec_serde_roundtrip() {
        let spec = FunctionSpec {
            function_id: Uuid::new_v4(),
            function_name: "dynamic-html".to_string(),
            handler: "dynamic-html".to_string(),
            environment: std::collections::HashMap::new(),
            timeout_ms: 3000,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&spec).unwrap();
        let deserialized: FunctionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec.function_name, deserialized.function_name);
        assert_eq!(spec.handler, deserialized.handler);
        assert_eq!(spec.timeout_ms, deserialized.timeout_ms);
    }

    #[test]
    fn test_register_request_deny_unknown_fields() {
        let json = r#"{
            "function_name": "test",
            "handler": "dynamic-html",
            "UnknownField": "should_fail"
        }"#;

        let result: Result<RegisterFunctionRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn test_measurement_serde() {
        let begin = Utc::now();
        let measurement = Measurement {
            request_id: Uuid::new_v4(),
            begin,
            end: begin,
            duration_us: 1234,
            is_cold: true,
            init_duration_us: Some(567),
        };

        let json = serde_json::to_string(&measurement).unwrap();
        let deserialized: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(measurement.request_id, deserialized.request_id);
        assert_eq!(measurement.duration_us, deserialized.duration_us);
        assert!(deserialized.is_cold);
        assert_eq!(deserialized.init_duration_us, Some(567));
    }

    #[test]
    fn test_error_shape_serde() {
        let error = HarnessError::FunctionNotFound {
            function_name: "missing".to_string(),
        }
        .to_error_shape();

        let json = serde_json::to_string(&error).unwrap();
        let deserialized: ErrorShape = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.error_type, "FunctionNotFound");
        assert!(deserialized.error_message.contains("missing"));
    }

    #[test]
    fn test_error_http_status_mapping() {
        let not_found = HarnessError::FunctionNotFound {
            function_name: "x".to_string(),
        };
        assert_eq!(not_found.http_status(), 404);

        let conflict = HarnessError::FunctionAlreadyExists {
            function_name: "x".to_string(),
        };
        assert_eq!(conflict.http_status(), 409);

        let handler = HarnessError::HandlerFailed {
            reason: "template missing".to_string(),
        };
        assert_eq!(handler.http_status(), 500);
        assert_eq!(handler.error_type(), "HandlerError");

        assert_eq!(HarnessError::ConcurrencyLimitExceeded.http_status(), 429);
    }

    #[test]
    fn test_config_default_preloads_sample_function() {
        let config = Config::default();
        assert_eq!(config.functions.preload.len(), 1);
        assert_eq!(config.functions.preload[0].handler, "dynamic-html");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_config_toml_partial_sections() {
        let toml_str = r#"
            [server]
            bind = "0.0.0.0"
            port = 9000

            [limits]
            max_global_concurrency = 8
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.limits.max_global_concurrency, 8);
        // untouched sections fall back to defaults
        assert_eq!(config.defaults.timeout_ms, 3000);
        assert_eq!(config.idle.expire_ms, 300_000);
    }

    #[test]
    fn test_config_toml_rejects_unknown_keys() {
        let toml_str = r#"
            [server]
            bind = "0.0.0.0"
            no_such_key = true
        "#;
        let result: Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
