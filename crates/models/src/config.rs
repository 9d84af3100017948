use crate::error::HarnessError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub server: ServerConfig,
    pub functions: FunctionsConfig,
    pub defaults: DefaultsConfig,
    pub idle: IdleConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub max_request_body_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct FunctionsConfig {
    /// Root directory holding per-function assets (templates etc.).
    pub dir: String,
    /// Functions registered at startup, before the first request.
    pub preload: Vec<PreloadFunction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PreloadFunction {
    pub name: String,
    pub handler: String,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DefaultsConfig {
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct IdleConfig {
    /// Warm instances idle longer than this are dropped and cold-start again.
    pub expire_ms: u64,
    pub check_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct LimitsConfig {
    pub max_global_concurrency: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            max_request_body_size_mb: 50,
        }
    }
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            dir: "functions".to_string(),
            preload: vec![PreloadFunction {
                name: "dynamic-html".to_string(),
                handler: "dynamic-html".to_string(),
                environment: HashMap::new(),
                timeout_ms: None,
            }],
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { timeout_ms: 3000 }
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            expire_ms: 300_000,
            check_interval_ms: 30_000,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_global_concurrency: 256,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let contents = std::fs::read_to_string(path).map_err(|e| HarnessError::ConfigError {
            reason: format!("{}: {}", path.display(), e),
        })?;
        let mut config: Config =
            toml::from_str(&contents).map_err(|e| HarnessError::ConfigError {
                reason: format!("{}: {}", path.display(), e),
            })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file values so test daemons and
    /// containers can steer a packaged binary without editing the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("HARNESS_BIND") {
            self.server.bind = v;
        }
        if let Ok(v) = std::env::var("HARNESS_PORT") {
            if let Ok(port) = v.parse() {
                self.server.port = port;
            }
        }
        if let Ok(v) = std::env::var("HARNESS_FUNCTIONS_DIR") {
            self.functions.dir = v;
        }
        if let Ok(v) = std::env::var("HARNESS_DEFAULT_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.defaults.timeout_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("HARNESS_IDLE_EXPIRE_MS") {
            if let Ok(ms) = v.parse() {
                self.idle.expire_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("HARNESS_MAX_GLOBAL_CONCURRENCY") {
            if let Ok(n) = v.parse() {
                self.limits.max_global_concurrency = n;
            }
        }
    }
}
