use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire form of every failure the harness reports to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorShape {
    pub error_message: String,
    pub error_type: String,
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Function not found: {function_name}")]
    FunctionNotFound { function_name: String },

    #[error("Function already exists: {function_name}")]
    FunctionAlreadyExists { function_name: String },

    #[error("Invalid function name: {function_name}")]
    InvalidFunctionName { function_name: String },

    #[error("Unknown handler: {handler}")]
    UnknownHandler { handler: String },

    #[error("Unsupported runtime: {runtime}")]
    UnsupportedRuntime { runtime: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Code too large: {size} bytes (max: {max_size})")]
    CodeTooLarge { size: u64, max_size: u64 },

    #[error("Invalid ZIP file: {reason}")]
    InvalidZipFile { reason: String },

    #[error("Dependency installation failed: {reason}")]
    InstallFailed { reason: String },

    #[error("Image build failed: {reason}")]
    ImageBuildFailed { reason: String },

    #[error("Handler execution failed: {reason}")]
    HandlerFailed { reason: String },

    #[error("Handler timed out after {timeout_ms}ms")]
    ExecutionTimeout { timeout_ms: u64 },

    #[error("Global concurrency limit exceeded")]
    ConcurrencyLimitExceeded,

    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("Internal error: {reason}")]
    InternalError { reason: String },
}

impl HarnessError {
    pub fn to_error_shape(&self) -> ErrorShape {
        ErrorShape {
            error_message: self.to_string(),
            error_type: self.error_type().to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            HarnessError::FunctionNotFound { .. } => "FunctionNotFound",
            HarnessError::FunctionAlreadyExists { .. } => "FunctionAlreadyExists",
            HarnessError::InvalidFunctionName { .. } => "InvalidFunctionName",
            HarnessError::UnknownHandler { .. } => "UnknownHandler",
            HarnessError::UnsupportedRuntime { .. } => "UnsupportedRuntime",
            HarnessError::InvalidRequest { .. } => "InvalidRequest",
            HarnessError::CodeTooLarge { .. } => "CodeTooLarge",
            HarnessError::InvalidZipFile { .. } => "InvalidZipFile",
            HarnessError::InstallFailed { .. } => "InstallFailed",
            HarnessError::ImageBuildFailed { .. } => "ImageBuildFailed",
            HarnessError::HandlerFailed { .. } => "HandlerError",
            HarnessError::ExecutionTimeout { .. } => "Timeout",
            HarnessError::ConcurrencyLimitExceeded => "TooManyRequests",
            HarnessError::ConfigError { .. } => "ConfigError",
            HarnessError::InternalError { .. } => "InternalError",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            HarnessError::FunctionNotFound { .. } => 404,
            HarnessError::FunctionAlreadyExists { .. } => 409,
            HarnessError::InvalidFunctionName { .. } => 400,
            HarnessError::UnknownHandler { .. } => 400,
            HarnessError::UnsupportedRuntime { .. } => 400,
            HarnessError::InvalidRequest { .. } => 400,
            HarnessError::CodeTooLarge { .. } => 400,
            HarnessError::InvalidZipFile { .. } => 400,
            HarnessError::InstallFailed { .. } => 500,
            HarnessError::ImageBuildFailed { .. } => 500,
            HarnessError::HandlerFailed { .. } => 500,
            HarnessError::ExecutionTimeout { .. } => 504,
            HarnessError::ConcurrencyLimitExceeded => 429,
            HarnessError::ConfigError { .. } => 500,
            HarnessError::InternalError { .. } => 500,
        }
    }
}
