use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A registered function: a name bound to a built-in handler plus its
/// per-function settings. Lives only in memory for the life of the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    pub function_id: Uuid,
    pub function_name: String,
    pub handler: String,
    pub environment: HashMap<String, String>,
    pub timeout_ms: u64,
    pub created_at: DateTime<Utc>,
}

// Request/Response types for the API

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterFunctionRequest {
    pub function_name: String,
    pub handler: String,
    pub environment: Option<HashMap<String, String>>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListFunctionsResponse {
    pub functions: Vec<FunctionSpec>,
}
