use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timing record for one invocation. `init_duration_us` is present only
/// when the invocation had to instantiate a fresh handler (cold start).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Measurement {
    pub request_id: Uuid,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_us: u64,
    pub is_cold: bool,
    pub init_duration_us: Option<u64>,
}

/// Body returned by `POST /functions/:name/invocations` on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvokeResponse {
    pub function_name: String,
    pub measurement: Measurement,
    pub result: serde_json::Value,
}
