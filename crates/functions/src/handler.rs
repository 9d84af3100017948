use async_trait::async_trait;
use harness_models::HarnessError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Per-invocation context handed to a handler alongside the event.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: Uuid,
    pub function_name: String,
    /// Root directory holding per-function assets (templates etc.).
    pub functions_dir: PathBuf,
    pub environment: HashMap<String, String>,
}

/// A live handler instance. Instances are checked out exclusively by the
/// dispatcher, so `handle` never runs twice concurrently on one instance.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &InvocationContext, event: Value) -> Result<Value, HarnessError>;
}

/// Builds handler instances. `instantiate` is the measurable init phase of
/// a cold start and may do real work (open connections, warm caches).
#[async_trait]
pub trait HandlerFactory: Send + Sync {
    fn key(&self) -> &'static str;
    async fn instantiate(&self) -> Result<Box<dyn Handler>, HarnessError>;
}
