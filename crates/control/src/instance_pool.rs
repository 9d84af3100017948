use harness_functions::Handler;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// A live handler instance together with its lifecycle bookkeeping.
pub struct FunctionInstance {
    pub instance_id: Uuid,
    pub function_id: Uuid,
    pub handler: Arc<dyn Handler>,
    pub created_at: Instant,
    pub last_used: Instant,
    pub invocations: u64,
}

impl FunctionInstance {
    pub fn new(function_id: Uuid, handler: Box<dyn Handler>) -> Self {
        let now = Instant::now();
        Self {
            instance_id: Uuid::new_v4(),
            function_id,
            handler: Arc::from(handler),
            created_at: now,
            last_used: now,
            invocations: 0,
        }
    }
}

/// Warm instances idle between invocations, keyed by function name.
/// Checkout removes the instance from the pool, so two invocations never
/// share one instance concurrently.
pub struct InstancePool {
    idle: Mutex<HashMap<String, Vec<FunctionInstance>>>,
}

impl InstancePool {
    pub fn new() -> Self {
        Self {
            idle: Mutex::new(HashMap::new()),
        }
    }

    /// Check out the most recently used warm instance, if any.
    pub async fn get_warm_instance(&self, function_name: &str) -> Option<FunctionInstance> {
        let mut idle = self.idle.lock().await;
        let instance = idle.get_mut(function_name).and_then(|list| list.pop());
        if let Some(instance) = &instance {
            debug!(
                function_name = %function_name,
                instance_id = %instance.instance_id,
                "reusing warm instance"
            );
        }
        instance
    }

    /// Return an instance to the pool after a successful invocation.
    pub async fn return_instance(&self, function_name: &str, mut instance: FunctionInstance) {
        instance.last_used = Instant::now();
        instance.invocations += 1;
        let mut idle = self.idle.lock().await;
        idle.entry(function_name.to_string())
            .or_default()
            .push(instance);
    }

    /// Drop every idle instance for a function (deregistration, failed
    /// invocation cleanup). Returns how many were removed.
    pub async fn discard_instances(&self, function_name: &str) -> usize {
        let mut idle = self.idle.lock().await;
        idle.remove(function_name).map(|list| list.len()).unwrap_or(0)
    }

    /// Drop instances idle longer than `expire`. Returns how many were
    /// removed; the next invocation of an affected function cold-starts.
    pub async fn cleanup_idle_instances(&self, expire: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        let mut idle = self.idle.lock().await;
        idle.retain(|function_name, list| {
            let before = list.len();
            list.retain(|instance| now.duration_since(instance.last_used) < expire);
            let dropped = before - list.len();
            if dropped > 0 {
                info!(
                    function_name = %function_name,
                    dropped = dropped,
                    "expired idle instances"
                );
                removed += dropped;
            }
            !list.is_empty()
        });

        removed
    }

    pub async fn idle_count(&self, function_name: &str) -> usize {
        let idle = self.idle.lock().await;
        idle.get(function_name).map(|list| list.len()).unwrap_or(0)
    }

    pub async fn total_idle(&self) -> usize {
        let idle = self.idle.lock().await;
        idle.values().map(|list| list.len()).sum()
    }
}

impl Default for InstancePool {
    fn default() -> Self {
        Self::new()
    }
}
