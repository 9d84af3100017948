use crate::concurrency::Concurrency;
use crate::instance_pool::{FunctionInstance, InstancePool};
use chrono::Utc;
use dashmap::DashMap;
use harness_functions::{BuiltinRegistry, InvocationContext};
use harness_models::{
    Config, FunctionSpec, HarnessError, InvokeResponse, ListFunctionsResponse, Measurement,
    RegisterFunctionRequest,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// The dispatcher owns the function registry and runs the invoke pipeline:
/// look up the spec, take a concurrency token, check out (or cold-start) an
/// instance, execute under the function timeout, and stamp the measurement.
pub struct Dispatcher {
    config: Config,
    registry: Arc<BuiltinRegistry>,
    functions: DashMap<String, FunctionSpec>,
    pool: Arc<InstancePool>,
    concurrency: Concurrency,
}

impl Dispatcher {
    pub fn new(config: Config, registry: Arc<BuiltinRegistry>) -> Self {
        let concurrency = Concurrency::new(config.limits.max_global_concurrency);
        Self {
            config,
            registry,
            functions: DashMap::new(),
            pool: Arc::new(InstancePool::new()),
            concurrency,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> Arc<InstancePool> {
        self.pool.clone()
    }

    /// Register every function listed in the configuration. Called once at
    /// startup, before the server accepts requests.
    pub fn preload(&self) -> Result<usize, HarnessError> {
        let preload = self.config.functions.preload.clone();
        let mut registered = 0;
        for entry in preload {
            self.register_function(RegisterFunctionRequest {
                function_name: entry.name,
                handler: entry.handler,
                environment: Some(entry.environment),
                timeout_ms: entry.timeout_ms,
            })?;
            registered += 1;
        }
        Ok(registered)
    }

    #[instrument(skip(self, request), fields(function_name = %request.function_name))]
    pub fn register_function(
        &self,
        request: RegisterFunctionRequest,
    ) -> Result<FunctionSpec, HarnessError> {
        validate_function_name(&request.function_name)?;

        if !self.registry.contains(&request.handler) {
            return Err(HarnessError::UnknownHandler {
                handler: request.handler,
            });
        }
        if self.functions.contains_key(&request.function_name) {
            return Err(HarnessError::FunctionAlreadyExists {
                function_name: request.function_name,
            });
        }

        let spec = FunctionSpec {
            function_id: Uuid::new_v4(),
            function_name: request.function_name.clone(),
            handler: request.handler,
            environment: request.environment.unwrap_or_default(),
            timeout_ms: request.timeout_ms.unwrap_or(self.config.defaults.timeout_ms),
            created_at: Utc::now(),
        };

        info!(handler = %spec.handler, "registered function");
        self.functions.insert(request.function_name, spec.clone());
        Ok(spec)
    }

    pub fn get_function(&self, function_name: &str) -> Result<FunctionSpec, HarnessError> {
        self.functions
            .get(function_name)
            .map(|entry| entry.clone())
            .ok_or_else(|| HarnessError::FunctionNotFound {
                function_name: function_name.to_string(),
            })
    }

    pub fn list_functions(&self) -> ListFunctionsResponse {
        let mut functions: Vec<FunctionSpec> =
            self.functions.iter().map(|entry| entry.clone()).collect();
        functions.sort_by(|a, b| a.function_name.cmp(&b.function_name));
        ListFunctionsResponse { functions }
    }

    pub async fn remove_function(&self, function_name: &str) -> Result<(), HarnessError> {
        let (_, spec) =
            self.functions
                .remove(function_name)
                .ok_or_else(|| HarnessError::FunctionNotFound {
                    function_name: function_name.to_string(),
                })?;
        let dropped = self.pool.discard_instances(function_name).await;
        info!(
            function_name = %spec.function_name,
            dropped_instances = dropped,
            "removed function"
        );
        Ok(())
    }

    #[instrument(skip(self, event))]
    pub async fn invoke(
        &self,
        function_name: &str,
        event: Value,
    ) -> Result<InvokeResponse, HarnessError> {
        let spec = self.get_function(function_name)?;
        let _token = self.concurrency.try_acquire()?;

        let request_id = Uuid::new_v4();

        // Warm checkout, or cold start with the init phase measured.
        let (instance, is_cold, init_duration_us) =
            match self.pool.get_warm_instance(&spec.function_name).await {
                Some(instance) => (instance, false, None),
                None => {
                    let factory = self.registry.get(&spec.handler).ok_or_else(|| {
                        HarnessError::UnknownHandler {
                            handler: spec.handler.clone(),
                        }
                    })?;
                    let init_started = Instant::now();
                    let handler = factory.instantiate().await?;
                    let init_us = init_started.elapsed().as_micros() as u64;
                    info!(
                        function_name = %spec.function_name,
                        init_duration_us = init_us,
                        "cold start"
                    );
                    (
                        FunctionInstance::new(spec.function_id, handler),
                        true,
                        Some(init_us),
                    )
                }
            };

        let ctx = InvocationContext {
            request_id,
            function_name: spec.function_name.clone(),
            functions_dir: PathBuf::from(&self.config.functions.dir),
            environment: spec.environment.clone(),
        };

        let begin = Utc::now();
        let started = Instant::now();
        let outcome = tokio::time::timeout(
            Duration::from_millis(spec.timeout_ms),
            instance.handler.handle(&ctx, event),
        )
        .await;
        let end = Utc::now();
        let duration_us = started.elapsed().as_micros() as u64;

        match outcome {
            Ok(Ok(result)) => {
                self.pool.return_instance(&spec.function_name, instance).await;
                Ok(InvokeResponse {
                    function_name: spec.function_name,
                    measurement: Measurement {
                        request_id,
                        begin,
                        end,
                        duration_us,
                        is_cold,
                        init_duration_us,
                    },
                    result,
                })
            }
            Ok(Err(e)) => {
                // A failed instance is discarded, not returned to the pool.
                warn!(
                    function_name = %spec.function_name,
                    request_id = %request_id,
                    error = %e,
                    "handler failed"
                );
                Err(e)
            }
            Err(_) => {
                warn!(
                    function_name = %spec.function_name,
                    request_id = %request_id,
                    timeout_ms = spec.timeout_ms,
                    "handler timed out"
                );
                Err(HarnessError::ExecutionTimeout {
                    timeout_ms: spec.timeout_ms,
                })
            }
        }
    }
}

fn validate_function_name(name: &str) -> Result<(), HarnessError> {
    let valid = !name.is_empty()
        && name.len() <= 140
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(HarnessError::InvalidFunctionName {
            function_name: name.to_string(),
        })
    }
}
