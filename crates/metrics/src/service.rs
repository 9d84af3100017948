use ::tracing::instrument;
use harness_models::HarnessError;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Registry, TextEncoder};

pub struct MetricsService {
    registry: Registry,
    invocations_total: Counter,
    errors_total: Counter,
    throttles_total: Counter,
    cold_starts_total: Counter,
    duration_ms: Histogram,
    init_duration_ms: Histogram,
}

impl MetricsService {
    pub fn new() -> Result<Self, HarnessError> {
        let registry = Registry::new();

        let invocations_total = Counter::new(
            "harness_invocations_total",
            "Total number of function invocations",
        )
        .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        let errors_total = Counter::new(
            "harness_errors_total",
            "Total number of failed invocations",
        )
        .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        let throttles_total = Counter::new(
            "harness_throttles_total",
            "Total number of throttled invocations",
        )
        .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        let cold_starts_total = Counter::new(
            "harness_cold_starts_total",
            "Total number of cold starts",
        )
        .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        let duration_ms = Histogram::with_opts(HistogramOpts::new(
            "harness_duration_ms",
            "Handler execution duration in milliseconds",
        ))
        .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        let init_duration_ms = Histogram::with_opts(HistogramOpts::new(
            "harness_init_duration_ms",
            "Handler initialization duration in milliseconds",
        ))
        .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        registry
            .register(Box::new(invocations_total.clone()))
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;
        registry
            .register(Box::new(errors_total.clone()))
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;
        registry
            .register(Box::new(throttles_total.clone()))
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;
        registry
            .register(Box::new(cold_starts_total.clone()))
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;
        registry
            .register(Box::new(duration_ms.clone()))
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;
        registry
            .register(Box::new(init_duration_ms.clone()))
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        Ok(Self {
            registry,
            invocations_total,
            errors_total,
            throttles_total,
            cold_starts_total,
            duration_ms,
            init_duration_ms,
        })
    }

    pub fn record_invocation(&self, _function_name: &str) {
        self.invocations_total.inc();
    }

    pub fn record_error(&self, _function_name: &str, _error_type: &str) {
        self.errors_total.inc();
    }

    pub fn record_throttle(&self, _function_name: &str) {
        self.throttles_total.inc();
    }

    pub fn record_cold_start(&self, _function_name: &str) {
        self.cold_starts_total.inc();
    }

    pub fn record_duration(&self, _function_name: &str, duration_ms: f64) {
        self.duration_ms.observe(duration_ms);
    }

    pub fn record_init_duration(&self, _function_name: &str, duration_ms: f64) {
        self.init_duration_ms.observe(duration_ms);
    }

    #[instrument(skip(self))]
    pub fn get_prometheus_metrics(&self) -> Result<String, HarnessError> {
        let metric_families = self.registry.gather();
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })?;

        String::from_utf8(buffer)
            .map_err(|e| HarnessError::InternalError { reason: e.to_string() })
    }
}
