use ::tracing::{error, info};
use harness_models::Measurement;

pub struct TracingService;

impl TracingService {
    pub fn init() {
        tracing_subscriber::fmt().init();
    }

    pub fn log_invocation_completed(function_name: &str, measurement: &Measurement) {
        info!(
            function_name = %function_name,
            request_id = %measurement.request_id,
            duration_us = measurement.duration_us,
            is_cold = measurement.is_cold,
            init_duration_us = measurement.init_duration_us.unwrap_or(0),
            "Invocation completed"
        );
    }

    pub fn log_invocation_failed(function_name: &str, error_type: &str, error_message: &str) {
        error!(
            function_name = %function_name,
            error_type = %error_type,
            error_message = %error_message,
            "Invocation failed"
        );
    }
}
