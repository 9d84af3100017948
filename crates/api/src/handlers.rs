use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::Json,
};
use harness_models::{
    ErrorShape, FunctionSpec, HarnessError, InvokeResponse, ListFunctionsResponse,
    RegisterFunctionRequest,
};
use harness_metrics::TracingService;
use tracing::{error, info, instrument};

fn error_response(e: &HarnessError) -> (StatusCode, Json<ErrorShape>) {
    (
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(e.to_error_shape()),
    )
}

#[instrument(skip(state, payload), fields(function_name = %payload.function_name))]
pub async fn register_function(
    State(state): State<AppState>,
    Json(payload): Json<RegisterFunctionRequest>,
) -> Result<Json<FunctionSpec>, (StatusCode, Json<ErrorShape>)> {
    info!("Registering function: {}", payload.function_name);

    match state.dispatcher.register_function(payload) {
        Ok(spec) => Ok(Json(spec)),
        Err(e) => {
            error!("Failed to register function: {}", e);
            Err(error_response(&e))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FunctionSpec>, (StatusCode, Json<ErrorShape>)> {
    match state.dispatcher.get_function(&name) {
        Ok(spec) => Ok(Json(spec)),
        Err(e) => {
            error!("Failed to get function {}: {}", name, e);
            Err(error_response(&e))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorShape>)> {
    info!("Deleting function: {}", name);

    match state.dispatcher.remove_function(&name).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete function {}: {}", name, e);
            Err(error_response(&e))
        }
    }
}

#[instrument(skip(state))]
pub async fn list_functions(
    State(state): State<AppState>,
) -> Result<Json<ListFunctionsResponse>, (StatusCode, Json<ErrorShape>)> {
    Ok(Json(state.dispatcher.list_functions()))
}

#[instrument(skip(state, body))]
pub async fn invoke_function(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, HeaderMap, Json<InvokeResponse>), (StatusCode, Json<ErrorShape>)> {
    // Empty bodies invoke with a null event; non-JSON bodies are passed
    // through as a string event.
    let event = if body.is_empty() {
        serde_json::Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(_) => serde_json::Value::String(String::from_utf8_lossy(&body).to_string()),
        }
    };

    state.metrics.record_invocation(&name);

    match state.dispatcher.invoke(&name, event).await {
        Ok(response) => {
            let measurement = &response.measurement;
            if measurement.is_cold {
                state.metrics.record_cold_start(&name);
            }
            state
                .metrics
                .record_duration(&name, measurement.duration_us as f64 / 1000.0);
            if let Some(init_us) = measurement.init_duration_us {
                state
                    .metrics
                    .record_init_duration(&name, init_us as f64 / 1000.0);
            }
            TracingService::log_invocation_completed(&name, measurement);

            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&measurement.request_id.to_string()) {
                headers.insert("X-Harness-Request-Id", value);
            }
            headers.insert(
                "X-Harness-Cold-Start",
                HeaderValue::from_static(if measurement.is_cold { "true" } else { "false" }),
            );

            Ok((StatusCode::OK, headers, Json(response)))
        }
        Err(e) => {
            if matches!(e, HarnessError::ConcurrencyLimitExceeded) {
                state.metrics.record_throttle(&name);
            }
            state.metrics.record_error(&name, e.error_type());
            TracingService::log_invocation_failed(&name, e.error_type(), &e.to_string());
            Err(error_response(&e))
        }
    }
}

#[instrument(skip(_state))]
pub async fn health_check(State(_state): State<AppState>) -> Result<&'static str, StatusCode> {
    Ok("OK")
}

#[instrument(skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    match state.metrics.get_prometheus_metrics() {
        Ok(metrics) => Ok(metrics),
        Err(e) => {
            error!("Failed to get metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
