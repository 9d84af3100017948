use harness_control::Dispatcher;
use harness_metrics::MetricsService;
use harness_models::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Arc<Dispatcher>, metrics: Arc<MetricsService>) -> Self {
        Self {
            config,
            dispatcher,
            metrics,
        }
    }
}
